//! RSA public key loading (PEM → `DecodingKey`).
//!
//! The identity provider's key is bundled with the service and read once at
//! startup. Everything here runs before the listener is bound, so every error
//! is fatal to the process.
//!
//! Accepted armours:
//! - `-----BEGIN PUBLIC KEY-----`: X.509 SubjectPublicKeyInfo, algorithm must be `rsaEncryption`
//! - `-----BEGIN RSA PUBLIC KEY-----`: bare PKCS#1 `RSAPublicKey`

use std::fmt;
use std::path::{Path, PathBuf};

use jsonwebtoken::DecodingKey;
use thiserror::Error;

use crate::config::{BUNDLED_PUBLIC_KEY_PEM, KeySource};

// jsonwebtoken's PEM loader also takes private keys; only public armours are allowed here.
const PUBLIC_ARMOURS: [&str; 2] = ["-----BEGIN PUBLIC KEY-----", "-----BEGIN RSA PUBLIC KEY-----"];

#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("failed to read public key from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("public key is not PEM armoured as PUBLIC KEY or RSA PUBLIC KEY")]
    NotPublicKey,
    #[error("invalid RSA public key: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Immutable RSA public key, ready for RS256 verification.
///
/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct RsaPublicKey {
    decoding_key: DecodingKey,
}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey").finish_non_exhaustive()
    }
}

impl RsaPublicKey {
    pub fn load(source: &KeySource) -> Result<Self, KeyLoadError> {
        match source {
            KeySource::Bundled => Self::from_pem(BUNDLED_PUBLIC_KEY_PEM),
            KeySource::Inline(pem) => Self::from_pem(pem),
            KeySource::File(path) => Self::from_file(path),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, KeyLoadError> {
        let pem = std::fs::read_to_string(path).map_err(|source| KeyLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_pem(&pem)
    }

    pub fn from_pem(pem: &str) -> Result<Self, KeyLoadError> {
        let pem = pem.trim();
        if !PUBLIC_ARMOURS.iter().any(|armour| pem.starts_with(armour)) {
            return Err(KeyLoadError::NotPublicKey);
        }

        // Validates the PEM body and the RSA structure (SPKI must carry rsaEncryption).
        let decoding_key =
            DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(KeyLoadError::Invalid)?;

        Ok(Self { decoding_key })
    }

    pub fn decoding_key(&self) -> DecodingKey {
        self.decoding_key.clone()
    }
}
