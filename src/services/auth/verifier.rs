use axum::http::HeaderValue;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use super::bearer;
use super::public_key::RsaPublicKey;

/// The only algorithm tokens may declare.
pub const PINNED_ALGORITHM: &str = "RS256";

/// Why a presented credential was not accepted.
///
/// Callers only see "rejected"; the variant exists for diagnostics.
#[derive(Debug, Error)]
pub enum TokenRejection {
    #[error("malformed token: {0}")]
    Malformed(&'static str),
    #[error("unsupported signing algorithm {0:?} (only RS256 is accepted)")]
    UnsupportedAlgorithm(String),
    #[error("signature does not match the configured public key")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
    #[error("'{0}' claim does not match the expected value")]
    ClaimMismatch(&'static str),
    #[error("verification key unusable: {0}")]
    KeyState(String),
    #[error("jwt verification failed: {0}")]
    Jwt(#[source] jsonwebtoken::errors::Error),
}

impl TokenRejection {
    /// Short stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::InvalidClaims(_) => "invalid_claims",
            Self::ClaimMismatch(_) => "claim_mismatch",
            Self::KeyState(_) => "key_state",
            Self::Jwt(_) => "jwt",
        }
    }

    /// Failures that point at our side (key/crypto backend) rather than the caller's token.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::KeyState(_))
    }
}

impl From<jsonwebtoken::errors::Error> for TokenRejection {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                Self::Malformed("invalid token encoding")
            }
            ErrorKind::Json(err) => Self::InvalidClaims(err.to_string()),
            ErrorKind::MissingRequiredClaim(claim) => {
                Self::InvalidClaims(format!("missing '{claim}'"))
            }
            ErrorKind::InvalidIssuer => Self::ClaimMismatch("iss"),
            ErrorKind::InvalidAudience => Self::ClaimMismatch("aud"),
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                Self::KeyState(e.to_string())
            }
            _ => Self::Jwt(e),
        }
    }
}

/// Claims of a token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub subject: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub issued_at: Option<DateTime<Utc>>,
    pub issuer: Option<String>,
    pub jti: Option<String>,
}

/// Outcome of looking at one request's `Authorization` header.
#[derive(Debug)]
pub enum Authentication {
    Absent,
    Verified(VerifiedClaims),
    Rejected(TokenRejection),
}

#[derive(Debug, Clone, Default)]
pub struct VerifierOptions {
    // Clock skew tolerated on `exp`, seconds.
    pub leeway_seconds: u64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: String,
}

// NumericDate may carry a fractional part, so `exp`/`iat` are read as f64.
#[derive(Debug, Clone, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    exp: Option<f64>,
    #[serde(default)]
    iat: Option<f64>,
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    jti: Option<String>,
}

/// RS256 access-token verifier bound to one public key.
///
/// Immutable after construction; share it behind `Arc`.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(key: &RsaPublicKey, options: &VerifierOptions) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        // `exp` is optional and checked in `verify`; jsonwebtoken only understands integer dates.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        if let Some(issuer) = options.issuer.as_deref() {
            validation.set_issuer(&[issuer]);
        }
        match options.audience.as_deref() {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: key.decoding_key(),
            validation,
            leeway_seconds: options.leeway_seconds,
        }
    }

    /// Verify a compact JWS and return its claims.
    ///
    /// Order of checks:
    /// 1. three base64url segments with a JSON header
    /// 2. header `alg` is exactly RS256
    /// 3. signature, then `iss` / `aud`
    /// 4. `exp` (when present) against now minus leeway
    /// 5. non-empty `sub`
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, TokenRejection> {
        let alg = declared_algorithm(token)?;
        if alg != PINNED_ALGORITHM {
            return Err(TokenRejection::UnsupportedAlgorithm(alg));
        }

        let data = jsonwebtoken::decode::<RawClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if let Some(exp) = claims.exp {
            let now = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
            if exp + (self.leeway_seconds as f64) < now {
                return Err(TokenRejection::Expired);
            }
        }

        let subject = claims
            .sub
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TokenRejection::InvalidClaims("missing or empty 'sub'".to_string()))?;

        Ok(VerifiedClaims {
            subject,
            expires_at: claims.exp.and_then(numeric_date),
            issued_at: claims.iat.and_then(numeric_date),
            issuer: claims.iss,
            jti: claims.jti,
        })
    }

    #[cfg(test)]
    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Classify a request by its `Authorization` header value.
    pub fn authenticate(&self, authorization: Option<&HeaderValue>) -> Authentication {
        match bearer::extract(authorization) {
            None => Authentication::Absent,
            Some(token) => match self.verify(token) {
                Ok(claims) => Authentication::Verified(claims),
                Err(reason) => Authentication::Rejected(reason),
            },
        }
    }
}

fn numeric_date(seconds: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros((seconds * 1_000_000.0) as i64)
}

fn declared_algorithm(token: &str) -> Result<String, TokenRejection> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenRejection::Malformed("expected three dot-separated segments"));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenRejection::Malformed("header is not base64url"))?;
    let header: RawHeader = serde_json::from_slice(&bytes)
        .map_err(|_| TokenRejection::Malformed("header has no string 'alg'"))?;

    Ok(header.alg)
}
