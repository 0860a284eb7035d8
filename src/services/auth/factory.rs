/// Factory: build `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{KeyLoadError, RsaPublicKey, TokenVerifier, VerifierOptions};

pub fn build_token_verifier(config: &Config) -> Result<Arc<TokenVerifier>, KeyLoadError> {
    let key = RsaPublicKey::load(&config.key_source)?;

    tracing::info!(source = %config.key_source, "loaded access token public key");

    let options = VerifierOptions {
        leeway_seconds: config.access_token_leeway_seconds,
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
    };

    Ok(Arc::new(TokenVerifier::new(&key, &options)))
}
