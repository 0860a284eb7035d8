//! Shared fixtures for unit and router tests.
//!
//! `testdata/private.pem` is the private half of the bundled `resources/public.pem`.

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::{BUNDLED_PUBLIC_KEY_PEM, Config};
use crate::services::auth::{RsaPublicKey, TokenVerifier, VerifierOptions, build_token_verifier};
use crate::state::AppState;

pub const PUBLIC_KEY_PEM: &str = BUNDLED_PUBLIC_KEY_PEM;
pub const PUBLIC_KEY_PKCS1_PEM: &str = include_str!("../../testdata/public_pkcs1.pem");
pub const EC_PUBLIC_KEY_PEM: &str = include_str!("../../testdata/ec_public.pem");
pub const PRIVATE_KEY_PEM: &str = include_str!("../../testdata/private.pem");
pub const OTHER_PRIVATE_KEY_PEM: &str = include_str!("../../testdata/other_private.pem");

#[derive(Debug, Clone, Serialize)]
pub struct TestClaims {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TestClaims {
    pub fn subject(sub: &str) -> Self {
        Self {
            sub: sub.to_string(),
            exp: None,
        }
    }

    /// `exp` relative to now; negative means already expired.
    pub fn expiring(sub: &str, in_seconds: i64) -> Self {
        Self {
            sub: sub.to_string(),
            exp: Some(chrono::Utc::now().timestamp() + in_seconds),
        }
    }
}

pub fn bundled_key_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/public.pem")
}

pub fn config() -> Config {
    Config::from_lookup(|_| None).expect("default config")
}

pub fn verifier(options: VerifierOptions) -> TokenVerifier {
    let key = RsaPublicKey::from_pem(PUBLIC_KEY_PEM).expect("bundled key loads");
    TokenVerifier::new(&key, &options)
}

pub fn state() -> AppState {
    AppState::new(build_token_verifier(&config()).expect("bundled key loads"))
}

pub fn sign_with<T: Serialize>(alg: Algorithm, claims: &T) -> String {
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).expect("test private key");
    jsonwebtoken::encode(&Header::new(alg), claims, &key).expect("token signs")
}

pub fn sign_rs256<T: Serialize>(claims: &T) -> String {
    sign_with(Algorithm::RS256, claims)
}

pub fn sign_rs256_with_key<T: Serialize>(private_key_pem: &str, claims: &T) -> String {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).expect("test private key");
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).expect("token signs")
}

pub fn sign_hs256<T: Serialize>(secret: &[u8], claims: &T) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("token signs")
}

/// Hand-built token with an arbitrary `alg` and an empty signature segment.
pub fn unsigned_token(alg: &str, claims: &Value) -> String {
    let header = serde_json::json!({"alg": alg, "typ": "JWT"});
    format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// Flip the lowest bit of the first signature byte.
pub fn flip_signature_bit(token: &str) -> String {
    let (signed, signature) = token.rsplit_once('.').expect("three segments");
    let mut bytes = URL_SAFE_NO_PAD.decode(signature).expect("signature is base64url");
    bytes[0] ^= 0x01;
    format!("{signed}.{}", URL_SAFE_NO_PAD.encode(bytes))
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("token is visible ascii")
}

/// GET `uri` through `router`, returning status and JSON body (`Null` when empty).
pub async fn get_json(
    router: Router,
    uri: &str,
    authorization: Option<&str>,
) -> (StatusCode, Value) {
    let mut req = Request::get(uri);
    if let Some(value) = authorization {
        req = req.header(header::AUTHORIZATION, value);
    }

    let response = router
        .oneshot(req.body(Body::empty()).expect("request builds"))
        .await
        .expect("infallible");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, body)
}
