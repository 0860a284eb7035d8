/*
 * Responsibility
 * - Environment / .env loading (PORT, APP_ENV, CORS, access token verification)
 * - Value validation (invalid values abort startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Identity provider key compiled into the binary; used unless overridden.
pub const BUNDLED_PUBLIC_KEY_PEM: &str = include_str!("../resources/public.pem");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Where the identity provider's public key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Bundled,
    // PEM text from the environment.
    Inline(String),
    File(PathBuf),
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Bundled => write!(f, "bundled:resources/public.pem"),
            KeySource::Inline(_) => write!(f, "env:ACCESS_JWT_PUBLIC_KEY_PEM"),
            KeySource::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub key_source: KeySource,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(get("PORT"), 8080, "PORT")?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let key_source = match (
            get("ACCESS_JWT_PUBLIC_KEY_PEM"),
            get("ACCESS_JWT_PUBLIC_KEY_PATH"),
        ) {
            (Some(pem), _) => KeySource::Inline(pem.replace("\\n", "\n")),
            (None, Some(path)) => KeySource::File(PathBuf::from(path)),
            (None, None) => KeySource::Bundled,
        };

        let auth_issuer = get("AUTH_ISSUER");
        let auth_audience = get("AUTH_AUDIENCE");

        let access_token_leeway_seconds = parse_or(
            get("ACCESS_TOKEN_LEEWAY_SECONDS"),
            0,
            "ACCESS_TOKEN_LEEWAY_SECONDS",
        )?;

        let request_timeout_seconds: u64 =
            parse_or(get("REQUEST_TIMEOUT_SECONDS"), 30, "REQUEST_TIMEOUT_SECONDS")?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let request_body_limit_bytes = parse_or(
            get("REQUEST_BODY_LIMIT_BYTES"),
            1024 * 1024,
            "REQUEST_BODY_LIMIT_BYTES",
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            key_source,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            request_body_limit_bytes,
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    default: T,
    key: &'static str,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
