use axum::http::HeaderValue;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Pull the credential out of an `Authorization` header value.
///
/// `None` means "no credential": the header is missing, not visible ASCII,
/// or uses another scheme. That is the anonymous path, not an error.
pub fn extract(authorization: Option<&HeaderValue>) -> Option<&str> {
    authorization?.to_str().ok()?.strip_prefix(BEARER_PREFIX)
}
