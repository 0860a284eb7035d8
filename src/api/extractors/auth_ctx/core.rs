use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::AuthCtx;

/// Extractor for handlers that require an authenticated caller.
/// Relies on the access middleware having inserted AuthCtx into request extensions.
/// Missing → 401 (anonymous request or rejected token).
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::Unauthorized)
    }
}

/// Extractor for public handlers that only want to know who is calling, if anyone.
pub struct MaybeAuthCtx(pub Option<AuthCtx>);

impl<S> FromRequestParts<S> for MaybeAuthCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthCtx(parts.extensions.get::<AuthCtx>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(ctx: Option<AuthCtx>) -> Parts {
        let mut req = Request::builder()
            .uri("/")
            .body(())
            .expect("request builds");
        if let Some(ctx) = ctx {
            req.extensions_mut().insert(ctx);
        }
        req.into_parts().0
    }

    #[tokio::test]
    async fn required_extractor_rejects_anonymous() {
        let mut parts = parts_with(None);
        let result =
            <AuthCtxExtractor as FromRequestParts<()>>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn required_extractor_returns_identity() {
        let mut parts = parts_with(Some(AuthCtx::user("alice")));
        let AuthCtxExtractor(ctx) =
            <AuthCtxExtractor as FromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .expect("identity present");
        assert_eq!(ctx.principal, "alice");
    }

    #[tokio::test]
    async fn optional_extractor_never_rejects() {
        let mut parts = parts_with(None);
        let MaybeAuthCtx(ctx) =
            <MaybeAuthCtx as FromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap_or_else(|never| match never {});
        assert_eq!(ctx, None);

        let mut parts = parts_with(Some(AuthCtx::user("bob")));
        let MaybeAuthCtx(ctx) =
            <MaybeAuthCtx as FromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap_or_else(|never| match never {});
        assert_eq!(ctx.map(|c| c.principal).as_deref(), Some("bob"));
    }
}
