/*
 * Responsibility
 * - GET /api/auth/session: public, reports the identity the middleware attached (if any)
 * - GET /api/auth/me: requires an identity with ROLE_USER
 */
use axum::Json;

use crate::{
    api::dto::auth::{IdentityResponse, SessionResponse},
    api::extractors::{AuthCtxExtractor, MaybeAuthCtx, ROLE_USER},
    error::AppError,
};

pub async fn session(MaybeAuthCtx(ctx): MaybeAuthCtx) -> Json<SessionResponse> {
    Json(SessionResponse::from(ctx))
}

pub async fn me(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<IdentityResponse>, AppError> {
    ctx.require_role(ROLE_USER)?;
    tracing::debug!(
        principal = %ctx.principal,
        remote_addr = ?ctx.remote_addr,
        "identity requested"
    );

    Ok(Json(IdentityResponse::from(ctx)))
}
