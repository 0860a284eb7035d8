/*
 * Responsibility
 * - URL layout under /api
 * - Every route sits behind the access middleware; protection is decided per handler
 *   through the extractor it takes (AuthCtxExtractor vs MaybeAuthCtx)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::handlers::{
    auth::{me, session},
    health::health,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/session", get(session))
        .route("/auth/me", get(me))
}
