//! Access token (RS256 JWT) verification → AuthCtx in request extensions.
//!
//! This layer never rejects a request. One pass per request:
//! - no bearer credential → continue anonymously
//! - credential verifies → insert AuthCtx, continue
//! - credential rejected (or verification blows up) → log, continue anonymously
//!
//! 401/403 are produced downstream by the extractors (`AuthCtxExtractor`, `require_role`).

use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, error, trace, warn};

use crate::api::extractors::AuthCtx;
use crate::services::auth::{Authentication, TokenVerifier};
use crate::state::AppState;

/// Attach the access middleware to every route of `router`.
///
/// ```ignore
/// let api = middleware::auth::access::apply(api::routes(), state.clone());
/// app = app.nest("/api", api);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take a State extractor; pass state explicitly via from_fn_with_state
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Identity only ever comes from this pass.
    req.extensions_mut().remove::<AuthCtx>();

    if let Some(auth_ctx) = establish_identity(&state.auth, &req) {
        // middleware → extractor handoff
        req.extensions_mut().insert(auth_ctx);
    }

    next.run(req).await
}

/// Run verification for one request and turn the outcome into an optional identity.
pub fn establish_identity<B>(verifier: &TokenVerifier, req: &Request<B>) -> Option<AuthCtx> {
    identity_from(req, |authorization| verifier.authenticate(authorization))
}

/// Classify `req` with `authenticate`; a panic inside it counts as a rejection.
fn identity_from<B, F>(req: &Request<B>, authenticate: F) -> Option<AuthCtx>
where
    F: FnOnce(Option<&HeaderValue>) -> Authentication,
{
    let authorization = req.headers().get(header::AUTHORIZATION);

    let outcome = panic::catch_unwind(AssertUnwindSafe(move || authenticate(authorization)));

    match outcome {
        Ok(Authentication::Absent) => {
            trace!("no bearer credential, continuing anonymously");
            None
        }
        Ok(Authentication::Verified(claims)) => {
            let remote_addr = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr);

            debug!(
                principal = %claims.subject,
                issuer = ?claims.issuer,
                jti = ?claims.jti,
                issued_at = ?claims.issued_at,
                expires_at = ?claims.expires_at,
                "access token verified"
            );
            Some(AuthCtx::from_claims(claims).with_remote_addr(remote_addr))
        }
        Ok(Authentication::Rejected(reason)) if reason.is_internal() => {
            error!(reason = reason.kind(), error = %reason, "access token verifier failed");
            None
        }
        Ok(Authentication::Rejected(reason)) => {
            warn!(reason = reason.kind(), error = %reason, "access token rejected");
            None
        }
        Err(_) => {
            error!("access token verification panicked, continuing anonymously");
            None
        }
    }
}
