/*
 * Responsibility
 * - Response DTOs for the /auth endpoints
 */
use serde::Serialize;

use crate::api::extractors::AuthCtx;

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub principal: String,
    pub roles: Vec<String>,
}

impl From<AuthCtx> for IdentityResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            principal: ctx.principal,
            roles: ctx.roles.into_iter().collect(),
        }
    }
}

/// What downstream code sees for the current request.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    pub roles: Vec<String>,
}

impl From<Option<AuthCtx>> for SessionResponse {
    fn from(ctx: Option<AuthCtx>) -> Self {
        match ctx {
            Some(ctx) => Self {
                authenticated: true,
                principal: Some(ctx.principal),
                roles: ctx.roles.into_iter().collect(),
            },
            None => Self {
                authenticated: false,
                principal: None,
                roles: Vec::new(),
            },
        }
    }
}
