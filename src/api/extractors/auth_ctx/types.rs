/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - The access middleware verifies the token and stores it in request extensions;
 *   handlers only ever receive this type
 *
 * Notes
 * - Token verification lives in middleware/services
 * - Roles are fixed: every verified principal is ROLE_USER (no claim-based roles)
 */
use std::collections::BTreeSet;
use std::net::SocketAddr;

use crate::error::AppError;
use crate::services::auth::VerifiedClaims;

pub const ROLE_USER: &str = "ROLE_USER";

/// Identity attached to one verified request.
///
/// - `principal` is the token's `sub`
/// - `remote_addr` is the peer address when the server records connect info
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub principal: String,
    pub roles: BTreeSet<String>,
    pub remote_addr: Option<SocketAddr>,
}

impl AuthCtx {
    pub fn user(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            roles: BTreeSet::from([ROLE_USER.to_string()]),
            remote_addr: None,
        }
    }

    pub fn from_claims(claims: VerifiedClaims) -> Self {
        Self::user(claims.subject)
    }

    pub fn with_remote_addr(mut self, remote_addr: Option<SocketAddr>) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn require_role(&self, role: &'static str) -> Result<(), AppError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden { role })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_has_only_role_user() {
        let ctx = AuthCtx::user("alice");
        assert_eq!(ctx.principal, "alice");
        assert_eq!(ctx.roles, BTreeSet::from([ROLE_USER.to_string()]));
        assert!(ctx.require_role(ROLE_USER).is_ok());
    }

    #[test]
    fn missing_role_is_forbidden() {
        let ctx = AuthCtx::user("alice");
        let err = ctx.require_role("ROLE_ADMIN").expect_err("no admin");
        assert!(matches!(err, AppError::Forbidden { role: "ROLE_ADMIN" }));
    }

    #[test]
    fn principal_comes_from_subject() {
        let claims = VerifiedClaims {
            subject: "bob".to_string(),
            expires_at: None,
            issued_at: None,
            issuer: None,
            jti: None,
        };
        let addr: SocketAddr = "127.0.0.1:5000".parse().expect("addr");

        let ctx = AuthCtx::from_claims(claims).with_remote_addr(Some(addr));
        assert_eq!(ctx.principal, "bob");
        assert_eq!(ctx.remote_addr, Some(addr));
    }
}
