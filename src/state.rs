/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to clone; the verifier is immutable after startup and shared through Arc
 */
use std::sync::Arc;

use crate::services::auth::TokenVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(auth: Arc<TokenVerifier>) -> Self {
        Self { auth }
    }
}
