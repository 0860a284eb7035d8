/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the request's authenticated context (AuthCtx) to handlers
 * - axum-specific glue stays in core, the type itself in types
 *
 * Public API:
 * - AuthCtx, ROLE_USER
 * - AuthCtxExtractor (401 when absent), MaybeAuthCtx (never rejects)
 */

mod core;
mod types;

pub use core::{AuthCtxExtractor, MaybeAuthCtx};
pub use types::{AuthCtx, ROLE_USER};
