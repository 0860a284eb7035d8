/*
 * Responsibility
 * - Access token verification for requests coming from the ketchapp clients
 * - PEM key loading → bearer extraction → RS256 verification
 * - Tokens are issued elsewhere (identity provider); this side only verifies
 */
pub mod bearer;
pub mod factory;
pub mod public_key;
pub mod verifier;

pub use factory::build_token_verifier;
pub use public_key::{KeyLoadError, RsaPublicKey};
pub use verifier::{Authentication, TokenVerifier, VerifiedClaims, VerifierOptions};
