/*
 * Responsibility
 * - Router-level middleware: access token → identity, CORS, HTTP plumbing
 */
pub mod auth;
pub mod cors;
pub mod http;
