/// Middleware modules for the API server
///
/// - `security`: hardening headers on every response
/// - `session`: resolves the bearer token into a per-request session

pub mod security;
pub mod session;
