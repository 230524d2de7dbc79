/// Middleware and extractors for the API server
///
/// - `auth`: bearer-token extractors (`AuthUser`, `AdminUser`)
/// - `security`: OWASP security headers layer

pub mod auth;
pub mod security;
