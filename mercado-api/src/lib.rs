/// Mercado API server library
///
/// HTTP layer for the Mercado storefront: routing, request validation,
/// authentication extractors, and the response envelope. Database access
/// and token/password primitives live in `mercado-shared`.

pub mod app;
pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
