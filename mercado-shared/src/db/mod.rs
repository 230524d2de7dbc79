/// Database layer for Mercado
///
/// This module provides connection pooling and migration management for the
/// MySQL schema (`usuarios`, `produtos`, `produto_imagens`).
///
/// # Modules
///
/// - `pool`: MySQL connection pool management with health checks
/// - `migrations`: Embedded migration runner and additive column migrations

pub mod migrations;
pub mod pool;
