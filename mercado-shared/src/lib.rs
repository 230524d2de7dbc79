//! # Mercado Shared Library
//!
//! This crate contains the types and utilities shared between the Mercado
//! API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models (`usuarios`, `produtos`, `produto_imagens`)
//! - `auth`: Password hashing and JWT utilities
//! - `db`: Connection pool and migration management

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Mercado shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
