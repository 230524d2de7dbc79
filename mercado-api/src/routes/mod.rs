/// API route handlers
///
/// Each submodule owns one resource of the HTTP surface:
///
/// - `health`: liveness probe with a database round-trip
/// - `auth`: registration, login, token refresh
/// - `products`: catalog CRUD, stock, image associations
/// - `notifications`: per-user notification preferences
/// - `monitoring`: pool and migration introspection (admin)

use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod health;
pub mod monitoring;
pub mod notifications;
pub mod products;

/// Deserializes a nullable, optional JSON field into `Option<Option<T>>`
///
/// Plain `Option<Option<T>>` cannot tell an absent field from an explicit
/// `null`; with `#[serde(default, deserialize_with = "double_option")]` an
/// absent field stays `None` while `"field": null` becomes `Some(None)`,
/// which the partial-update queries use to clear a nullable column.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
