/// Health check endpoint
///
/// `GET /api/health` answers 200 with the database marked `up` when a
/// round-trip succeeds, and 503 when it does not. Load balancers and
/// uptime monitors poll this route.

use crate::{app::AppState, envelope::Envelope, error::ApiError, extract::Json};
use axum::extract::State;
use mercado_shared::db::pool;
use serde::Serialize;

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall service status
    pub status: &'static str,

    /// Database connectivity
    pub database: &'static str,

    /// Running crate version
    pub version: &'static str,
}

/// `GET /api/health`
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<Envelope<HealthStatus>>, ApiError> {
    if let Err(e) = pool::health_check(&state.db).await {
        tracing::warn!(error = %e, "Health check failed to reach the database");
        return Err(ApiError::ServiceUnavailable(
            "Banco de dados indisponível".to_string(),
        ));
    }

    Ok(Json(Envelope::ok(HealthStatus {
        status: "ok",
        database: "up",
        version: mercado_shared::VERSION,
    })))
}
