/// Operational monitoring routes (admin only)
///
/// These expose pool and migration state for dashboards and debugging.
/// They never fail just because the database is down: the database route
/// reports `down` with whatever pool numbers are available, so operators
/// can still see the pool draining during an outage.

use crate::{
    app::AppState,
    envelope::Envelope,
    error::ApiResult,
    extract::Json,
    middleware::auth::AdminUser,
};
use axum::extract::State;
use mercado_shared::db::{migrations, pool};
use serde::Serialize;

/// Database connectivity and pool usage snapshot
#[derive(Debug, Serialize)]
pub struct DatabaseStatusResponse {
    /// `up` when a probe query succeeds, `down` otherwise
    pub status: &'static str,

    /// Connections currently executing queries
    pub active_connections: usize,

    /// Idle connections available in the pool
    pub idle_connections: usize,

    /// Total connections the pool holds
    pub total_connections: usize,
}

/// Applied-migration summary
#[derive(Debug, Serialize)]
pub struct MigrationStatusResponse {
    /// Number of successfully applied migrations
    pub applied_migrations: usize,

    /// Version (timestamp) of the most recent migration, if any
    pub latest_version: Option<i64>,
}

/// `GET /api/monitoring/database` (admin)
pub async fn database_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<Envelope<DatabaseStatusResponse>>> {
    let status = match pool::health_check(&state.db).await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "Database probe failed");
            "down"
        }
    };

    let stats = pool::get_pool_stats(&state.db);

    Ok(Json(Envelope::ok(DatabaseStatusResponse {
        status,
        active_connections: stats.active_connections,
        idle_connections: stats.idle_connections,
        total_connections: stats.total_connections,
    })))
}

/// `GET /api/monitoring/migrations` (admin)
pub async fn migration_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<Envelope<MigrationStatusResponse>>> {
    let status = migrations::get_migration_status(&state.db).await?;

    Ok(Json(Envelope::ok(MigrationStatusResponse {
        applied_migrations: status.applied_migrations,
        latest_version: status.latest_version,
    })))
}
