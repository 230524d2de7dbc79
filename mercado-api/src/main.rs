/// Mercado API server entry point
///
/// Startup order matters: configuration, then the pool (which verifies
/// connectivity), then migrations and the additive notification columns,
/// and only then the listener. A database problem keeps the process from
/// binding the port at all, so orchestrators never route traffic to a
/// half-started instance.

use mercado_api::{
    app::{build_router, AppState},
    config::Config,
};
use mercado_shared::db::{
    migrations::{ensure_notification_columns, run_migrations},
    pool::{create_pool, DatabaseConfig},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mercado_api=debug,mercado_shared=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(address = %config.bind_address(), "Starting Mercado API server");

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;
    ensure_notification_columns(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
        return;
    }

    info!("Shutdown signal received, draining connections");
}
