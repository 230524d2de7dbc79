/// Application state and router construction
///
/// The router is built once at startup from the loaded configuration and a
/// connected pool. Handlers receive [`AppState`] through axum's `State`
/// extractor; authentication happens per-handler through the extractors in
/// [`crate::middleware::auth`], since several paths mix public reads with
/// admin-only writes.

use crate::{
    config::Config,
    middleware::security::SecurityHeadersLayer,
    routes,
};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::MySqlPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: MySqlPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates the application state
    pub fn new(db: MySqlPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Secret used for signing and validating tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete application router
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config);
    let security = SecurityHeadersLayer::new(state.config.api.production);

    Router::new()
        .nest("/api", api_routes())
        .layer(cors)
        .layer(security)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// All API routes under `/api`
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes())
        .nest("/produtos", product_routes())
        .nest("/notificacoes", notification_routes())
        .nest("/monitoring", monitoring_routes())
}

/// Authentication routes (all public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
}

/// Product catalog routes
///
/// Reads are public; writes require the admin role, enforced by the
/// `AdminUser` extractor in each write handler.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/:id",
            get(routes::products::get_product)
                .put(routes::products::update_product)
                .delete(routes::products::delete_product),
        )
        .route("/:id/estoque", put(routes::products::update_stock))
        .route(
            "/:id/imagens",
            get(routes::products::list_images).post(routes::products::add_image),
        )
        .route(
            "/:id/imagens/:image_id",
            axum::routing::delete(routes::products::remove_image),
        )
}

/// Notification preference routes (require authentication)
fn notification_routes() -> Router<AppState> {
    Router::new().route(
        "/preferencias",
        get(routes::notifications::get_preferences).put(routes::notifications::update_preferences),
    )
}

/// Operational monitoring routes (admin only)
fn monitoring_routes() -> Router<AppState> {
    Router::new()
        .route("/database", get(routes::monitoring::database_status))
        .route("/migrations", get(routes::monitoring::migration_status))
}

/// Builds the CORS layer from the configured origins
///
/// A single `*` entry (the default) yields a permissive layer for
/// development; anything else restricts to the listed origins.
fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins = &config.api.cors_origins;

    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, JwtConfig};

    fn config_with_origins(origins: Vec<&str>) -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_origins: origins.into_iter().map(String::from).collect(),
                production: false,
            },
            database: DatabaseConfig {
                url: "mysql://root@localhost:3306/mercado".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
        }
    }

    // connect_lazy spawns pool maintenance tasks, so a runtime is required
    #[tokio::test]
    async fn test_router_builds_with_lazy_pool() {
        let pool = MySqlPool::connect_lazy("mysql://root@localhost:3306/mercado")
            .expect("lazy pool");
        let state = AppState::new(pool, config_with_origins(vec!["*"]));

        // Panics on duplicate or malformed route definitions
        let _router = build_router(state);
    }

    #[test]
    fn test_cors_layer_with_explicit_origins() {
        let config = config_with_origins(vec!["https://loja.example.com"]);
        let _layer = build_cors_layer(&config);
    }
}
