/// Router-level tests
///
/// These exercise everything that happens before a query hits the
/// database: routing, authentication extractors, role checks, and request
/// validation. The pool is built lazily against an unreachable address,
/// so any test that accidentally reaches the database fails loudly
/// instead of passing against real data.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mercado_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, JwtConfig},
};
use mercado_shared::auth::jwt::{create_token, Claims, TokenType};
use mercado_shared::models::user::UserRole;
use sqlx::MySqlPool;
use tower::ServiceExt;

const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

fn test_router() -> Router {
    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "mysql://nobody@127.0.0.1:1/unreachable".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
    };

    let pool = MySqlPool::connect_lazy(&config.database.url).expect("lazy pool");

    build_router(AppState::new(pool, config))
}

fn token_for(role: UserRole) -> String {
    let claims = Claims::new(1, role, TokenType::Access);
    create_token(&claims, JWT_SECRET).expect("token")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let response = test_router()
        .oneshot(json_request(
            Method::PUT,
            "/api/produtos/1/estoque",
            None,
            r#"{"quantidade": 5}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["sucesso"], false);
    assert!(body["mensagem"].is_string());
}

#[tokio::test]
async fn non_bearer_scheme_is_bad_request() {
    let mut request = json_request(
        Method::PUT,
        "/api/produtos/1/estoque",
        None,
        r#"{"quantidade": 5}"#,
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Basic bWFyaWE6c2VuaGE=".parse().unwrap(),
    );

    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["sucesso"], false);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let response = test_router()
        .oneshot(json_request(
            Method::PUT,
            "/api/produtos/1/estoque",
            Some("not-a-jwt"),
            r#"{"quantidade": 5}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customer_cannot_reach_admin_routes() {
    let token = token_for(UserRole::Customer);

    let response = test_router()
        .oneshot(json_request(
            Method::PUT,
            "/api/produtos/1/estoque",
            Some(&token),
            r#"{"quantidade": 5}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["sucesso"], false);
    assert_eq!(body["mensagem"], "Acesso restrito a administradores");
}

#[tokio::test]
async fn customer_cannot_reach_monitoring() {
    let token = token_for(UserRole::Customer);

    let response = test_router()
        .oneshot(json_request(
            Method::GET,
            "/api/monitoring/database",
            Some(&token),
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn refresh_token_is_rejected_on_protected_routes() {
    let claims = Claims::new(1, UserRole::Admin, TokenType::Refresh);
    let token = create_token(&claims, JWT_SECRET).expect("token");

    let response = test_router()
        .oneshot(json_request(
            Method::PUT,
            "/api/produtos/1/estoque",
            Some(&token),
            r#"{"quantidade": 5}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn negative_stock_quantity_is_a_validation_error() {
    let token = token_for(UserRole::Admin);

    let response = test_router()
        .oneshot(json_request(
            Method::PUT,
            "/api/produtos/1/estoque",
            Some(&token),
            r#"{"quantidade": -3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["sucesso"], false);
    assert_eq!(body["mensagem"], "Falha de validação");
    assert_eq!(body["erros"][0]["campo"], "quantidade");
}

#[tokio::test]
async fn oversized_stock_quantity_is_a_validation_error() {
    let token = token_for(UserRole::Admin);

    let response = test_router()
        .oneshot(json_request(
            Method::PUT,
            "/api/produtos/1/estoque",
            Some(&token),
            r#"{"quantidade": 999999999999}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["erros"][0]["campo"], "quantidade");
}

#[tokio::test]
async fn non_numeric_stock_quantity_answers_in_the_envelope() {
    let token = token_for(UserRole::Admin);

    let response = test_router()
        .oneshot(json_request(
            Method::PUT,
            "/api/produtos/1/estoque",
            Some(&token),
            r#"{"quantidade": "abc"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let body = body_json(response).await;
    assert_eq!(body["sucesso"], false);
    assert_eq!(body["mensagem"], "Falha de validação");
    assert!(body["erros"][0]["mensagem"].is_string());
}

#[tokio::test]
async fn malformed_json_body_answers_in_the_envelope() {
    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            "{not json",
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["sucesso"], false);
    assert!(body["erros"][0]["mensagem"].is_string());
}

#[tokio::test]
async fn negative_price_is_a_validation_error() {
    let token = token_for(UserRole::Admin);

    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/produtos",
            Some(&token),
            r#"{"name": "Caneca", "price": "-5.00"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["erros"][0]["campo"], "price");
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            r#"{"name": "Maria", "email": "not-an-email", "password": "Senha123"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["erros"][0]["campo"], "email");
}

#[tokio::test]
async fn register_rejects_weak_password() {
    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            r#"{"name": "Maria", "email": "maria@example.com", "password": "fraca"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["erros"][0]["campo"], "password");
}

#[tokio::test]
async fn login_rejects_invalid_email_shape() {
    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            r#"{"email": "nope", "password": "whatever"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn refresh_rejects_garbage_token() {
    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/refresh",
            None,
            r#"{"refresh_token": "not-a-jwt"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let token = token_for(UserRole::Customer);

    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/refresh",
            None,
            &format!(r#"{{"refresh_token": "{}"}}"#, token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/api/pedidos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn negative_image_position_is_a_validation_error() {
    let token = token_for(UserRole::Admin);

    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/produtos/1/imagens",
            Some(&token),
            r#"{"url": "https://cdn.example.com/p/1/a.jpg", "position": -1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["erros"][0]["campo"], "position");
}

#[tokio::test]
async fn security_headers_present_on_responses() {
    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            r#"{"email": "nope", "password": ""}"#,
        ))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
}
