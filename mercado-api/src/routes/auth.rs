/// Authentication routes
///
/// Registration, login, and token refresh. All three are public; they are
/// the only routes that hand out tokens. Failed logins answer with the
/// same message whether the email is unknown or the password is wrong, so
/// the endpoint cannot be used to probe which emails exist.

use crate::{
    app::AppState,
    envelope::{Envelope, FieldError},
    error::{validation_errors, ApiError, ApiResult},
    extract::Json,
};
use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use mercado_shared::auth::{jwt, password};
use mercado_shared::models::user::{CreateUser, User, UserRole};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Nome é obrigatório"))]
    pub name: String,

    /// Email address, bounded by the VARCHAR(255) column
    #[validate(
        email(message = "E-mail inválido"),
        length(max = 255, message = "E-mail muito longo")
    )]
    pub email: String,

    /// Plaintext password, validated for strength before hashing
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    pub password: String,
}

/// Token refresh request body
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token issued at login or registration
    #[validate(length(min = 1, message = "Refresh token é obrigatório"))]
    pub refresh_token: String,
}

/// Public view of a user account, without the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User id
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Account role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Response carrying the authenticated user and a token pair
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Authenticated account
    pub user: UserResponse,

    /// Short-lived bearer token for protected routes
    pub access_token: String,

    /// Long-lived token for `POST /api/auth/refresh`
    pub refresh_token: String,
}

/// Response for a token refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Newly issued access token
    pub access_token: String,
}

/// `POST /api/auth/register`
///
/// Creates a customer account. The admin role is only ever assigned
/// directly in the database, never through this endpoint.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<AuthResponse>>)> {
    req.validate().map_err(validation_errors)?;

    if let Err(reason) = password::validate_password_strength(&req.password) {
        tracing::debug!(reason, "Rejected weak registration password");
        return Err(ApiError::ValidationError(vec![FieldError {
            campo: "password".to_string(),
            mensagem: "A senha deve ter ao menos 8 caracteres, com letra maiúscula, \
                       minúscula e dígito"
                .to_string(),
        }]));
    }

    let password_hash = password::hash_password(&req.password)?;

    // Duplicate emails surface as a unique-constraint violation and map to 409
    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: UserRole::Customer,
        },
    )
    .await?;

    let response = issue_tokens(user, state.jwt_secret())?;

    tracing::info!(user_id = response.user.id, "User registered");

    Ok((StatusCode::CREATED, Json(Envelope::ok(response))))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<AuthResponse>>> {
    req.validate().map_err(validation_errors)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Credenciais inválidas".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Credenciais inválidas".to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    let user_id = user.id;
    let response = issue_tokens(user, state.jwt_secret())?;

    tracing::info!(user_id, "User logged in");

    Ok(Json(Envelope::ok(response)))
}

/// `POST /api/auth/refresh`
///
/// Exchanges a refresh token for a new access token. The refresh token
/// itself is not rotated.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<Envelope<RefreshResponse>>> {
    req.validate().map_err(validation_errors)?;

    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(Envelope::ok(RefreshResponse { access_token })))
}

/// Signs an access/refresh token pair for a freshly authenticated user
fn issue_tokens(user: User, secret: &str) -> Result<AuthResponse, ApiError> {
    let access_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, secret)?;
    let refresh_token = jwt::create_token(&refresh_claims, secret)?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            name: "Maria".to_string(),
            email: "not-an-email".to_string(),
            password: "Senha123".to_string(),
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_overlong_email() {
        // VARCHAR(255): anything longer must fail validation, not the INSERT
        let req = RegisterRequest {
            name: "Maria".to_string(),
            email: format!("{}@example.com", "a".repeat(250)),
            password: "Senha123".to_string(),
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_password() {
        let req = LoginRequest {
            email: "maria@example.com".to_string(),
            password: String::new(),
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_user_response_omits_password_hash() {
        let user = User {
            id: 1,
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$abc$def".to_string(),
            role: UserRole::Customer,
            notify_email: true,
            notify_sms: false,
            notify_push: false,
            push_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "maria@example.com");
        assert_eq!(json["role"], "customer");
    }
}
