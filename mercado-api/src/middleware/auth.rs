/// Bearer-token authentication extractors
///
/// Protected handlers take [`AuthUser`] (any valid access token) or
/// [`AdminUser`] (access token with the admin role) as an argument. The
/// extractor reads the `Authorization` header, validates the JWT against
/// the configured secret, and rejects with an enveloped error:
///
/// - missing header → 401
/// - scheme other than `Bearer` → 400
/// - invalid or expired token, or refresh token → 401
/// - valid token without the admin role (for `AdminUser`) → 403
///
/// # Example
///
/// ```rust,ignore
/// async fn update_stock(
///     State(state): State<AppState>,
///     AdminUser(admin): AdminUser,
///     Path(id): Path<i64>,
///     Json(req): Json<StockUpdateRequest>,
/// ) -> ApiResult<Json<Envelope<Product>>> {
///     // admin.id / admin.role available here
/// }
/// ```

use crate::{app::AppState, error::ApiError};
use axum::{extract::FromRequestParts, http::request::Parts};
use mercado_shared::auth::jwt;
use mercado_shared::models::user::UserRole;

/// Identity extracted from a validated access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// Authenticated user id
    pub id: i64,

    /// Role carried by the token
    pub role: UserRole,
}

impl AuthUser {
    /// Whether the token carries the admin role
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Identity extracted from a validated access token with the admin role
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Token de acesso ausente".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::BadRequest("Esperado token Bearer".to_string()))?;

        let claims = jwt::validate_access_token(token, state.jwt_secret())?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(ApiError::Forbidden(
                "Acesso restrito a administradores".to_string(),
            ));
        }

        Ok(AdminUser(user))
    }
}
