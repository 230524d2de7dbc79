/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, which converts into the
/// response envelope with `sucesso: false` and an appropriate status code.

use crate::envelope::{Envelope, FieldError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate email
    Conflict(String),

    /// Unprocessable entity (422), validation errors
    ValidationError(Vec<FieldError>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Envelope::error(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, Envelope::error(msg)),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, Envelope::error(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, Envelope::error(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, Envelope::error(msg)),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Envelope::validation("Falha de validação", errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::error("Erro interno do servidor"),
                )
            }
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, Envelope::error(msg)),
        };

        (status, Json::<Envelope<()>>(body)).into_response()
    }
}

/// Converts `validator` derive output into the validation envelope
pub fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<FieldError> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                campo: field.to_string(),
                mensagem: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Valor inválido".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(errors)
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Registro não encontrado".to_string()),
            sqlx::Error::Database(db_err) => {
                // MySQL duplicate entry: errno 1062 / SQLSTATE 23000
                let is_duplicate = db_err
                    .code()
                    .map(|c| c == "23000" || c == "1062")
                    .unwrap_or(false)
                    || db_err.message().contains("Duplicate entry");

                if is_duplicate {
                    return ApiError::Conflict("E-mail já cadastrado".to_string());
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert JSON body rejections to enveloped validation errors
///
/// Used as the rejection type of [`crate::extract::Json`], so a body that
/// is not valid JSON or does not match the request type answers with the
/// validation envelope instead of axum's plain-text message.
impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::ValidationError(vec![FieldError {
            campo: "body".to_string(),
            mensagem: rejection.body_text(),
        }])
    }
}

/// Convert JWT errors to API errors
impl From<mercado_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: mercado_shared::auth::jwt::JwtError) -> Self {
        use mercado_shared::auth::jwt::JwtError;

        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expirado".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Token inválido".to_string()),
            JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            JwtError::ValidationError(_) => ApiError::Unauthorized("Token inválido".to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<mercado_shared::auth::password::PasswordError> for ApiError {
    fn from(err: mercado_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}
