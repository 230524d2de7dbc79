/// JWT token generation and validation module
///
/// This module provides the bearer tokens used by the API. Tokens are
/// signed with HS256 and validated statelessly: there is no server-side
/// revocation list, a token is good until it expires.
///
/// # Token Types
///
/// - **Access Token**: short-lived (24h), presented on protected routes
/// - **Refresh Token**: long-lived (30d), exchanged for new access tokens
///
/// # Example
///
/// ```
/// use mercado_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use mercado_shared::models::user::UserRole;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, UserRole::Admin, TokenType::Access);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, 42);
/// assert_eq!(validated.role, UserRole::Admin);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```

use crate::models::user::UserRole;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped into every token
const ISSUER: &str = "mercado";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 24 hours)
    Access,

    /// Refresh token (long-lived, 30 days)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }
}

/// JWT claims structure
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the custom
/// `role` and `token_type` claims the API needs for authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Issuer - always "mercado"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Account role at issue time (custom claim)
    pub role: UserRole,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with default expiration for the token type
    pub fn new(user_id: i64, role: UserRole, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, role, token_type, token_type.default_expiration())
    }

    /// Creates claims with custom expiration
    pub fn with_expiration(
        user_id: i64,
        role: UserRole,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            role,
            token_type,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret. The secret should
/// be at least 32 bytes and come from the environment, never from source.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiration, not-before, and issuer.
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens, `JwtError::InvalidIssuer`
/// when the issuer does not match, `JwtError::ValidationError` otherwise.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates token and checks it's an access token
///
/// Used by the auth middleware: refresh tokens must not be accepted on
/// protected routes.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::ValidationError(
            "Expected access token, got refresh token".to_string(),
        ));
    }

    Ok(claims)
}

/// Validates token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::ValidationError(
            "Expected refresh token, got access token".to_string(),
        ));
    }

    Ok(claims)
}

/// Refreshes an access token using a refresh token
///
/// Takes a valid refresh token and generates a new access token with the
/// same user and role context.
///
/// # Errors
///
/// Returns an error if the refresh token is invalid or expired
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::new(refresh_claims.sub, refresh_claims.role, TokenType::Access);

    create_token(&access_claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(30));
    }

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(7, UserRole::Customer, TokenType::Access);

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, UserRole::Customer);
        assert_eq!(claims.iss, "mercado");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(7, UserRole::Admin, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, 7);
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, UserRole::Customer, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            1,
            UserRole::Customer,
            TokenType::Access,
            Duration::seconds(-3600),
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_access_token_rejects_refresh() {
        let refresh_claims = Claims::new(1, UserRole::Customer, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, SECRET).unwrap();

        assert!(validate_access_token(&refresh_token, SECRET).is_err());
    }

    #[test]
    fn test_validate_refresh_token_rejects_access() {
        let access_claims = Claims::new(1, UserRole::Customer, TokenType::Access);
        let access_token = create_token(&access_claims, SECRET).unwrap();

        assert!(validate_refresh_token(&access_token, SECRET).is_err());
    }

    #[test]
    fn test_refresh_access_token() {
        let refresh_claims = Claims::new(9, UserRole::Admin, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, SECRET).unwrap();

        let new_access_token = refresh_access_token(&refresh_token, SECRET).unwrap();

        let validated = validate_access_token(&new_access_token, SECRET).unwrap();
        assert_eq!(validated.sub, 9);
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_with_access_token_fails() {
        let access_claims = Claims::new(1, UserRole::Customer, TokenType::Access);
        let access_token = create_token(&access_claims, SECRET).unwrap();

        assert!(refresh_access_token(&access_token, SECRET).is_err());
    }
}
