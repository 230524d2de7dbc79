/// Authentication utilities
///
/// This module provides the authentication primitives used by the API:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: Bearer token generation and validation
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Tokens**: HS256-signed JWTs, stateless validation, no server-side
///   revocation list
/// - **Constant-time Comparison**: verification goes through the argon2
///   crate's constant-time primitives
///
/// # Example
///
/// ```
/// use mercado_shared::auth::password::{hash_password, verify_password};
/// use mercado_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use mercado_shared::models::user::UserRole;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(42, UserRole::Customer, TokenType::Access);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(validated.sub, 42);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```

pub mod jwt;
pub mod password;
