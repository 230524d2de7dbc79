/// Database models for Mercado
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, roles, and notification preferences (`usuarios`)
/// - `product`: Product catalog and stock levels (`produtos`)
/// - `product_image`: Image associations for products (`produto_imagens`)
///
/// # Example
///
/// ```no_run
/// use mercado_shared::models::user::{CreateUser, User, UserRole};
/// use mercado_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     name: "Maria Silva".to_string(),
///     email: "maria@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Customer,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod product;
pub mod product_image;
pub mod user;
