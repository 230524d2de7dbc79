/// Product model and database operations
///
/// This module provides the Product model for the `produtos` table,
/// including the stock update used by the admin endpoint.
///
/// # Stock semantics
///
/// Stock writes are unconditional (last-write-wins): there is no version
/// column and no compare-and-swap, so concurrent writers to the same row
/// race and the later write survives. What the API does guarantee is
/// read-your-writes: every mutation re-reads the row it wrote and returns
/// the persisted value, so a successful response always reflects the state
/// the database actually holds.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE produtos (
///     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NULL,
///     price DECIMAL(10, 2) NOT NULL,
///     stock INT NOT NULL DEFAULT 0,
///     category VARCHAR(100) NULL,
///     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, category, created_at, updated_at";

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product id (auto-increment)
    pub id: i64,

    /// Product name
    pub name: String,

    /// Optional long description
    pub description: Option<String>,

    /// Unit price (DECIMAL(10,2))
    pub price: Decimal,

    /// Units in stock; the API rejects negative values before they reach
    /// the database
    pub stock: i32,

    /// Optional category label
    pub category: Option<String>,

    /// When the product was created
    pub created_at: DateTime<Utc>,

    /// When the product was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new product
#[derive(Debug, Clone)]
pub struct CreateProduct {
    /// Product name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Unit price
    pub price: Decimal,

    /// Initial stock quantity (non-negative)
    pub stock: i32,

    /// Optional category label
    pub category: Option<String>,
}

/// Partial update of a product
///
/// Only non-None fields are written. Nullable columns use a nested Option:
/// `Some(None)` clears the column, `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    /// New name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New price
    pub price: Option<Decimal>,

    /// New stock quantity
    pub stock: Option<i32>,

    /// New category (use Some(None) to clear)
    pub category: Option<Option<String>>,
}

impl UpdateProduct {
    /// Whether this update changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category.is_none()
    }
}

impl Product {
    /// Creates a new product and returns the persisted row
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn create(pool: &MySqlPool, data: CreateProduct) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO produtos (name, description, price, stock, category)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.price)
        .bind(data.stock)
        .bind(data.category)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds a product by id
    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM produtos WHERE id = ?", PRODUCT_COLUMNS);

        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists products with pagination, newest first
    pub async fn list(pool: &MySqlPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM produtos ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Counts total number of products
    pub async fn count(pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM produtos")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Updates an existing product
    ///
    /// Only non-None fields in `data` are written. Returns the persisted
    /// row after the write, or None if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: UpdateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !data.is_empty() {
            let mut query = String::from("UPDATE produtos SET updated_at = CURRENT_TIMESTAMP");

            if data.name.is_some() {
                query.push_str(", name = ?");
            }
            if data.description.is_some() {
                query.push_str(", description = ?");
            }
            if data.price.is_some() {
                query.push_str(", price = ?");
            }
            if data.stock.is_some() {
                query.push_str(", stock = ?");
            }
            if data.category.is_some() {
                query.push_str(", category = ?");
            }
            query.push_str(" WHERE id = ?");

            let mut q = sqlx::query(&query);

            if let Some(name) = data.name {
                q = q.bind(name);
            }
            if let Some(description) = data.description {
                q = q.bind(description);
            }
            if let Some(price) = data.price {
                q = q.bind(price);
            }
            if let Some(stock) = data.stock {
                q = q.bind(stock);
            }
            if let Some(category) = data.category {
                q = q.bind(category);
            }

            q.bind(id).execute(pool).await?;
        }

        Self::find_by_id(pool, id).await
    }

    /// Sets the stock quantity for a product (last-write-wins)
    ///
    /// The write is unconditional: no compare-and-swap, no version check.
    /// Returns the persisted row read back after the write, or None if the
    /// product does not exist (in which case no row was mutated).
    ///
    /// The caller is responsible for validating that `quantity` is
    /// non-negative before calling.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn set_stock(
        pool: &MySqlPool,
        id: i64,
        quantity: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        // rows_affected is unreliable here: MySQL reports 0 when the new
        // value equals the old one. Existence is decided by the re-read.
        sqlx::query("UPDATE produtos SET stock = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(quantity)
            .bind(id)
            .execute(pool)
            .await?;

        Self::find_by_id(pool, id).await
    }

    /// Deletes a product by id
    ///
    /// Associated images cascade at the schema level.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
