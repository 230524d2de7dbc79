/// Image associations for products (`produto_imagens`)
///
/// Rows reference `produtos` with ON DELETE CASCADE, so removing a product
/// removes its images as well.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

const IMAGE_COLUMNS: &str = "id, produto_id, url, position, created_at";

/// An image associated with a product
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductImage {
    /// Unique image id (auto-increment)
    pub id: i64,

    /// Owning product id
    pub produto_id: i64,

    /// Image URL
    pub url: String,

    /// Sort position within the product's gallery
    pub position: i32,

    /// When the association was created
    pub created_at: DateTime<Utc>,
}

/// Input for associating an image with a product
#[derive(Debug, Clone)]
pub struct CreateProductImage {
    /// Owning product id
    pub produto_id: i64,

    /// Image URL
    pub url: String,

    /// Sort position (0-based)
    pub position: i32,
}

impl ProductImage {
    /// Associates an image with a product and returns the persisted row
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist (foreign key) or the
    /// database connection fails.
    pub async fn create(pool: &MySqlPool, data: CreateProductImage) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO produto_imagens (produto_id, url, position) VALUES (?, ?, ?)",
        )
        .bind(data.produto_id)
        .bind(data.url)
        .bind(data.position)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;

        let query = format!("SELECT {} FROM produto_imagens WHERE id = ?", IMAGE_COLUMNS);

        sqlx::query_as::<_, ProductImage>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Lists the images of a product, ordered by position
    pub async fn list_by_product(
        pool: &MySqlPool,
        produto_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM produto_imagens WHERE produto_id = ? ORDER BY position, id",
            IMAGE_COLUMNS
        );

        sqlx::query_as::<_, ProductImage>(&query)
            .bind(produto_id)
            .fetch_all(pool)
            .await
    }

    /// Removes an image association
    ///
    /// Scoped by `produto_id` so an image can only be removed through the
    /// product it belongs to. Returns false if nothing matched.
    pub async fn delete(pool: &MySqlPool, produto_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM produto_imagens WHERE id = ? AND produto_id = ?")
            .bind(id)
            .bind(produto_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
