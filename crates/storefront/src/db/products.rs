//! Product repository (catalog reader).
//!
//! The catalog is owned by the managed backend; this repository only reads.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use posie_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Raw product row as stored.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Price,
    image_url: String,
    category: String,
    stock_quantity: i32,
    is_available: bool,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_domain(self) -> Result<Product, RepositoryError> {
        let stock_quantity = u32::try_from(self.stock_quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative stock quantity for product {}",
                self.id
            ))
        })?;

        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            category: self.category,
            stock_quantity,
            is_available: self.is_available,
            created_at: self.created_at,
        })
    }
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = match category {
            Some(category) => {
                sqlx::query_as(
                    r"
                    SELECT id, name, description, price, image_url, category,
                           stock_quantity, is_available, created_at
                    FROM products
                    WHERE category = $1
                    ORDER BY created_at DESC
                    ",
                )
                .bind(category)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r"
                    SELECT id, name, description, price, image_url, category,
                           stock_quantity, is_available, created_at
                    FROM products
                    ORDER BY created_at DESC
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(ProductRow::into_domain).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, price, image_url, category,
                   stock_quantity, is_available, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_domain).transpose()
    }
}
