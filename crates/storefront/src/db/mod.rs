//! Database operations for storefront `PostgreSQL`.
//!
//! # Tables
//!
//! - `products` - Catalog (managed externally, read-only here)
//! - `orders` - Committed purchases
//! - `order_items` - Order lines
//! - `profiles` - Customer contact details (prefill + best-effort upsert)
//! - `sessions` - Tower-sessions storage (carts + auth identity)
//!
//! Queries are plain runtime queries mapped through `FromRow` row structs,
//! then converted into domain models; a row that fails conversion surfaces
//! as [`RepositoryError::DataCorruption`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run with
//! `sqlx migrate run` against the storefront database.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod orders;
pub mod products;
pub mod profiles;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use profiles::ProfileRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
