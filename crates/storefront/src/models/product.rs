//! Product domain types.
//!
//! Products are owned by the catalog and read-only from the storefront's
//! perspective; stock and availability only change through the managed
//! backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posie_core::{Price, ProductId};

/// Stock quantity below which a product shows a "low stock" badge.
const LOW_STOCK_THRESHOLD: u32 = 5;

/// A catalog product (read-only snapshot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Short description shown on product cards.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Image reference (asset path or absolute URL).
    pub image_url: String,
    /// Category slug (e.g., "scrunchies", "phone-charms").
    pub category: String,
    /// Units currently in stock.
    pub stock_quantity: u32,
    /// Whether the product is offered for sale at all.
    pub is_available: bool,
    /// When the product was added to the catalog.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.is_available && self.stock_quantity > 0
    }

    /// Badge level for product listings.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        if !self.is_available || self.stock_quantity == 0 {
            StockLevel::SoldOut
        } else if self.stock_quantity < LOW_STOCK_THRESHOLD {
            StockLevel::LowStock
        } else {
            StockLevel::InStock
        }
    }
}

/// Stock badge shown on product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    SoldOut,
    LowStock,
    InStock,
}
