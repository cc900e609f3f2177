//! Product catalog route handlers.

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::models::{Product, StockLevel};
use crate::state::AppState;

/// Query parameters for the catalog listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict the listing to one category.
    pub category: Option<String>,
}

/// Product display data with its derived stock badge.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub stock_level: StockLevel,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let stock_level = product.stock_level();
        Self {
            product,
            stock_level,
        }
    }
}

/// `GET /products` - Catalog listing, newest first, optionally filtered by
/// category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category.as_deref())
        .await?;

    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use posie_core::{Price, ProductId};

    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::new_v4(),
            name: "Tote Bag".to_string(),
            description: "Canvas tote bag".to_string(),
            price: Price::from_rupees(599).unwrap(),
            image_url: "tote.jpg".to_string(),
            category: "bags".to_string(),
            stock_quantity: stock,
            is_available: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_view_carries_stock_badge() {
        assert_eq!(
            ProductView::from(product(0)).stock_level,
            StockLevel::SoldOut
        );
        assert_eq!(
            ProductView::from(product(3)).stock_level,
            StockLevel::LowStock
        );
        assert_eq!(
            ProductView::from(product(20)).stock_level,
            StockLevel::InStock
        );
    }
}
