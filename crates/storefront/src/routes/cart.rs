//! Cart route handlers.
//!
//! Every mutation re-reads the product row first so stock checks run
//! against the current catalog, then loads the cart from the session,
//! applies the change, and saves it back.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use posie_core::ProductId;

use crate::cart::{Cart, CartLine, load_cart, save_cart};
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            quantity: line.quantity,
            price: line.price.to_string(),
            line_total: line.line_total().to_string(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.total_price().to_string(),
            item_count: cart.total_items(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody {
    pub product_id: ProductId,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartBody {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartBody {
    pub product_id: ProductId,
}

/// `GET /cart` - Current cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await;
    Ok(Json(CartView::from(&cart)))
}

/// `GET /cart/count` - Badge count of units in the cart.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<Value>> {
    let cart = load_cart(&session).await;
    Ok(Json(json!({ "count": cart.total_items() })))
}

/// `POST /cart/add` - Add one unit of a product.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartBody>,
) -> Result<Json<CartView>> {
    let product = ProductRepository::new(state.pool())
        .get(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let mut cart = load_cart(&session).await;
    cart.add_item(&product)?;
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// `POST /cart/update` - Set a line's quantity (clamped to current stock;
/// 0 removes the line).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<UpdateCartBody>,
) -> Result<Json<CartView>> {
    let product = ProductRepository::new(state.pool())
        .get(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let mut cart = load_cart(&session).await;
    cart.update_quantity(product.id, body.quantity, product.stock_quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// `POST /cart/remove` - Drop a product's line entirely.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(body): Json<RemoveFromCartBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.remove_item(body.product_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}
