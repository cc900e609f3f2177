//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Products
//! GET  /products               - Catalog listing (?category= filter)
//!
//! # Cart
//! GET  /cart                   - Cart contents
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Cart badge count
//!
//! # Checkout (requires auth)
//! POST /checkout               - Submit delivery form, create order
//! GET  /checkout/prefill       - Saved delivery details for form prefill
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history
//! POST /orders/{id}/pay        - Confirm payment
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/pay", post(orders::pay))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/products", get(products::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::submit))
        .route("/checkout/prefill", get(checkout::prefill))
        // Order history and payment
        .nest("/orders", order_routes())
}
