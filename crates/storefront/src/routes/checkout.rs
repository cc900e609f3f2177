//! Checkout route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{Cart, load_cart, save_cart};
use crate::db::ProfileRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CustomerProfile, Order};
use crate::services::{CheckoutForm, CheckoutService};
use crate::state::AppState;

/// Order summary returned after a successful checkout or payment.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    /// Short human-facing reference shown on the confirmation screen.
    pub reference: String,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        let reference = order.reference();
        Self { order, reference }
    }
}

/// `POST /checkout` - Submit the delivery form against the current cart.
///
/// On success the cart is cleared and the created order is returned with
/// 201; the client proceeds to payment. On any error the cart is untouched.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<OrderSummary>)> {
    let cart = load_cart(&session).await;

    let order = CheckoutService::new(state.pool())
        .submit(&form, &cart, user.id)
        .await?;

    save_cart(&session, &Cart::new()).await?;

    Ok((StatusCode::CREATED, Json(OrderSummary::from(order))))
}

/// `GET /checkout/prefill` - Saved delivery details for form prefill.
///
/// Returns the user's profile from their last checkout, or an empty profile
/// if they have never checked out.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn prefill(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CustomerProfile>> {
    let profile = ProfileRepository::new(state.pool())
        .get(user.id)
        .await?
        .unwrap_or_else(|| CustomerProfile::empty(user.id));

    Ok(Json(profile))
}
