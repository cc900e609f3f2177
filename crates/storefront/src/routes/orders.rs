//! Order history and payment route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use posie_core::OrderId;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::OrderWithItems;
use crate::routes::checkout::OrderSummary;
use crate::services::PaymentService;
use crate::state::AppState;

/// An order history entry with its short reference.
#[derive(Debug, Clone, Serialize)]
pub struct OrderHistoryEntry {
    #[serde(flatten)]
    pub order: OrderWithItems,
    pub reference: String,
}

impl From<OrderWithItems> for OrderHistoryEntry {
    fn from(order: OrderWithItems) -> Self {
        let reference = order.order.reference();
        Self { order, reference }
    }
}

/// `GET /orders` - The signed-in user's order history, newest first.
///
/// A user with no orders gets an empty list, not an error.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderHistoryEntry>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(
        orders.into_iter().map(OrderHistoryEntry::from).collect(),
    ))
}

/// `POST /orders/{id}/pay` - Confirm payment for a pending order.
///
/// Runs the external payment flow and flips the order to
/// completed/confirmed. Idempotent: paying an already-paid order returns it
/// unchanged. Orders belonging to other users are reported as not found.
#[instrument(skip_all, fields(user_id = %user.id, %order_id))]
pub async fn pay(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderSummary>> {
    let repo = OrderRepository::new(state.pool());
    let order = PaymentService::new(&repo, state.payments())
        .confirm(order_id, user.id)
        .await?;

    Ok(Json(OrderSummary::from(order)))
}
