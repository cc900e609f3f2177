//! Order domain types.
//!
//! An `Order` is the committed, backend-persisted form of a cart. It is
//! created exactly once at checkout; afterwards only the status pair
//! (`status`, `payment_status`) changes, and only via payment confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use posie_core::{
    Address, Email, FullName, OrderId, OrderItemId, OrderStatus, PaymentStatus, Phone, Price,
    ProductId, UserId,
};

use super::product::Product;

/// A committed purchase record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (generated client-side at checkout).
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Delivery contact name captured at checkout.
    pub full_name: FullName,
    /// Delivery contact phone captured at checkout.
    pub phone: Phone,
    /// Contact email captured at checkout.
    pub email: Email,
    /// Delivery address captured at checkout.
    pub address: Address,
    /// Cart total at submission time; later cart mutations never touch this.
    pub total_amount: Price,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Idempotency token handed to the payment provider, so a retried
    /// confirmation settles at most once.
    pub payment_reference: Uuid,
    /// Promised delivery date (creation time + 7 days).
    pub expected_delivery_date: DateTime<Utc>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Short human-facing order reference (first 8 hex chars of the ID).
    #[must_use]
    pub fn reference(&self) -> String {
        self.id.short()
    }

    /// Whether payment has already settled for this order.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }
}

/// A single line of an order.
///
/// `price` is the unit price captured at order time, independent of later
/// catalog price changes. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Price,
}

/// An order item joined with the current catalog snapshot of its product.
///
/// The product is optional: a product removed from the catalog leaves the
/// order item intact with only its captured fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    /// The immutable order line.
    #[serde(flatten)]
    pub item: OrderItem,
    /// Current product snapshot, if the product still exists.
    pub product: Option<Product>,
}

/// An order with its line items, as shown in order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    /// The order record.
    #[serde(flatten)]
    pub order: Order,
    /// All line items belonging to the order.
    pub items: Vec<OrderItemDetail>,
}
