//! Checkout assembler.
//!
//! Converts a non-empty cart plus a validated delivery form into an order
//! with its line items. Assembly is split in two: [`OrderDraft::assemble`]
//! is pure (everything derivable without I/O, including the client-generated
//! order ID and payment reference), and [`CheckoutService::submit`] persists
//! the draft in a single transaction.
//!
//! The profile upsert afterwards is best-effort: its failure is logged and
//! never surfaced, and the committed order stands.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use posie_core::{
    Address, Email, FullName, OrderId, OrderItemId, OrderStatus, PaymentStatus, Phone, UserId,
};

use crate::cart::Cart;
use crate::db::{OrderRepository, ProfileRepository, RepositoryError};
use crate::models::{Order, OrderItem};

/// Days between order creation and the promised delivery date.
const DELIVERY_WINDOW_DAYS: i64 = 7;

/// Raw delivery form as submitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Per-field validation messages, one per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl FieldErrors {
    /// Whether every field validated cleanly.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
    }
}

/// A delivery form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedCheckout {
    pub full_name: FullName,
    pub phone: Phone,
    pub email: Email,
    pub address: Address,
}

/// Errors from checkout submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more form fields are invalid; nothing was submitted.
    #[error("checkout form validation failed")]
    Validation(FieldErrors),

    /// The cart has no lines; there is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The order (or its items) could not be persisted. The cart is left
    /// intact so the user can retry.
    #[error("failed to create order")]
    OrderCreation(#[source] RepositoryError),
}

impl CheckoutForm {
    /// Validate every field, collecting one message per invalid field.
    ///
    /// Validation is resolved entirely locally; an invalid form never
    /// reaches the backend.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] carrying the per-field messages.
    pub fn validate(&self) -> Result<ValidatedCheckout, CheckoutError> {
        let mut errors = FieldErrors::default();

        let full_name = FullName::parse(&self.full_name)
            .map_err(|e| errors.full_name = Some(e.to_string()))
            .ok();
        let phone = Phone::parse(&self.phone)
            .map_err(|e| errors.phone = Some(e.to_string()))
            .ok();
        let email = Email::parse(&self.email)
            .map_err(|e| errors.email = Some(e.to_string()))
            .ok();
        let address = Address::parse(&self.address)
            .map_err(|e| errors.address = Some(e.to_string()))
            .ok();

        match (full_name, phone, email, address) {
            (Some(full_name), Some(phone), Some(email), Some(address)) => Ok(ValidatedCheckout {
                full_name,
                phone,
                email,
                address,
            }),
            _ => Err(CheckoutError::Validation(errors)),
        }
    }
}

/// A fully assembled, not-yet-persisted order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// The order row to insert.
    pub order: Order,
    /// One item per cart line, already referencing the order ID.
    pub items: Vec<OrderItem>,
}

impl OrderDraft {
    /// Assemble an order from a validated form and a non-empty cart.
    ///
    /// Pure: the order ID and payment reference are generated here, the
    /// total is the cart total at this instant, and the expected delivery
    /// date is `now` + 7 days. Later cart mutations cannot affect the draft.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn assemble(
        user_id: UserId,
        contact: ValidatedCheckout,
        cart: &Cart,
        now: DateTime<Utc>,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order_id = OrderId::new_v4();

        let order = Order {
            id: order_id,
            user_id,
            full_name: contact.full_name,
            phone: contact.phone,
            email: contact.email,
            address: contact.address,
            total_amount: cart.total_price(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_reference: Uuid::new_v4(),
            expected_delivery_date: now + Duration::days(DELIVERY_WINDOW_DAYS),
            created_at: now,
        };

        let items = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                id: OrderItemId::new_v4(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
            })
            .collect();

        Ok(Self { order, items })
    }
}

/// Service that turns carts into persisted orders.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Submit a checkout: validate, assemble, persist, upsert the profile.
    ///
    /// On success the created order is returned; the caller clears the cart
    /// and proceeds to payment. On any error the cart is untouched.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`] if the form is invalid (no I/O done).
    /// - [`CheckoutError::EmptyCart`] if the cart has no lines.
    /// - [`CheckoutError::OrderCreation`] if persisting the order fails.
    pub async fn submit(
        &self,
        form: &CheckoutForm,
        cart: &Cart,
        user_id: UserId,
    ) -> Result<Order, CheckoutError> {
        let contact = form.validate()?;
        let draft = OrderDraft::assemble(user_id, contact, cart, Utc::now())?;

        OrderRepository::new(self.pool)
            .create_with_items(&draft.order, &draft.items)
            .await
            .map_err(CheckoutError::OrderCreation)?;

        // Best-effort: the order is already committed, so a profile failure
        // is logged and swallowed rather than unwinding the checkout.
        if let Err(e) = ProfileRepository::new(self.pool)
            .upsert(
                user_id,
                &draft.order.full_name,
                &draft.order.phone,
                &draft.order.email,
                &draft.order.address,
            )
            .await
        {
            warn!(order_id = %draft.order.id, "Profile update failed after checkout: {e}");
        }

        Ok(draft.order)
    }
}
