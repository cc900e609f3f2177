//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Nothing here is process-fatal: every failure maps to a status code and a
//! JSON body the client can act on (re-render the form, retry payment,
//! redirect to sign-in).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::cart::CartError;
use crate::db::RepositoryError;
use crate::services::{CheckoutError, PaymentError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cart mutation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout submission failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Payment confirmation failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session store error: {e}"))
    }
}

impl AppError {
    /// Whether this is a server-side fault worth capturing to Sentry.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Checkout(CheckoutError::OrderCreation(_))
                | Self::Payment(PaymentError::Repository(_) | PaymentError::UpdateFailed)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(CartError::OutOfStock { .. }) => StatusCode::CONFLICT,
            Self::Checkout(err) => match err {
                CheckoutError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::OrderCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Payment(err) => match err {
                PaymentError::OrderNotFound => StatusCode::NOT_FOUND,
                PaymentError::Declined(_) | PaymentError::UpdateFailed => StatusCode::BAD_GATEWAY,
                PaymentError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Database(_) | Self::Internal(_) => json!({
                "error": "Internal server error"
            }),
            Self::Checkout(CheckoutError::Validation(fields)) => json!({
                "error": "Please correct the highlighted fields",
                "fields": fields,
            }),
            Self::Checkout(CheckoutError::EmptyCart) => json!({
                "error": "Your cart is empty"
            }),
            Self::Checkout(CheckoutError::OrderCreation(_)) => json!({
                "error": "Failed to place order. Please try again."
            }),
            Self::Cart(CartError::OutOfStock { .. }) => json!({
                "error": "This product is out of stock"
            }),
            Self::Payment(err) => match err {
                PaymentError::OrderNotFound => json!({ "error": "Order not found" }),
                PaymentError::Repository(_) => json!({ "error": "Internal server error" }),
                PaymentError::Declined(_) | PaymentError::UpdateFailed => json!({
                    "error": "Payment failed. Please try again."
                }),
            },
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
