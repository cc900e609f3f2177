//! Business services for the storefront.

pub mod checkout;
pub mod payment;

pub use checkout::{CheckoutError, CheckoutForm, CheckoutService, FieldErrors, OrderDraft};
pub use payment::{OrderStore, PaymentError, PaymentProvider, PaymentService, SimulatedUpiProvider};
