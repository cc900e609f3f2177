//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database row types.

pub mod order;
pub mod product;
pub mod profile;
pub mod session;

pub use order::{Order, OrderItem, OrderItemDetail, OrderWithItems};
pub use product::{Product, StockLevel};
pub use profile::CustomerProfile;
pub use session::{CurrentUser, session_keys};
