//! Shopping cart store.
//!
//! The cart is an explicitly owned value, not a global: handlers load it
//! from the session, mutate it, and save it back. Lines are kept in
//! insertion order with at most one line per product; totals are always
//! recomputed from the current lines.
//!
//! Stock handling: adding or updating clamps against the product's current
//! stock quantity. The catalog is re-read before every mutation; checkout
//! itself does not re-validate stock.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_sessions::Session;
use tracing::warn;

use posie_core::{Price, ProductId};

use crate::models::{Product, session_keys};

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is unavailable, has no stock, or the cart already holds
    /// all remaining stock.
    #[error("this product is out of stock")]
    OutOfStock {
        /// The product that could not be added.
        product_id: ProductId,
    },
}

/// A single cart line.
///
/// Display fields (name, price, image) are denormalized at add-time so the
/// cart renders without re-fetching the catalog; the price shown is the
/// price the customer saw when they added the item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Product name at add-time.
    pub name: String,
    /// Unit price at add-time.
    pub price: Price,
    /// Image reference at add-time.
    pub image_url: String,
    /// Units in the cart; always at least 1 (a line at 0 is removed).
    pub quantity: u32,
}

impl CartLine {
    /// Line total (unit price x quantity), saturating on overflow.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.saturating_mul(self.quantity)
    }
}

/// The shopping cart: an ordered sequence of lines, one per product.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Add one unit of a product.
    ///
    /// Inserts a new line at quantity 1, or increments the existing line.
    /// The increment is capped at the product's current stock quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] if the product is unavailable, has
    /// zero stock, or the cart already holds all remaining stock.
    pub fn add_item(&mut self, product: &Product) -> Result<(), CartError> {
        if !product.in_stock() {
            return Err(CartError::OutOfStock {
                product_id: product.id,
            });
        }

        if let Some(line) = self.line_mut(product.id) {
            if line.quantity >= product.stock_quantity {
                return Err(CartError::OutOfStock {
                    product_id: product.id,
                });
            }
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image_url: product.image_url.clone(),
                quantity: 1,
            });
        }

        Ok(())
    }

    /// Remove a product's line entirely. No-op if the product is not in the cart.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Set a line's quantity, clamped to the product's current stock.
    ///
    /// A requested quantity of 0 (or a stock of 0) removes the line, exactly
    /// as [`Self::remove_item`] would. No-op if the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32, stock_quantity: u32) {
        let applied = quantity.min(stock_quantity);
        if applied == 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(line) = self.line_mut(product_id) {
            line.quantity = applied;
        }
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Total price across all lines, saturating on overflow.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines
            .iter()
            .fold(Price::ZERO, |acc, line| acc.saturating_add(line.line_total()))
    }

    /// Look up a line by product.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

// =============================================================================
// Session Persistence
// =============================================================================

/// Load the cart from the session.
///
/// Returns an empty cart if none is stored; a cart that fails to deserialize
/// is logged and replaced rather than failing the request.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!("Failed to load cart from session: {e}");
            Cart::new()
        }
    }
}

/// Save the cart back to the session.
///
/// # Errors
///
/// Returns the session store error if the write fails.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use posie_core::Price;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use super::*;

    fn product(price: &str, stock: u32, available: bool) -> Product {
        Product {
            id: ProductId::new_v4(),
            name: "Peony Flower Clip".to_string(),
            description: "Fabric peony hair clip".to_string(),
            price: Price::new(Decimal::from_str(price).unwrap()).unwrap(),
            image_url: "peony-clip.jpg".to_string(),
            category: "flower-clips".to_string(),
            stock_quantity: stock,
            is_available: available,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_unavailable_product_fails_and_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let hidden = product("199.00", 10, false);
        let sold_out = product("199.00", 0, true);

        assert!(matches!(
            cart.add_item(&hidden),
            Err(CartError::OutOfStock { .. })
        ));
        assert!(matches!(
            cart.add_item(&sold_out),
            Err(CartError::OutOfStock { .. })
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_add_inserts_then_increments() {
        let mut cart = Cart::new();
        let p = product("149.00", 10, true);

        cart.add_item(&p).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(p.id).unwrap().quantity, 1);

        cart.add_item(&p).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(p.id).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_is_capped_at_stock() {
        let mut cart = Cart::new();
        let p = product("149.00", 2, true);

        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();
        assert!(matches!(
            cart.add_item(&p),
            Err(CartError::OutOfStock { .. })
        ));
        assert_eq!(cart.line(p.id).unwrap().quantity, 2);
    }

    #[test]
    fn test_totals_recomputed_after_every_mutation() {
        let mut cart = Cart::new();
        let clip = product("149.50", 10, true);
        let clutch = product("899.00", 5, true);

        cart.add_item(&clip).unwrap();
        cart.add_item(&clip).unwrap();
        cart.add_item(&clutch).unwrap();

        assert_eq!(cart.total_items(), 3);
        assert_eq!(
            cart.total_price().amount(),
            Decimal::from_str("1198.00").unwrap()
        );

        cart.update_quantity(clip.id, 4, clip.stock_quantity);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(
            cart.total_price().amount(),
            Decimal::from_str("1497.00").unwrap()
        );

        cart.remove_item(clutch.id);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(
            cart.total_price().amount(),
            Decimal::from_str("598.00").unwrap()
        );
    }

    #[test]
    fn test_remove_then_add_yields_quantity_one() {
        let mut cart = Cart::new();
        let p = product("149.00", 10, true);

        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();
        cart.remove_item(p.id);
        cart.add_item(&p).unwrap();

        // No stale state: the re-added line starts fresh.
        assert_eq!(cart.line(p.id).unwrap().quantity, 1);
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let p = product("149.00", 10, true);

        let mut updated = Cart::new();
        updated.add_item(&p).unwrap();
        updated.update_quantity(p.id, 0, p.stock_quantity);

        let mut removed = Cart::new();
        removed.add_item(&p).unwrap();
        removed.remove_item(p.id);

        assert_eq!(updated, removed);
        assert!(updated.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_to_stock() {
        let mut cart = Cart::new();
        let p = product("149.00", 3, true);

        cart.add_item(&p).unwrap();
        cart.update_quantity(p.id, 99, p.stock_quantity);
        assert_eq!(cart.line(p.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_update_quantity_missing_product_is_noop() {
        let mut cart = Cart::new();
        let p = product("149.00", 3, true);
        cart.add_item(&p).unwrap();

        cart.update_quantity(ProductId::new_v4(), 5, 10);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&product("149.00", 10, true)).unwrap();
        cart.add_item(&product("899.00", 10, true)).unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_line_price_is_captured_at_add_time() {
        let mut cart = Cart::new();
        let p = product("149.00", 10, true);
        cart.add_item(&p).unwrap();

        // A later catalog price change does not affect the cart line.
        let mut repriced = p.clone();
        repriced.price = Price::from_rupees(999).unwrap();
        cart.add_item(&repriced).unwrap();

        assert_eq!(
            cart.line(p.id).unwrap().price.amount(),
            Decimal::from_str("149.00").unwrap()
        );
    }

    #[test]
    fn test_serde_roundtrip_for_session_storage() {
        let mut cart = Cart::new();
        cart.add_item(&product("149.50", 10, true)).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
