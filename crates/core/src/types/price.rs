//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront sells in a single currency (INR), so `Price` carries no
//! currency code; it guards non-negativity and keeps all arithmetic in
//! `rust_decimal` so totals never touch floating point.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount of money in INR.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from whole rupees (convenience for tests and seeds).
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn from_rupees(rupees: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::from(rupees))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity (line total), saturating on overflow.
    ///
    /// Saturation keeps totals well-defined for absurd quantities; both
    /// operands are non-negative, so the result stays non-negative.
    #[must_use]
    pub fn saturating_mul(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Add another price (running totals), saturating on overflow.
    #[must_use]
    pub fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

// SQLx support (with postgres feature): stored as NUMERIC
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are constrained non-negative by migration CHECKs
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromStr;

    #[test]
    fn test_new_rejects_negative() {
        let amount = Decimal::from_str("-1.00").unwrap();
        assert!(matches!(Price::new(amount), Err(PriceError::Negative)));
    }

    #[test]
    fn test_new_accepts_zero() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_saturating_mul() {
        let price = Price::new(Decimal::from_str("149.50").unwrap()).unwrap();
        let line = price.saturating_mul(3);
        assert_eq!(line.amount(), Decimal::from_str("448.50").unwrap());
    }

    #[test]
    fn test_saturating_add() {
        let a = Price::from_rupees(100).unwrap();
        let b = Price::new(Decimal::from_str("49.99").unwrap()).unwrap();
        assert_eq!(
            a.saturating_add(b).amount(),
            Decimal::from_str("149.99").unwrap()
        );
    }

    #[test]
    fn test_saturation_stays_non_negative() {
        let max = Price::new(Decimal::MAX).unwrap();
        assert_eq!(max.saturating_mul(u32::MAX).amount(), Decimal::MAX);
        assert_eq!(max.saturating_add(max).amount(), Decimal::MAX);
    }

    #[test]
    fn test_display_rupee_format() {
        let price = Price::new(Decimal::from_str("249.5").unwrap()).unwrap();
        assert_eq!(price.to_string(), "₹249.50");
    }

    #[test]
    fn test_serde_as_string() {
        // serde-with-str keeps decimals exact over the wire
        let price = Price::new(Decimal::from_str("199.99").unwrap()).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"199.99\"");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
