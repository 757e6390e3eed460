//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the catalog API as plain JSON numbers (`139.9`) and are
//! persisted with the cart as decimal strings (`"139.9"`). Both forms
//! deserialize into the same [`Price`].

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

/// Formats as a display price rounded to cents (e.g. `$139.90`).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display_pads_cents() {
        assert_eq!(Price::from_cents(13990).to_string(), "$139.90");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_price_deserializes_from_number_and_string() {
        let from_number: Price = serde_json::from_str("139.9").unwrap();
        let from_string: Price = serde_json::from_str("\"139.9\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Price::from_cents(13990));
    }

    #[test]
    fn test_price_multiplied_by_quantity() {
        assert_eq!(Price::from_cents(1999) * 3, Price::from_cents(5997));
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }
}
