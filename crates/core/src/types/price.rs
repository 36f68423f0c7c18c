//! Type-safe price representation using decimal arithmetic.
//!
//! The luv2shop API and the persisted cart snapshot carry prices as plain
//! JSON numbers (`18.99`). [`Price`] keeps them as exact decimals in memory
//! so cart totals never accumulate floating point drift.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity, saturating at the decimal range.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Multiply by a line quantity, or `None` on overflow.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Add two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
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
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Formats with exactly two fraction digits (`20.00`).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1899).amount(), Decimal::new(1899, 2));
        assert_eq!(Price::from_cents(-250).amount(), Decimal::new(-250, 2));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::new(Decimal::from(20)).to_string(), "20.00");
        assert_eq!(Price::from_cents(1899).to_string(), "18.99");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(1000).times(2), Price::from_cents(199).times(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2597));
    }

    #[test]
    fn test_overflow_is_checked_or_saturated() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(huge.checked_times(2), None);
        assert_eq!(huge.checked_add(Price::from_cents(1)), None);
        assert_eq!(huge.times(2), huge);
        assert_eq!(huge + huge, huge);
        assert_eq!(
            Price::from_cents(250).checked_times(4),
            Some(Price::from_cents(1000))
        );
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::from_cents(1899);
        assert_eq!(serde_json::to_string(&price).unwrap(), "18.99");
        let back: Price = serde_json::from_str("18.99").unwrap();
        assert_eq!(back, price);
    }
}
