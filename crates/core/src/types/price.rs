//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are single-currency (dollars). Arithmetic is exact; rounding only
//! happens when a total is prepared for display via [`Price::rounded`].

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in the store currency.
///
/// Serializes as a decimal string (`"9.99"`) and accepts either a string or a
/// JSON number when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Number of fractional digits shown to customers.
    pub const DISPLAY_SCALE: u32 = 2;

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

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Round to two decimal places, halves away from zero.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.rounded().0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
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
    fn test_display_pads_to_two_decimals() {
        assert_eq!(Price::from_cents(999).display(), "$9.99");
        assert_eq!(Price::new(Decimal::from(5)).display(), "$5.00");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_rounded_half_away_from_zero() {
        // 0.125 -> 0.13, 0.135 -> 0.14 (never banker's rounding)
        assert_eq!(Price::new(Decimal::new(125, 3)).rounded(), Price::from_cents(13));
        assert_eq!(Price::new(Decimal::new(135, 3)).rounded(), Price::from_cents(14));
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(999).times(2), Price::from_cents(1).times(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2001));
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::from_cents(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
        assert!(!Price::from_cents(1).is_negative());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_cents(1998)).unwrap();
        assert_eq!(json, "\"19.98\"");
    }

    #[test]
    fn test_deserializes_from_number_or_string() {
        let from_number: Price = serde_json::from_str("109.95").unwrap();
        let from_string: Price = serde_json::from_str("\"109.95\"").unwrap();
        assert_eq!(from_number, Price::from_cents(10995));
        assert_eq!(from_string, Price::from_cents(10995));
    }
}
