//! Non-negative money amounts using decimal arithmetic.
//!
//! Food prices and order totals share this type. Amounts carry no currency;
//! the whole shop trades in one.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error returned for amounts below zero.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("amount must not be negative (got {0})")]
pub struct NegativeAmount(pub Decimal);

/// A non-negative decimal amount in the shop's currency.
///
/// Serializes like a bare [`Decimal`]; deserialization rejects negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct Amount(Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Returns [`NegativeAmount`] if `value` is below zero.
    pub fn new(value: Decimal) -> Result<Self, NegativeAmount> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(NegativeAmount(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = NegativeAmount;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_rejects_negative() {
        let err = Amount::new(Decimal::from_str("-0.01").unwrap()).unwrap_err();
        assert_eq!(err.0, Decimal::from_str("-0.01").unwrap());
    }

    #[test]
    fn test_accepts_zero_and_negative_zero() {
        assert_eq!(Amount::new(Decimal::ZERO).unwrap(), Amount::ZERO);
        assert!(Amount::new(Decimal::from_str("-0.00").unwrap()).is_ok());
    }

    #[test]
    fn test_display_two_places() {
        let amount = Amount::new(Decimal::from_str("12.5").unwrap()).unwrap();
        assert_eq!(amount.to_string(), "12.50");
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Amount = serde_json::from_str("24").unwrap();
        let from_string: Amount = serde_json::from_str("\"24.00\"").unwrap();
        assert_eq!(from_number, from_string);

        assert!(serde_json::from_str::<Amount>("-3").is_err());
    }

    #[test]
    fn test_extra_decimal_places_are_kept() {
        let amount: Amount = serde_json::from_str("\"12.345\"").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("12.345").unwrap());
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"12.345\"");
    }
}
