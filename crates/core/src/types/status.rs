//! Order status.
//!
//! Status is free text edited by staff. It is independent of the payment
//! flag and there is no transition table: any non-blank value may replace
//! any other, including moving "backwards".

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned for a blank status.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("status cannot be blank")]
pub struct BlankStatus;

/// Delivery status of an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct OrderStatus(String);

impl OrderStatus {
    /// Initial status of every newly placed order.
    pub const FOOD_PROCESSING: &'static str = "Food Processing";
    /// The courier has picked the order up.
    pub const OUT_FOR_DELIVERY: &'static str = "Out for delivery";
    /// The order reached the customer.
    pub const DELIVERED: &'static str = "Delivered";

    /// Statuses the admin panel offers by default.
    pub const WELL_KNOWN: [&'static str; 3] = [
        Self::FOOD_PROCESSING,
        Self::OUT_FOR_DELIVERY,
        Self::DELIVERED,
    ];

    /// Parse a status, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`BlankStatus`] if nothing remains after trimming.
    pub fn parse(s: &str) -> Result<Self, BlankStatus> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BlankStatus);
        }
        Ok(Self(s.to_owned()))
    }

    /// Status assigned at placement time.
    #[must_use]
    pub fn initial() -> Self {
        Self(Self::FOOD_PROCESSING.to_owned())
    }

    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the [`Self::WELL_KNOWN`] values.
    #[must_use]
    pub fn is_well_known(&self) -> bool {
        Self::WELL_KNOWN.contains(&self.0.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = BlankStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.0
    }
}
