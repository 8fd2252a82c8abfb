//! Per-user cart: item id → quantity.
//!
//! Item ids are opaque strings and are not checked against the catalog.
//! A quantity of zero is never stored; decrementing to zero drops the entry,
//! so readers only ever see positive quantities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A user's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct Cart(BTreeMap<String, u32>);

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Increase the quantity of `item_id` by `by`, creating the entry if absent.
    ///
    /// Saturates at `u32::MAX`. Returns the new quantity.
    pub fn add(&mut self, item_id: &str, by: u32) -> u32 {
        if by == 0 {
            return self.quantity(item_id);
        }
        let quantity = self.0.entry(item_id.to_owned()).or_insert(0);
        *quantity = quantity.saturating_add(by);
        *quantity
    }

    /// Decrease the quantity of `item_id` by one.
    ///
    /// Removing an item that is not in the cart is a no-op. Returns the new
    /// quantity (zero once the entry is gone).
    pub fn remove(&mut self, item_id: &str) -> u32 {
        let Some(quantity) = self.0.get_mut(item_id) else {
            return 0;
        };
        *quantity = quantity.saturating_sub(1);
        let remaining = *quantity;
        if remaining == 0 {
            self.0.remove(item_id);
        }
        remaining
    }

    /// Quantity of `item_id`; zero if absent.
    #[must_use]
    pub fn quantity(&self, item_id: &str) -> u32 {
        self.0.get(item_id).copied().unwrap_or(0)
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl From<BTreeMap<String, u32>> for Cart {
    fn from(mut map: BTreeMap<String, u32>) -> Self {
        map.retain(|_, quantity| *quantity > 0);
        Self(map)
    }
}

impl From<Cart> for BTreeMap<String, u32> {
    fn from(cart: Cart) -> Self {
        cart.0
    }
}
