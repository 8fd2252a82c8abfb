//! Cart operations.
//!
//! The cart lives on the user record. Every operation reads the whole cart,
//! changes it and writes it back, so concurrent updates for one user are
//! last-write-wins.
//!
//! Item ids are not checked against the catalog.

use thiserror::Error;

use food_delivery_core::{Cart, UserId};

use crate::db::{RepositoryError, UserStore};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("item id is required")]
    MissingItemId,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The token refers to a user that no longer exists.
    #[error("user not found")]
    UserNotFound,

    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CartError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::UserNotFound,
            other => Self::Repository(other),
        }
    }
}

pub struct CartService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Increase the quantity of `item_id` by `quantity` and return the new cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingItemId` for a blank id,
    /// `CartError::InvalidQuantity` for zero and `CartError::UserNotFound`
    /// for an unknown user.
    pub async fn add(
        &self,
        user_id: UserId,
        item_id: &str,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        let item_id = normalize_item_id(item_id)?;
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let mut cart = self.users.get_cart(user_id).await?;
        cart.add(item_id, quantity);
        self.users.set_cart(user_id, &cart).await?;
        Ok(cart)
    }

    /// Decrease the quantity of `item_id` by one and return the new cart.
    ///
    /// Removing an item that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingItemId` for a blank id and
    /// `CartError::UserNotFound` for an unknown user.
    pub async fn remove(&self, user_id: UserId, item_id: &str) -> Result<Cart, CartError> {
        let item_id = normalize_item_id(item_id)?;

        let mut cart = self.users.get_cart(user_id).await?;
        if cart.quantity(item_id) > 0 {
            cart.remove(item_id);
            self.users.set_cart(user_id, &cart).await?;
        }
        Ok(cart)
    }

    /// The user's current cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UserNotFound` for an unknown user.
    pub async fn get(&self, user_id: UserId) -> Result<Cart, CartError> {
        Ok(self.users.get_cart(user_id).await?)
    }

    /// Empty the cart after checkout.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UserNotFound` for an unknown user.
    pub async fn clear(&self, user_id: UserId) -> Result<(), CartError> {
        self.users.set_cart(user_id, &Cart::new()).await?;
        Ok(())
    }
}

fn normalize_item_id(item_id: &str) -> Result<&str, CartError> {
    let item_id = item_id.trim();
    if item_id.is_empty() {
        return Err(CartError::MissingItemId);
    }
    Ok(item_id)
}
