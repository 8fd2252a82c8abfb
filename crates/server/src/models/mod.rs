//! Domain models for the food delivery backend.
//!
//! These types are what handlers return and what repositories persist. Wire
//! names are camelCase to match the frontend.

pub mod food;
pub mod order;
pub mod user;

pub use food::{Food, NewFood};
pub use order::{DeliveryAddress, NewOrder, Order, OrderItem};
pub use user::{CurrentUser, NewUser, User};
