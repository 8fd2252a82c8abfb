//! Core types for the food delivery backend.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use cart::Cart;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Amount, NegativeAmount};
pub use status::{BlankStatus, OrderStatus};
