//! Food Delivery Core - Shared domain types.
//!
//! This crate provides the types shared by the food delivery components:
//! - `server` - REST backend (catalog, cart, accounts, orders)
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The `postgres` feature adds `sqlx` encode/decode impls.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, amounts, emails, order status and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
