//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, password login and access tokens
//! - `cart` - Per-user cart updates
//! - `catalog` - Food catalog and its images
//! - `orders` - Order placement, payment verification and status updates
//! - `uploads` - Image files on local disk
//!
//! Services borrow their stores for the duration of one request; handlers
//! build them from [`crate::state::AppState`] as needed.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod uploads;

pub use auth::{AccessToken, AccountService, AuthError, TokenCodec};
pub use cart::{CartError, CartService};
pub use catalog::{CatalogError, CatalogService, FoodForm, ImageUpload};
pub use orders::{OrderError, OrderService, PlaceOrder, PlacedOrder, Verification};
pub use uploads::{UploadDir, UploadError};
