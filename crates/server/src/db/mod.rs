//! Persistence for users, the food catalog and orders.
//!
//! # Stores
//!
//! Each collection sits behind a repository trait so handlers and services
//! never know which backend they talk to:
//!
//! - [`UserStore`] - accounts, password hashes and the per-user cart
//! - [`FoodStore`] - menu entries
//! - [`OrderStore`] - placed orders
//!
//! Two implementations exist: `PostgreSQL` ([`users::PgUserRepository`],
//! [`foods::PgFoodRepository`], [`orders::PgOrderRepository`]) and
//! [`memory::MemoryStore`], which backs tests and local runs without a database.
//!
//! # Tables
//!
//! - `users` - accounts; `cart` is a `JSONB` object of item id → quantity
//! - `foods` - menu entries
//! - `orders` - orders; `items` and `address` are `JSONB`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p food-delivery-cli -- migrate
//! ```
//!
//! # Concurrency
//!
//! Cart updates are read-modify-write on the whole cart. Two concurrent
//! updates for the same user race and the last write wins.

pub mod foods;
pub mod memory;
pub mod orders;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use food_delivery_core::{Cart, Email, FoodId, OrderId, OrderStatus, UserId};

use crate::models::{Food, NewFood, NewOrder, NewUser, Order, User};

pub use foods::PgFoodRepository;
pub use memory::MemoryStore;
pub use orders::PgOrderRepository;
pub use users::PgUserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-violation into [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Account and cart persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user with an empty cart.
    ///
    /// Returns `Conflict` if the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Look a user up by email together with their password hash.
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Read the user's cart. Returns `NotFound` for an unknown user.
    async fn get_cart(&self, id: UserId) -> Result<Cart, RepositoryError>;

    /// Overwrite the user's whole cart. Returns `NotFound` for an unknown user.
    async fn set_cart(&self, id: UserId, cart: &Cart) -> Result<(), RepositoryError>;
}

/// Catalog persistence.
#[async_trait]
pub trait FoodStore: Send + Sync {
    async fn insert(&self, food: NewFood) -> Result<Food, RepositoryError>;

    /// All items, in insertion order.
    async fn list(&self) -> Result<Vec<Food>, RepositoryError>;

    /// Delete an item and return what was removed.
    async fn delete(&self, id: FoodId) -> Result<Option<Food>, RepositoryError>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an unpaid order with the initial status.
    async fn insert(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Set the payment flag. Returns the updated order, `None` if unknown.
    async fn mark_paid(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Delete the order only if it is still unpaid. Returns whether a row was removed.
    async fn delete_unpaid(&self, id: OrderId) -> Result<bool, RepositoryError>;

    /// Overwrite the status. Returns the updated order, `None` if unknown.
    async fn update_status(
        &self,
        id: OrderId,
        status: &OrderStatus,
    ) -> Result<Option<Order>, RepositoryError>;

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError>;
}

/// The three repositories the application runs on, plus the pool when backed by `PostgreSQL`.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub foods: Arc<dyn FoodStore>,
    pub orders: Arc<dyn OrderStore>,
    pub pool: Option<PgPool>,
}

impl Stores {
    /// Stores backed by a `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            foods: Arc::new(PgFoodRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Stores sharing one fresh in-memory backend.
    #[must_use]
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            foods: store.clone(),
            orders: store,
            pool: None,
        }
    }

    /// Check that the backing database answers.
    ///
    /// Always succeeds for the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the ping query fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
        }
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
