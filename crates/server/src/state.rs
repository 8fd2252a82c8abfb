//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::{FoodStore, OrderStore, Stores, UserStore};
use crate::services::{TokenCodec, UploadDir};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the stores, the token codec and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    stores: Stores,
    tokens: TokenCodec,
    uploads: UploadDir,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `stores` - `PostgreSQL` or in-memory repositories
    #[must_use]
    pub fn new(config: ServerConfig, stores: Stores) -> Self {
        let tokens = TokenCodec::new(&config.auth);
        let uploads = UploadDir::new(config.upload_dir.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                tokens,
                uploads,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.stores.users.as_ref()
    }

    #[must_use]
    pub fn foods(&self) -> &dyn FoodStore {
        self.inner.stores.foods.as_ref()
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.stores.orders.as_ref()
    }

    /// Get a reference to the access token codec.
    #[must_use]
    pub fn tokens(&self) -> &TokenCodec {
        &self.inner.tokens
    }

    /// Get a reference to the image upload directory.
    #[must_use]
    pub fn uploads(&self) -> &UploadDir {
        &self.inner.uploads
    }
}
