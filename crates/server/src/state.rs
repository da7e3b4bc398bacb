//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{
    CheckoutEngine, OrderDirectory, ReorderClient, ReorderError, RoleResolver,
};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the document store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: MemoryStore,
    checkout: CheckoutEngine,
    roles: RoleResolver,
    orders: OrderDirectory,
    reorder: Option<ReorderClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the reorder-suggestion client cannot be built
    /// from the configured credentials.
    pub fn new(config: ServerConfig, store: MemoryStore) -> Result<Self, ReorderError> {
        let checkout = CheckoutEngine::new(store.clone());
        let roles = RoleResolver::new(store.clone());
        let orders = OrderDirectory::new(store.clone());
        let reorder = config
            .reorder
            .as_ref()
            .map(ReorderClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                checkout,
                roles,
                orders,
                reorder,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.inner.store
    }

    /// Get a reference to the checkout engine.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutEngine {
        &self.inner.checkout
    }

    /// Get a reference to the role resolver.
    #[must_use]
    pub fn roles(&self) -> &RoleResolver {
        &self.inner.roles
    }

    /// Get a reference to the order directory.
    #[must_use]
    pub fn orders(&self) -> &OrderDirectory {
        &self.inner.orders
    }

    /// Get the reorder-suggestion client, when configured.
    #[must_use]
    pub fn reorder(&self) -> Option<&ReorderClient> {
        self.inner.reorder.as_ref()
    }
}
