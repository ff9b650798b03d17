//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cart::{CartStorage, CartStore};
use crate::catalog::{CatalogClient, CatalogError, CatalogStore, RandomCategories};
use crate::config::StorefrontConfig;

/// Storage backend shared by the cart store.
pub type SharedStorage = Arc<dyn CartStorage + Send + Sync>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog sits behind a
/// read-write lock (many renders, rare reloads); the cart behind a mutex so
/// each command runs to completion, persistence included, before the next.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog_client: CatalogClient,
    catalog: RwLock<CatalogStore>,
    cart: Mutex<CartStore<SharedStorage>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The cart is restored from `storage` immediately. The catalog starts
    /// empty; call [`AppState::refresh_catalog`] to fetch it.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, storage: SharedStorage) -> Result<Self, CatalogError> {
        let catalog_client = CatalogClient::new(config.catalog.url.clone(), config.catalog.timeout)?;
        let assigner = config
            .catalog
            .category_seed
            .map_or_else(RandomCategories::from_os_rng, RandomCategories::seeded);

        Ok(Self::with_parts(
            config,
            catalog_client,
            CatalogStore::new(assigner),
            CartStore::open(storage),
        ))
    }

    /// Assemble a state from already-built parts.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        catalog_client: CatalogClient,
        catalog: CatalogStore,
        cart: CartStore<SharedStorage>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog_client,
                catalog: RwLock::new(catalog),
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog_client(&self) -> &CatalogClient {
        &self.inner.catalog_client
    }

    /// Read access to the catalog.
    pub async fn catalog(&self) -> RwLockReadGuard<'_, CatalogStore> {
        self.inner.catalog.read().await
    }

    /// Write access to the catalog.
    pub async fn catalog_mut(&self) -> RwLockWriteGuard<'_, CatalogStore> {
        self.inner.catalog.write().await
    }

    /// Exclusive access to the cart.
    pub async fn cart(&self) -> MutexGuard<'_, CartStore<SharedStorage>> {
        self.inner.cart.lock().await
    }

    /// Fetch the catalog and replace the held products.
    ///
    /// The catalog lock is not held while the request is in flight. On failure
    /// the error is recorded on the store (for the inline retry prompt) and
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn refresh_catalog(&self) -> Result<usize, CatalogError> {
        match self.catalog_client().fetch_products().await {
            Ok(records) => {
                let mut catalog = self.catalog_mut().await;
                catalog.load(records);
                Ok(catalog.len())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load catalog");
                self.catalog_mut().await.mark_failed(&e);
                Err(e)
            }
        }
    }
}
