//! Per-session storefront state.

use std::sync::Arc;

use crate::auth::{AuthStore, UserDirectory};
use crate::cart::{CartStore, OrderSummary};
use crate::catalog::Catalog;
use crate::config::{PricingConfig, StorageBackend, StorefrontConfig};
use crate::error::Result;
use crate::favorites::FavoritesStore;
use crate::routes::{Navigation, Route, guard};
use crate::storage::{FileStorage, MemoryStorage, SharedStorage};

/// The stores for one browsing session.
///
/// Owns one cart, favorites, and auth store over a shared storage handle,
/// plus the read-only catalog. Front ends hold a `Storefront` and dispatch
/// intents to its stores.
#[derive(Debug)]
pub struct Storefront {
    catalog: Arc<Catalog>,
    cart: CartStore,
    favorites: FavoritesStore,
    auth: AuthStore,
    pricing: PricingConfig,
}

impl Storefront {
    /// Create a storefront from configuration with the bundled catalog and
    /// user directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled dataset is invalid.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        let catalog = Arc::new(Catalog::bundled()?);
        let directory = UserDirectory::bundled()?;
        Ok(Self::with_parts(
            open_storage(config),
            catalog,
            directory,
            config.pricing,
        ))
    }

    /// Assemble a storefront from explicit parts.
    #[must_use]
    pub fn with_parts(
        storage: SharedStorage,
        catalog: Arc<Catalog>,
        directory: UserDirectory,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            cart: CartStore::load(Arc::clone(&storage)),
            favorites: FavoritesStore::load(Arc::clone(&storage)),
            auth: AuthStore::load(storage, directory),
            catalog,
            pricing,
        }
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A shared handle to the catalog.
    #[must_use]
    pub fn catalog_handle(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub const fn favorites_mut(&mut self) -> &mut FavoritesStore {
        &mut self.favorites
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub const fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    /// Shipping and tax rules.
    #[must_use]
    pub const fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Order summary for the current cart.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        self.cart.summary(&self.pricing)
    }

    /// Run the route guard for the current session.
    #[must_use]
    pub fn navigate(&self, route: Route) -> Navigation {
        guard(route, self.auth.session())
    }
}

/// Open the storage backend selected by `config`.
#[must_use]
pub fn open_storage(config: &StorefrontConfig) -> SharedStorage {
    match config.storage {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::File => Arc::new(FileStorage::new(&config.data_dir)),
    }
}
