//! Favorited products.
//!
//! Same shape as the cart: a [`FavoritesAction`] folded by the pure
//! [`reduce`], wrapped by a [`FavoritesStore`] that persists under the
//! `favorites` key and notifies subscribers.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use ecoshop_core::ProductId;

use crate::error::add_breadcrumb;
use crate::models::Product;
use crate::storage::{SharedStorage, keys, load_or_discard, persist_or_log};
use crate::store::{SubscriptionId, Subscribers};

/// Products in the order they were favorited, at most one per ID.
///
/// Serialized as a JSON array of products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesSet {
    products: Vec<Product>,
}

impl FavoritesSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Favorited products, oldest first.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.iter().any(|product| &product.id == product_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// A favorites mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FavoritesAction {
    Add { product: Product },
    Remove { product_id: ProductId },
    /// Remove if present, add otherwise.
    Toggle { product: Product },
}

impl FavoritesAction {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Toggle { .. } => "toggle",
        }
    }
}

/// Apply `action` to `favorites`, returning the next set.
#[must_use]
pub fn reduce(favorites: FavoritesSet, action: &FavoritesAction) -> FavoritesSet {
    let mut products = favorites.products;
    match action {
        FavoritesAction::Add { product } => {
            if !products.iter().any(|p| p.id == product.id) {
                products.push(product.clone());
            }
        }
        FavoritesAction::Remove { product_id } => products.retain(|p| &p.id != product_id),
        FavoritesAction::Toggle { product } => {
            if products.iter().any(|p| p.id == product.id) {
                products.retain(|p| p.id != product.id);
            } else {
                products.push(product.clone());
            }
        }
    }
    FavoritesSet { products }
}

/// The session's favorites.
pub struct FavoritesStore {
    favorites: FavoritesSet,
    storage: SharedStorage,
    subscribers: Subscribers<FavoritesSet>,
}

impl FavoritesStore {
    /// Restore favorites saved in `storage`, or start empty.
    ///
    /// Saved products are replayed as `Add` actions, dropping duplicates.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let saved: Option<FavoritesSet> = load_or_discard(storage.as_ref(), keys::FAVORITES);
        let favorites = saved.map_or_else(FavoritesSet::new, |saved| {
            saved
                .products
                .into_iter()
                .fold(FavoritesSet::new(), |set, product| {
                    reduce(set, &FavoritesAction::Add { product })
                })
        });
        tracing::debug!(count = favorites.len(), "Favorites restored");

        Self {
            favorites,
            storage,
            subscribers: Subscribers::new(),
        }
    }

    /// The current favorites.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Favorite `product`. No-op if already favorited.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub fn add(&mut self, product: &Product) -> &FavoritesSet {
        self.dispatch(FavoritesAction::Add {
            product: product.clone(),
        })
    }

    /// Unfavorite `product_id`. No-op if not favorited.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove(&mut self, product_id: &ProductId) -> &FavoritesSet {
        self.dispatch(FavoritesAction::Remove {
            product_id: product_id.clone(),
        })
    }

    /// Flip `product`'s membership. Returns whether it is now a favorite.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub fn toggle(&mut self, product: &Product) -> bool {
        self.dispatch(FavoritesAction::Toggle {
            product: product.clone(),
        })
        .contains(&product.id)
    }

    #[must_use]
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.favorites.contains(product_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Favorited products, oldest first.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.favorites.products()
    }

    /// Apply `action`, persist, and notify.
    pub fn dispatch(&mut self, action: FavoritesAction) -> &FavoritesSet {
        let favorites = std::mem::take(&mut self.favorites);
        self.favorites = reduce(favorites, &action);

        tracing::debug!(action = action.name(), count = self.favorites.len(), "Favorites updated");
        add_breadcrumb("favorites", action.name(), None);

        persist_or_log(self.storage.as_ref(), keys::FAVORITES, &self.favorites);
        self.subscribers.notify(&self.favorites);
        &self.favorites
    }

    /// Call `listener` with the new set after every mutation.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&FavoritesSet) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    /// Stop notifying a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("favorites", &self.favorites)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
