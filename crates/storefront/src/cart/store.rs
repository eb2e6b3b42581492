//! Cart store: reducer plus persistence and notification.

use tracing::instrument;

use ecoshop_core::ProductId;

use super::{Cart, CartAction, CartError, CartLine, OrderSummary, reduce};
use crate::config::PricingConfig;
use crate::error::add_breadcrumb;
use crate::models::Product;
use crate::storage::{SharedStorage, keys, load_or_discard, persist_or_log};
use crate::store::{SubscriptionId, Subscribers};

/// The session's cart.
///
/// Every applied action writes the full cart to the `cart` key and then
/// notifies subscribers with the new cart. A failed write is logged and the
/// in-memory cart keeps the change.
pub struct CartStore {
    cart: Cart,
    storage: SharedStorage,
    subscribers: Subscribers<Cart>,
}

impl CartStore {
    /// Restore the cart saved in `storage`, or start empty.
    ///
    /// Saved lines are replayed as `AddItem` actions in order, so duplicate
    /// or zero-quantity lines in a hand-edited snapshot collapse into a valid
    /// cart. An unreadable snapshot is discarded.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let saved: Option<Cart> = load_or_discard(storage.as_ref(), keys::CART);
        let cart = saved.map_or_else(Cart::new, |saved| {
            saved.items.into_iter().fold(Cart::new(), |cart, line| {
                reduce(
                    cart,
                    &CartAction::AddItem {
                        product: line.product,
                        quantity: line.quantity,
                    },
                )
            })
        });
        tracing::debug!(lines = cart.items().len(), "Cart restored");

        Self {
            cart,
            storage,
            subscribers: Subscribers::new(),
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add `quantity` units of `product`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is zero; the cart
    /// is unchanged.
    #[instrument(skip_all, fields(product_id = %product.id, quantity = quantity))]
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<&Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        Ok(self.dispatch(CartAction::AddItem {
            product: product.clone(),
            quantity,
        }))
    }

    /// Remove the line for `product_id`, if present.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_item(&mut self, product_id: &ProductId) -> &Cart {
        self.dispatch(CartAction::RemoveItem {
            product_id: product_id.clone(),
        })
    }

    /// Set the quantity for `product_id`; zero removes the line.
    #[instrument(skip_all, fields(product_id = %product_id, quantity = quantity))]
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> &Cart {
        self.dispatch(CartAction::SetQuantity {
            product_id: product_id.clone(),
            quantity,
        })
    }

    /// Empty the cart.
    #[instrument(skip_all)]
    pub fn clear(&mut self) -> &Cart {
        self.dispatch(CartAction::Clear)
    }

    /// Apply `action`, persist, and notify.
    pub fn dispatch(&mut self, action: CartAction) -> &Cart {
        let cart = std::mem::take(&mut self.cart);
        self.cart = reduce(cart, &action);

        tracing::debug!(
            action = action.name(),
            total_items = self.cart.total_items(),
            subtotal = %self.cart.subtotal(),
            "Cart updated"
        );
        add_breadcrumb("cart", action.name(), None);

        persist_or_log(self.storage.as_ref(), keys::CART, &self.cart);
        self.subscribers.notify(&self.cart);
        &self.cart
    }

    /// Order summary for the current cart.
    #[must_use]
    pub fn summary(&self, pricing: &PricingConfig) -> OrderSummary {
        OrderSummary::for_cart(&self.cart, pricing)
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.cart.line(product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.cart.contains(product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Call `listener` with the new cart after every mutation.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&Cart) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    /// Stop notifying a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ecoshop_core::Price;

    use super::*;
    use crate::catalog::Catalog;
    use crate::storage::{FailingStorage, MemoryStorage};

    fn product(id: &str) -> Product {
        Catalog::bundled().unwrap().by_id(id).unwrap().clone()
    }

    fn memory() -> SharedStorage {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_add_zero_rejected_without_change() {
        let mut store = CartStore::load(memory());
        store.add_item(&product("1"), 1).unwrap();
        let before = store.cart().clone();

        assert_eq!(
            store.add_item(&product("1"), 0),
            Err(CartError::InvalidQuantity)
        );
        assert_eq!(store.cart(), &before);
    }

    #[test]
    fn test_mutations_persist_and_reload() {
        let storage = memory();
        let mut store = CartStore::load(Arc::clone(&storage));
        store.add_item(&product("1"), 2).unwrap();
        store.add_item(&product("3"), 1).unwrap();
        store.set_quantity(&ProductId::new("3"), 4);

        let reloaded = CartStore::load(storage);
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.cart().total_items(), 6);
        assert_eq!(reloaded.cart().subtotal(), Price::from_cents(119_994));
    }

    #[test]
    fn test_corrupted_snapshot_restores_empty() {
        let storage = memory();
        storage.set(keys::CART, "{\"items\": [oops").unwrap();
        let store = CartStore::load(storage);
        assert!(store.is_empty());
        assert_eq!(store.cart().subtotal(), Price::ZERO);
    }

    #[test]
    fn test_restore_normalizes_saved_lines() {
        let storage = memory();
        let line = |id: &str, quantity: u32| CartLine {
            product: product(id),
            quantity,
        };
        let snapshot = serde_json::json!({
            "items": [line("1", 1), line("2", 0), line("1", 2)],
            "total_items": 0,
            "subtotal": { "amount": "0" }
        });
        storage.set(keys::CART, &snapshot.to_string()).unwrap();

        let store = CartStore::load(storage);
        assert_eq!(store.cart().items().len(), 1);
        assert_eq!(store.line(&ProductId::new("1")).unwrap().quantity, 3);
        assert!(!store.contains(&ProductId::new("2")));
    }

    #[test]
    fn test_clear_persists_empty_cart() {
        let storage = memory();
        let mut store = CartStore::load(Arc::clone(&storage));
        store.add_item(&product("5"), 1).unwrap();
        store.clear();

        let raw = storage.get(keys::CART).unwrap().unwrap();
        let saved: Cart = serde_json::from_str(&raw).unwrap();
        assert!(saved.is_empty());
    }

    #[test]
    fn test_subscribers_notified_on_every_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = CartStore::load(memory());
        let counter = Arc::clone(&calls);
        store.subscribe(move |cart| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert_eq!(
                cart.total_items(),
                cart.items().iter().map(|l| l.quantity).sum::<u32>()
            );
        });

        store.add_item(&product("1"), 1).unwrap();
        store.remove_item(&ProductId::new("missing"));
        store.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // rejected adds are not dispatched
        let _ = store.add_item(&product("1"), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_summary_uses_pricing() {
        let mut store = CartStore::load(memory());
        store.add_item(&product("4"), 1).unwrap();
        let summary = store.summary(&PricingConfig::default());
        assert!(summary.free_shipping());
        assert_eq!(summary.total, Price::from_cents(21_599));
    }

    #[test]
    fn test_write_failure_keeps_change_and_notifies() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = CartStore::load(Arc::new(FailingStorage));
        assert!(store.is_empty());
        let counter = Arc::clone(&calls);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let cart = store.add_item(&product("2"), 2).unwrap();
        assert_eq!(cart.total_items(), 2);
        assert_eq!(store.line(&ProductId::new("2")).unwrap().quantity, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.remove_item(&ProductId::new("2"));
        assert!(store.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
