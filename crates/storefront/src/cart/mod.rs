//! Shopping cart: state, reducer, and store.
//!
//! Every mutation is a [`CartAction`] folded into the current [`Cart`] by
//! [`reduce`], a pure function. The [`CartStore`] wraps the reducer with
//! validation, persistence under the `cart` storage key, and change
//! notification.
//!
//! A cart holds at most one line per product, every line has a positive
//! quantity, and `total_items`/`subtotal` always equal the sums over the
//! lines.

mod store;
mod summary;

pub use store::CartStore;
pub use summary::OrderSummary;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ecoshop_core::{Price, ProductId};

use crate::models::Product;

/// Errors from cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// A quantity of zero was requested for a new item.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// A product in the cart and how many units of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot taken when the line was added.
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The cart contents and their totals.
///
/// Deserializing only reads the lines; totals are recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CartSnapshot")]
pub struct Cart {
    items: Vec<CartLine>,
    total_items: u32,
    subtotal: Price,
}

#[derive(Deserialize)]
struct CartSnapshot {
    #[serde(default)]
    items: Vec<CartLine>,
}

impl From<CartSnapshot> for Cart {
    fn from(snapshot: CartSnapshot) -> Self {
        Self::with_items(snapshot.items)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// The empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            subtotal: Price::ZERO,
        }
    }

    fn with_items(items: Vec<CartLine>) -> Self {
        let total_items = items
            .iter()
            .fold(0_u32, |total, line| total.saturating_add(line.quantity));
        let subtotal = items.iter().map(CartLine::line_total).sum();
        Self {
            items,
            total_items,
            subtotal,
        }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Sum of line quantities.
    #[must_use]
    pub const fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Sum of line totals.
    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.items.iter().find(|line| &line.product.id == product_id)
    }

    /// Whether `product_id` has a line.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.line(product_id).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A cart mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartAction {
    /// Add `quantity` units, merging into an existing line.
    AddItem { product: Product, quantity: u32 },
    /// Drop the line for a product.
    RemoveItem { product_id: ProductId },
    /// Replace a line's quantity; zero drops the line.
    SetQuantity { product_id: ProductId, quantity: u32 },
    /// Empty the cart.
    Clear,
}

impl CartAction {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddItem { .. } => "add_item",
            Self::RemoveItem { .. } => "remove_item",
            Self::SetQuantity { .. } => "set_quantity",
            Self::Clear => "clear",
        }
    }
}

/// Apply `action` to `cart`, returning the next cart.
///
/// Adding zero units and actions on products not in the cart leave the
/// lines unchanged.
#[must_use]
pub fn reduce(cart: Cart, action: &CartAction) -> Cart {
    let mut items = cart.items;
    match action {
        CartAction::AddItem { quantity: 0, .. } => {}
        CartAction::AddItem { product, quantity } => {
            match items.iter_mut().find(|line| line.product.id == product.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(*quantity),
                None => items.push(CartLine {
                    product: product.clone(),
                    quantity: *quantity,
                }),
            }
        }
        CartAction::RemoveItem { product_id }
        | CartAction::SetQuantity {
            product_id,
            quantity: 0,
        } => items.retain(|line| &line.product.id != product_id),
        CartAction::SetQuantity {
            product_id,
            quantity,
        } => {
            if let Some(line) = items.iter_mut().find(|line| &line.product.id == product_id) {
                line.quantity = *quantity;
            }
        }
        CartAction::Clear => items.clear(),
    }
    Cart::with_items(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn product(id: &str) -> Product {
        Catalog::bundled().unwrap().by_id(id).unwrap().clone()
    }

    fn add(cart: Cart, id: &str, quantity: u32) -> Cart {
        reduce(
            cart,
            &CartAction::AddItem {
                product: product(id),
                quantity,
            },
        )
    }

    fn assert_totals_consistent(cart: &Cart) {
        let quantity: u32 = cart.items().iter().map(|line| line.quantity).sum();
        let subtotal: Price = cart.items().iter().map(CartLine::line_total).sum();
        assert_eq!(cart.total_items(), quantity);
        assert_eq!(cart.subtotal(), subtotal);
        assert!(cart.items().iter().all(|line| line.quantity > 0));
    }

    #[test]
    fn test_add_merges_same_product() {
        let cart = add(add(Cart::new(), "1", 2), "1", 3);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.subtotal(), Price::from_cents(149_995));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let cart = add(add(add(Cart::new(), "3", 1), "1", 1), "3", 1);
        let ids: Vec<&str> = cart.items().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, ["3", "1"]);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let cart = add(Cart::new(), "1", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let cart = add(add(Cart::new(), "1", 2), "4", 1);
        let id = ProductId::new("1");

        let removed = reduce(cart.clone(), &CartAction::RemoveItem { product_id: id.clone() });
        let zeroed = reduce(
            cart,
            &CartAction::SetQuantity {
                product_id: id,
                quantity: 0,
            },
        );
        assert_eq!(removed, zeroed);
        assert_eq!(removed.total_items(), 1);
    }

    #[test]
    fn test_set_quantity_replaces_and_ignores_absent() {
        let cart = add(Cart::new(), "2", 1);
        let cart = reduce(
            cart,
            &CartAction::SetQuantity {
                product_id: ProductId::new("2"),
                quantity: 4,
            },
        );
        assert_eq!(cart.line(&ProductId::new("2")).unwrap().quantity, 4);

        let unchanged = reduce(
            cart.clone(),
            &CartAction::SetQuantity {
                product_id: ProductId::new("6"),
                quantity: 4,
            },
        );
        assert_eq!(unchanged, cart);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let cart = add(Cart::new(), "2", 1);
        let after = reduce(
            cart.clone(),
            &CartAction::RemoveItem {
                product_id: ProductId::new("5"),
            },
        );
        assert_eq!(after, cart);
    }

    #[test]
    fn test_clear() {
        let cart = add(add(Cart::new(), "1", 2), "2", 1);
        let cart = reduce(cart, &CartAction::Clear);
        assert_eq!(cart, Cart::new());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_totals_hold_across_mixed_sequence() {
        let actions = [
            CartAction::AddItem { product: product("1"), quantity: 2 },
            CartAction::AddItem { product: product("5"), quantity: 1 },
            CartAction::SetQuantity { product_id: ProductId::new("1"), quantity: 7 },
            CartAction::AddItem { product: product("3"), quantity: 3 },
            CartAction::RemoveItem { product_id: ProductId::new("5") },
            CartAction::AddItem { product: product("1"), quantity: 1 },
            CartAction::SetQuantity { product_id: ProductId::new("3"), quantity: 0 },
        ];
        let mut cart = Cart::new();
        for action in &actions {
            cart = reduce(cart, action);
            assert_totals_consistent(&cart);
        }
        assert_eq!(cart.total_items(), 8);
    }

    #[test]
    fn test_snapshot_recomputes_totals() {
        let cart = add(Cart::new(), "4", 2);
        let mut json = serde_json::to_value(&cart).unwrap();
        json["total_items"] = serde_json::json!(999);
        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_action_wire_format() {
        let action = CartAction::RemoveItem {
            product_id: ProductId::new("1"),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "RemoveItem");
        assert_eq!(json["data"]["product_id"], "1");
        assert_eq!(serde_json::to_value(CartAction::Clear).unwrap()["type"], "Clear");
    }
}
