//! Order summary shown beside the cart.

use serde::Serialize;

use ecoshop_core::Price;

use super::Cart;
use crate::config::PricingConfig;

/// Subtotal, shipping, tax, and total for a cart. Derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Price `cart` under `pricing`.
    ///
    /// Shipping is free at or above the threshold; tax is charged on the
    /// subtotal only.
    #[must_use]
    pub fn for_cart(cart: &Cart, pricing: &PricingConfig) -> Self {
        let subtotal = cart.subtotal();
        let shipping = if subtotal >= pricing.free_shipping_threshold {
            Price::ZERO
        } else {
            pricing.flat_shipping
        };
        let tax = subtotal.scaled(pricing.tax_rate);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Whether the order ships free.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}
