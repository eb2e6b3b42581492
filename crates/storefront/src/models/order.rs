//! Past orders carried on a user's account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecoshop_core::{OrderId, OrderStatus, Price, UserId};

use super::{Address, PaymentMethod, Product};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// Address the order ships to.
    pub shipping: Address,
    /// Address the payment is billed to.
    pub billing: Address,
    pub payment: PaymentMethod,
    pub subtotal: Price,
    pub tax: Price,
    pub shipping_cost: Price,
    pub total: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// A product line on an order, priced at the time of purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: Product,
    pub quantity: u32,
    /// Unit price paid.
    pub price: Price,
}
