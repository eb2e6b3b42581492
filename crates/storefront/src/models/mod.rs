//! Domain models for the storefront.
//!
//! Products are owned by the catalog and never mutated; carts and favorites
//! hold clones. Users carry their saved addresses, payment methods, and past
//! orders as plain data.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItem};
pub use product::{Product, Review};
pub use user::{Address, DEFAULT_AVATAR, PaymentMethod, User};
