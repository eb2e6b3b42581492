//! EcoShop Core - Shared types library.
//!
//! This crate provides common types used across all EcoShop components:
//! - `storefront` - Catalog queries and the cart, favorites, and auth stores
//! - `cli` - Command-line front end that dispatches intents to the stores
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! logging. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, categories, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
