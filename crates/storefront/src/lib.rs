//! EcoShop Storefront library.
//!
//! The storefront core is a set of synchronous state stores over a local
//! key-value storage, plus read-only catalog queries:
//!
//! - [`catalog`] - the bundled product collection and listing queries
//! - [`cart`] - cart reducer, store, and order summary
//! - [`favorites`] - the favorited products set
//! - [`auth`] - simulated login, registration, and the session
//! - [`routes`] - navigation targets and the protected-route guard
//! - [`state`] - the [`Storefront`](state::Storefront) composition root
//!
//! Front ends (the `ecoshop` CLI, or a UI) dispatch intents to the stores and
//! observe changes through subscriptions; there is no global state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
