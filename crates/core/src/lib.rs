//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types used across all RocketShoes components:
//! - `storefront` - Cart store, catalog/stock API client, storage backends
//! - `cli` - Command-line driver for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, catalog products, stock levels and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
