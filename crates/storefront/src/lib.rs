//! RocketShoes Storefront library.
//!
//! Shopping-cart state for the storefront: the [`cart::CartStore`] and the
//! collaborators it is wired to.
//!
//! # Modules
//!
//! - [`cart`] - Cart store with add/remove/update operations
//! - [`api`] - REST client for the catalog and stock endpoints
//! - [`services`] - Catalog and stock service traits
//! - [`storage`] - Persistent key-value slots (file, memory)
//! - [`notify`] - Shopper-facing notices
//! - [`config`] - Environment configuration
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod state;
pub mod storage;

pub use cart::{CartStore, UpdateProductAmount};
pub use error::CartError;
pub use notify::{Notice, Notifier};
