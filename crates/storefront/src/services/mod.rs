//! Remote collaborators of the cart store.
//!
//! The cart only needs two lookups from the outside world: product metadata
//! when an item is first added, and the live stock level on every mutation.
//! [`ApiClient`](crate::api::ApiClient) implements both over HTTP; tests plug
//! in their own implementations.

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};

use crate::api::ApiError;

/// Source of product metadata (name, price, image).
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Look up a product by id.
    async fn product(&self, id: ProductId) -> Result<Product, ApiError>;
}

/// Source of the currently available quantity for a product.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Read the stock level for a product.
    ///
    /// Implementations must not cache: the cart validates every mutation
    /// against the level observed at call time.
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError>;
}
