//! Catalog and stock API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`: `GET /products/{id}` and `GET /stock/{id}`
//! - The API is the source of truth for stock; stock is never cached
//! - Product metadata is cached in memory via `moka` (configurable TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let product = client.get_product(ProductId::new(1)).await?;
//! let stock = client.get_stock(product.id).await?;
//! ```

mod client;

pub use client::ApiClient;

use rocketshoes_core::ProductId;
use thiserror::Error;

/// Errors that can occur when talking to the catalog/stock API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response described a different resource than the one requested.
    #[error("Requested {requested}, API returned {received}")]
    UnexpectedId {
        requested: ProductId,
        received: ProductId,
    },

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configured API token is not a valid header value.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("products/42".to_string());
        assert_eq!(err.to_string(), "Not found: products/42");

        let err = ApiError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
    }
}
