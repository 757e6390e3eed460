//! Cart operation outcomes.
//!
//! Every cart operation resolves to `Result<(), CartError>`. The store has
//! already notified the shopper by the time an error is returned; callers use
//! the error to decide anything beyond that (exit codes, retries, logging).

use rocketshoes_core::{CartInvariantError, ProductId};
use thiserror::Error;

use crate::api::ApiError;
use crate::notify::Notice;
use crate::storage::StorageError;

/// Why a cart operation left the cart unchanged.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity is above the stock observed during the call.
    #[error("requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// Catalog or stock lookup failed.
    #[error("transport error: {0}")]
    Transport(#[from] ApiError),

    /// The new cart could not be persisted; memory was not updated either.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The catalog returned data that would break cart invariants.
    #[error("invalid cart state: {0}")]
    Invariant(#[from] CartInvariantError),
}

impl CartError {
    /// Notice for this error, given the operation's generic failure notice.
    ///
    /// Stock rejections have their own message; every other failure collapses
    /// into the operation's generic one.
    #[must_use]
    pub const fn notice(&self, fallback: Notice) -> Notice {
        match self {
            Self::StockExceeded { .. } => Notice::StockExceeded,
            _ => fallback,
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(42),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "requested 6 of product 42, only 5 in stock"
        );

        let err = CartError::NotFound(ProductId::new(7));
        assert_eq!(err.to_string(), "product 7 is not in the cart");
    }

    #[test]
    fn test_notice_mapping() {
        let stock = CartError::StockExceeded {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        };
        assert_eq!(stock.notice(Notice::AddFailed), Notice::StockExceeded);
        assert_eq!(stock.notice(Notice::UpdateFailed), Notice::StockExceeded);

        let missing = CartError::NotFound(ProductId::new(1));
        assert_eq!(missing.notice(Notice::RemoveFailed), Notice::RemoveFailed);

        let transport = CartError::Transport(ApiError::NotFound("stock/1".to_string()));
        assert_eq!(transport.notice(Notice::AddFailed), Notice::AddFailed);
    }
}
