//! Shopping cart state container.
//!
//! [`CartStore`] owns the shopper's [`Cart`] and is the only way to change it.
//! Each mutation is a single read-validate-write cycle:
//!
//! 1. build a candidate cart from the current snapshot
//! 2. validate the requested quantity against live stock
//! 3. persist the candidate, then publish it as the new snapshot
//!
//! A failure at any step leaves both the in-memory and persisted cart as they
//! were, notifies the shopper, and is returned to the caller.
//!
//! # Concurrency
//!
//! Mutations are serialized through an async gate held across the remote
//! lookups, so overlapping calls cannot overwrite each other's result.
//! [`CartStore::cart`] never waits on the gate; it returns the last committed
//! snapshot.

use std::num::NonZeroU32;
use std::sync::{Arc, PoisonError, RwLock};

use rocketshoes_core::{Cart, LineItem, ProductId, Stock};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::{CartError, Result};
use crate::notify::{Notice, Notifier};
use crate::services::{CatalogService, StockService};
use crate::storage::{CART_STORAGE_KEY, PersistentStore, StorageError};

/// Arguments for [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Desired quantity. Zero or negative is ignored.
    pub amount: i64,
}

/// The shopper's cart with its remote and local collaborators.
pub struct CartStore {
    catalog: Arc<dyn CatalogService>,
    stock: Arc<dyn StockService>,
    storage: Arc<dyn PersistentStore>,
    notifier: Arc<dyn Notifier>,
    cart: RwLock<Cart>,
    mutations: Mutex<()>,
}

impl CartStore {
    /// Create a store, restoring the cart persisted in `storage`.
    ///
    /// A missing or unreadable slot starts an empty cart.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        stock: Arc<dyn StockService>,
        storage: Arc<dyn PersistentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = load_cart(storage.as_ref());
        debug!(items = cart.len(), "Cart restored");

        Self {
            catalog,
            stock,
            storage,
            notifier,
            cart: RwLock::new(cart),
            mutations: Mutex::new(()),
        }
    }

    /// Snapshot of the committed cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Add one unit of a product.
    ///
    /// New products are looked up in the catalog and appended with amount 1;
    /// products already in the cart are incremented by one.
    ///
    /// # Errors
    ///
    /// - `CartError::StockExceeded` if the new amount is above stock
    /// - `CartError::Transport` if the catalog or stock lookup fails
    /// - `CartError::Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        let _gate = self.mutations.lock().await;
        let result = self.try_add_product(product_id).await;
        self.settle(result, Notice::AddFailed)
    }

    /// Remove a product and its whole quantity.
    ///
    /// # Errors
    ///
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let _gate = self.mutations.lock().await;
        let result = self.try_remove_product(product_id).await;
        self.settle(result, Notice::RemoveFailed)
    }

    /// Set the quantity of a product in the cart.
    ///
    /// An amount of zero or below is ignored without any lookup; callers
    /// remove the product instead. A product that is not in the cart is not
    /// created.
    ///
    /// # Errors
    ///
    /// - `CartError::StockExceeded` if `amount` is above stock
    /// - `CartError::Transport` if the stock lookup fails
    /// - `CartError::Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) -> Result<()> {
        if update.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(());
        }

        let _gate = self.mutations.lock().await;
        let result = self.try_update_product_amount(update).await;
        self.settle(result, Notice::UpdateFailed)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<()> {
        let mut candidate = self.cart();
        let current = candidate.get(product_id).map(|item| item.amount);

        if current.is_none() {
            let product = self.catalog.product(product_id).await?;
            candidate.push(LineItem::new(product))?;
        }
        let requested = current.map_or(1, |amount| i64::from(amount.get()) + 1);

        let stock = self.stock.stock(product_id).await?;
        let amount = checked_amount(product_id, &stock, requested)?;

        candidate.set_amount(product_id, amount);
        self.commit(candidate).await?;

        info!(amount = amount.get(), "Product added to cart");
        Ok(())
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<()> {
        let mut candidate = self.cart();
        candidate
            .remove(product_id)
            .ok_or(CartError::NotFound(product_id))?;

        self.commit(candidate).await?;

        info!("Product removed from cart");
        Ok(())
    }

    async fn try_update_product_amount(&self, update: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = update;

        let stock = self.stock.stock(product_id).await?;
        let amount = checked_amount(product_id, &stock, amount)?;

        let mut candidate = self.cart();
        if !candidate.set_amount(product_id, amount) {
            debug!("Product not in cart, nothing to update");
        }

        self.commit(candidate).await?;

        info!(amount = amount.get(), "Cart quantity updated");
        Ok(())
    }

    /// Persist `cart`, then publish it as the committed snapshot.
    ///
    /// The write runs on the blocking pool.
    async fn commit(&self, cart: Cart) -> Result<()> {
        let json = serde_json::to_string(&cart).map_err(StorageError::from)?;
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || storage.set(CART_STORAGE_KEY, &json))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;

        *self.cart.write().unwrap_or_else(PoisonError::into_inner) = cart;
        Ok(())
    }

    /// Notify the shopper about a failed operation and hand the result back.
    fn settle(&self, result: Result<()>, fallback: Notice) -> Result<()> {
        if let Err(err) = &result {
            match err {
                CartError::StockExceeded { .. } | CartError::NotFound(_) => {
                    info!(error = %err, "Cart operation rejected");
                }
                _ => warn!(error = %err, "Cart operation failed"),
            }
            self.notifier.notify(err.notice(fallback));
        }
        result
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

/// Validate `requested` against `stock` and convert it to a line amount.
///
/// Any quantity a line item cannot hold is reported as over stock.
fn checked_amount(product_id: ProductId, stock: &Stock, requested: i64) -> Result<NonZeroU32> {
    let exceeded = || CartError::StockExceeded {
        product_id,
        requested,
        available: stock.amount,
    };

    if !stock.covers(requested) {
        return Err(exceeded());
    }
    u32::try_from(requested)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(exceeded)
}

fn load_cart(storage: &dyn PersistentStore) -> Cart {
    match storage.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Stored cart is unreadable, starting empty");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            Cart::new()
        }
    }
}
