//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! rs-cli cart show
//! rs-cli cart show --json
//! rs-cli cart add 42
//! rs-cli cart set 42 3
//! rs-cli cart increment 42
//! rs-cli cart decrement 42
//! rs-cli cart remove 42
//! ```
//!
//! Shopper-facing notices (e.g. "requested quantity exceeds stock") are
//! printed to stderr; the command then fails with the underlying error.

use std::fmt::Write as _;
use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId};
use rocketshoes_storefront::notify::{RecordingNotifier, TracingNotifier};
use rocketshoes_storefront::state::AppState;
use rocketshoes_storefront::{CartError, CartStore, UpdateProductAmount};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The cart operation was rejected or failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Increment/decrement target is not in the cart.
    #[error("product {0} is not in the cart; use `cart add` first")]
    NotInCart(ProductId),

    /// Cart could not be encoded for output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Print the cart.
pub fn show(state: &AppState, json: bool) -> Result<(), CartCommandError> {
    let store = state.cart_store(Arc::new(TracingNotifier));
    let cart = store.cart();

    if json {
        print_out(&serde_json::to_string_pretty(&cart)?);
    } else {
        print_out(&render(&cart));
    }
    Ok(())
}

/// Add one unit of a product.
pub async fn add(state: &AppState, product_id: ProductId) -> Result<(), CartCommandError> {
    let (store, notifier) = open(state);
    let result = store.add_product(product_id).await;
    finish(&store, &notifier, result)
}

/// Remove a product.
pub async fn remove(state: &AppState, product_id: ProductId) -> Result<(), CartCommandError> {
    let (store, notifier) = open(state);
    let result = store.remove_product(product_id).await;
    finish(&store, &notifier, result)
}

/// Set a product's quantity.
pub async fn set(
    state: &AppState,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CartCommandError> {
    let (store, notifier) = open(state);
    if amount <= 0 {
        tracing::info!("Amount {amount} ignored; use `cart remove {product_id}` to drop the product");
    }
    let result = store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    finish(&store, &notifier, result)
}

/// Change a product's quantity by `delta`, the way the cart page buttons do.
///
/// Decrementing a single unit is ignored; the product has to be removed.
pub async fn step(
    state: &AppState,
    product_id: ProductId,
    delta: i64,
) -> Result<(), CartCommandError> {
    let (store, notifier) = open(state);
    let current = store
        .cart()
        .get(product_id)
        .map(|item| i64::from(item.amount.get()))
        .ok_or(CartCommandError::NotInCart(product_id))?;

    let amount = current + delta;
    if amount <= 0 {
        tracing::info!("Quantity is already 1; use `cart remove {product_id}` to drop the product");
    }

    let result = store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    finish(&store, &notifier, result)
}

fn open(state: &AppState) -> (CartStore, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let store = state.cart_store(notifier.clone());
    (store, notifier)
}

/// Show any notices, then the resulting cart on success.
fn finish(
    store: &CartStore,
    notifier: &RecordingNotifier,
    result: Result<(), CartError>,
) -> Result<(), CartCommandError> {
    for notice in notifier.take() {
        print_notice(&notice.to_string());
    }
    result?;
    print_out(&render(&store.cart()));
    Ok(())
}

/// Render the cart as a plain-text table.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = format!(
        "{:>6}  {:<40} {:>5} {:>12} {:>12}\n",
        "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"
    );
    for item in cart {
        let _ = writeln!(
            out,
            "{:>6}  {:<40} {:>5} {:>12} {:>12}",
            item.id,
            truncate(&item.name, 40),
            item.amount,
            item.price.to_string(),
            item.subtotal().to_string(),
        );
    }
    let _ = write!(
        out,
        "Total: {} ({} products, {} items)",
        cart.total(),
        cart.len(),
        cart.total_quantity()
    );
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[allow(clippy::print_stdout)]
fn print_out(text: &str) {
    println!("{text}");
}

#[allow(clippy::print_stderr)]
fn print_notice(text: &str) {
    eprintln!("error: {text}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rocketshoes_core::{LineItem, Price, Product};

    use super::*;

    fn cart_with(items: &[(i32, &str, i64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for &(id, name, cents, amount) in items {
            let mut item = LineItem::new(Product {
                id: ProductId::new(id),
                name: name.to_string(),
                price: Price::from_cents(cents),
                image_url: String::new(),
            });
            item.amount = amount.try_into().unwrap();
            cart.push(item).unwrap();
        }
        cart
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render(&Cart::new()), "Cart is empty");
    }

    #[test]
    fn test_render_lists_items_and_total() {
        let cart = cart_with(&[(42, "Tênis de Caminhada", 17990, 2), (7, "Runner", 9990, 1)]);
        let out = render(&cart);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Tênis de Caminhada"));
        assert!(lines[1].contains("$359.80"));
        assert!(lines[2].contains("Runner"));
        assert_eq!(lines[3], "Total: $459.70 (2 products, 3 items)");
    }

    #[test]
    fn test_show_reads_persisted_cart() {
        use rocketshoes_storefront::config::StorefrontConfig;
        use rocketshoes_storefront::storage::{CART_STORAGE_KEY, PersistentStore};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json").display().to_string();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "ROCKETSHOES_STORAGE_PATH" => Some(path.clone()),
            _ => None,
        })
        .unwrap();
        let state = AppState::new(config).unwrap();

        let cart = cart_with(&[(7, "Runner", 9990, 2)]);
        state
            .storage()
            .set(CART_STORAGE_KEY, &serde_json::to_string(&cart).unwrap())
            .unwrap();

        show(&state, false).unwrap();
        show(&state, true).unwrap();
        assert_eq!(state.cart_store(Arc::new(TracingNotifier)).cart(), cart);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
