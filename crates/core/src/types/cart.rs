//! Cart line items and the ordered cart collection.
//!
//! A [`Cart`] keeps its items in the order products were first added and never
//! holds two items for the same product. Quantities are [`NonZeroU32`], so an
//! item at zero cannot be represented; it has to be removed instead.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// Errors raised when a collection of line items would break cart invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartInvariantError {
    /// Two line items refer to the same product.
    #[error("product {0} appears more than once in the cart")]
    DuplicateProduct(ProductId),
}

/// One product's entry in the cart with its desired quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    pub price: Price,
    #[serde(alias = "image")]
    pub image_url: String,
    pub amount: NonZeroU32,
}

impl LineItem {
    /// Create a line item for a single unit of `product`.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            amount: NonZeroU32::MIN,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * self.amount.get()
    }
}

/// Ordered collection of line items, unique by product.
///
/// Serializes as a bare JSON array of [`LineItem`]. Deserializing rejects
/// arrays that repeat a product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Look up the line item for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line item quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.amount.get()))
            .sum()
    }

    /// Sum of all line item subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Append a line item at the end of the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError::DuplicateProduct` if the product is already
    /// in the cart.
    pub fn push(&mut self, item: LineItem) -> Result<(), CartInvariantError> {
        if self.contains(item.id) {
            return Err(CartInvariantError::DuplicateProduct(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove the line item for a product, keeping the order of the rest.
    pub fn remove(&mut self, id: ProductId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Returns `false` and leaves the cart untouched when the product is absent.
    pub fn set_amount(&mut self, id: ProductId, amount: NonZeroU32) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut cart = Self::new();
        for item in items {
            cart.push(item)?;
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = core::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, cents: i64) -> LineItem {
        LineItem::new(Product {
            id: ProductId::new(id),
            name: format!("Shoe {id}"),
            price: Price::from_cents(cents),
            image_url: format!("https://cdn.example/{id}.jpg"),
        })
    }

    fn amount(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_new_line_item_has_one_unit() {
        assert_eq!(item(1, 100).amount.get(), 1);
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.push(item(3, 100)).unwrap();
        cart.push(item(1, 100)).unwrap();
        cart.push(item(2, 100)).unwrap();

        let ids: Vec<i32> = cart.iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut cart = Cart::new();
        cart.push(item(1, 100)).unwrap();
        let err = cart.push(item(1, 100)).unwrap_err();
        assert_eq!(err, CartInvariantError::DuplicateProduct(ProductId::new(1)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_leaves_others_in_order() {
        let mut cart = Cart::try_from(vec![item(1, 100), item(2, 100), item(3, 100)]).unwrap();
        let removed = cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(removed.id, ProductId::new(2));

        let ids: Vec<i32> = cart.iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(cart.remove(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_set_amount_on_absent_product_is_noop() {
        let mut cart = Cart::try_from(vec![item(1, 100)]).unwrap();
        let before = cart.clone();
        assert!(!cart.set_amount(ProductId::new(9), amount(4)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::try_from(vec![item(1, 1000), item(2, 250)]).unwrap();
        cart.set_amount(ProductId::new(1), amount(3));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().subtotal(), Price::from_cents(3000));
        assert_eq!(cart.total(), Price::from_cents(3250));
    }

    #[test]
    fn test_cart_serializes_as_array() {
        let cart = Cart::try_from(vec![item(7, 13990)]).unwrap();
        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["id"], 7);
        assert_eq!(value[0]["amount"], 1);
        assert_eq!(value[0]["imageUrl"], "https://cdn.example/7.jpg");
    }

    #[test]
    fn test_cart_json_round_trip_preserves_order() {
        let mut cart = Cart::try_from(vec![item(5, 100), item(2, 19990), item(9, 5)]).unwrap();
        cart.set_amount(ProductId::new(2), amount(4));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_cart_deserialize_rejects_duplicates() {
        let json = r#"[
            {"id":1,"name":"a","price":"1","imageUrl":"x","amount":1},
            {"id":1,"name":"a","price":"1","imageUrl":"x","amount":2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_cart_deserialize_rejects_zero_amount() {
        let json = r#"[{"id":1,"name":"a","price":"1","imageUrl":"x","amount":0}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}
