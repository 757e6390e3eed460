//! Catalog and stock resources as served by the storefront API.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Product metadata from `GET /products/{id}`.
///
/// The API has historically served `title` and `image` instead of `name` and
/// `imageUrl`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    pub price: Price,
    #[serde(alias = "image")]
    pub image_url: String,
}

/// Available quantity from `GET /stock/{id}`.
///
/// The API may report a negative level; nothing is in stock then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: i64,
}

impl Stock {
    /// Whether `requested` units can be satisfied by this stock level.
    #[must_use]
    pub fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_accepts_legacy_field_names() {
        let json = r#"{"id":1,"title":"Tênis de Caminhada","price":179.9,"image":"https://cdn.example/1.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.name, "Tênis de Caminhada");
        assert_eq!(product.image_url, "https://cdn.example/1.jpg");
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product {
            id: ProductId::new(2),
            name: "Runner".to_string(),
            price: Price::from_cents(9990),
            image_url: "https://cdn.example/2.jpg".to_string(),
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["imageUrl"], "https://cdn.example/2.jpg");
        assert_eq!(value["name"], "Runner");
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock {
            id: ProductId::new(1),
            amount: 3,
        };
        assert!(stock.covers(3));
        assert!(!stock.covers(4));
        assert!(stock.covers(-1));
    }

    #[test]
    fn test_negative_stock_covers_nothing() {
        let stock: Stock = serde_json::from_str(r#"{"id":1,"amount":-2}"#).unwrap();
        assert_eq!(stock.amount, -2);
        assert!(!stock.covers(1));
        assert!(!stock.covers(0));
    }
}
