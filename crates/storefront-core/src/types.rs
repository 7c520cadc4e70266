//! # Domain Types
//!
//! Catalog types exchanged with the external Product Service.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────────┐        ┌─────────────────┐                │
//! │  │        Product          │        │    ProductId    │                │
//! │  │  ─────────────────────  │        │  ─────────────  │                │
//! │  │  id          ProductId  │───────►│  u32, assigned  │                │
//! │  │  title       String     │        │  by the catalog │                │
//! │  │  price       Price      │        └─────────────────┘                │
//! │  │  image       String     │                                           │
//! │  │  description Option     │  (absent in list view)                    │
//! │  │  category    Option     │  (absent in list view)                    │
//! │  └─────────────────────────┘                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is the only key used for favorites uniqueness and for resolving a
//! cart or favorite entry back to its catalog record. Products are immutable
//! once obtained; stores only change which products they hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Price;
use crate::validation;

// =============================================================================
// Product Id
// =============================================================================

/// Catalog-assigned product identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(u32);

impl ProductId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier, immutable.
    pub id: ProductId,

    /// Display name.
    pub title: String,

    /// Unit price, never negative.
    #[ts(type = "number")]
    pub price: Price,

    /// Image URI.
    pub image: String,

    /// Long description (detail view only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category name (detail view only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// Builds a list-view product (no description or category).
    pub fn summary(
        id: ProductId,
        title: impl Into<String>,
        price: Price,
        image: impl Into<String>,
    ) -> Self {
        Product {
            id,
            title: title.into(),
            price,
            image: image.into(),
            description: None,
            category: None,
        }
    }

    /// Adds detail-view fields.
    pub fn with_details(
        mut self,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.description = Some(description.into());
        self.category = Some(category.into());
        self
    }

    /// Checks every product invariant.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_product_id(self.id)?;
        validation::validate_title(&self.title)?;
        validation::validate_price(self.price)?;
        validation::validate_image(&self.image)?;
        Ok(())
    }

    /// Returns true when detail-view fields are present.
    #[inline]
    pub fn has_details(&self) -> bool {
        self.description.is_some() || self.category.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKPACK_JSON: &str = r#"{
        "id": 1,
        "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
        "price": 109.95,
        "description": "Your perfect pack for everyday use and walks in the forest.",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        "rating": { "rate": 3.9, "count": 120 }
    }"#;

    #[test]
    fn test_deserialize_catalog_record() {
        let product: Product = serde_json::from_str(BACKPACK_JSON).unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(10995));
        assert_eq!(product.category.as_deref(), Some("men's clothing"));
        assert!(product.has_details());
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_deserialize_list_record_without_details() {
        let json = r#"{"id": 7, "title": "Ring", "price": 9.99, "image": "https://x/y.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.description, None);
        assert_eq!(product.category, None);
        assert!(!product.has_details());
    }

    #[test]
    fn test_serialize_skips_missing_details() {
        let product = Product::summary(
            ProductId::new(3),
            "Mug",
            Price::from_cents(550),
            "https://x/mug.png",
        );
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["price"], 5.5);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_with_details() {
        let product = Product::summary(
            ProductId::new(2),
            "Shirt",
            Price::from_cents(2230),
            "https://x/s.png",
        )
        .with_details("Slim fit", "men's clothing");

        assert_eq!(product.description.as_deref(), Some("Slim fit"));
        assert!(product.has_details());
    }

    #[test]
    fn test_validate_reports_negative_price() {
        let product = Product::summary(
            ProductId::new(4),
            "Broken",
            Price::from_cents(-1),
            "https://x/b.png",
        );
        assert_eq!(
            product.validate(),
            Err(ValidationError::MustBeNonNegative {
                field: "price".to_string()
            })
        );
    }
}
