//! Catalog types as served by the luv2shop REST API.
//!
//! Field names follow the API's camelCase JSON. Only the fields the
//! storefront needs to display and add a product to the cart are required;
//! everything else is optional so older payloads still deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

/// A product from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub sku: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Price,
    pub image_url: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub units_in_stock: Option<i64>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A product category (used for the category menu).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: CategoryId,
    pub category_name: String,
}

/// Pagination metadata returned with every paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Requested page size.
    pub size: u32,
    /// Total number of matching elements across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Zero-based index of this page.
    pub number: u32,
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: PageMetadata,
}

impl<T> Page<T> {
    /// Returns `true` if there is a page after this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page.number.saturating_add(1) < self.page.total_pages
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_api_payload() {
        let json = r#"{
            "id": 1,
            "sku": "BOOK-TECH-1000",
            "name": "Crash Course in Python",
            "description": "Learn Python at your own pace.",
            "unitPrice": 14.99,
            "imageUrl": "assets/images/products/books/book-luv2code-1000.png",
            "active": true,
            "unitsInStock": 100,
            "dateCreated": "2024-05-01T10:15:30.000+00:00",
            "lastUpdated": null
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.unit_price, Price::from_cents(1499));
        assert_eq!(product.units_in_stock, Some(100));
        assert!(product.date_created.is_some());
        assert!(product.last_updated.is_none());
    }

    #[test]
    fn test_product_minimal_payload() {
        let json = r#"{"id": 7, "name": "Mug", "unitPrice": 10, "imageUrl": "mug.png"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.unit_price, Price::from_cents(1000));
        assert!(product.sku.is_none());
    }

    #[test]
    fn test_page_has_next() {
        let mut page = Page {
            items: vec![1, 2],
            page: PageMetadata {
                size: 2,
                total_elements: 5,
                total_pages: 3,
                number: 0,
            },
        };
        assert!(page.has_next());
        page.page.number = 2;
        assert!(!page.has_next());

        page.page.number = u32::MAX;
        page.page.total_pages = u32::MAX;
        assert!(!page.has_next());
    }
}
