//! Paginated `_embedded` envelopes used by every luv2shop listing.
//!
//! ```json
//! {
//!   "_embedded": { "products": [ ... ] },
//!   "page": { "size": 5, "totalElements": 100, "totalPages": 20, "number": 0 }
//! }
//! ```
//!
//! The key inside `_embedded` depends on the resource, so each resource has
//! its own small wrapper implementing [`Embedded`].

use luv2shop_core::reference::{Country, State};
use luv2shop_core::{Page, PageMetadata, Product, ProductCategory};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A resource list stored under a resource-specific `_embedded` key.
pub trait Embedded: DeserializeOwned + Default {
    type Item;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Response envelope of a listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(bound = "E: Embedded")]
pub struct Envelope<E> {
    /// Absent when the API has nothing to embed.
    #[serde(rename = "_embedded", default)]
    pub embedded: E,
    #[serde(default)]
    pub page: Option<PageMetadata>,
}

impl<E: Embedded> Envelope<E> {
    /// Drop the metadata and keep only the items.
    pub fn into_items(self) -> Vec<E::Item> {
        self.embedded.into_items()
    }

    /// Items plus page metadata.
    ///
    /// Unpaged responses get metadata describing a single page.
    pub fn into_page(self) -> Page<E::Item> {
        let items = self.embedded.into_items();
        let page = self.page.unwrap_or_else(|| single_page(items.len()));
        Page { items, page }
    }
}

fn single_page(len: usize) -> PageMetadata {
    let size = u32::try_from(len).unwrap_or(u32::MAX);
    PageMetadata {
        size,
        total_elements: len as u64,
        total_pages: u32::from(len > 0),
        number: 0,
    }
}

macro_rules! embedded {
    ($name:ident, $item:ty, $key:literal) => {
        #[doc = concat!("`_embedded.", $key, "`")]
        #[derive(Debug, Default, Deserialize)]
        pub struct $name {
            #[serde(rename = $key, default)]
            items: Vec<$item>,
        }

        impl Embedded for $name {
            type Item = $item;

            fn into_items(self) -> Vec<$item> {
                self.items
            }
        }
    };
}

embedded!(Products, Product, "products");
embedded!(ProductCategories, ProductCategory, "productCategory");
embedded!(Countries, Country, "countries");
embedded!(States, State, "states");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luv2shop_core::{CategoryId, ProductId};

    use super::*;

    #[test]
    fn test_products_envelope() {
        let json = r#"{
            "_embedded": {
                "products": [
                    {"id": 1, "name": "Book", "unitPrice": 14.99, "imageUrl": "book.png"},
                    {"id": 2, "name": "Mug", "unitPrice": 9.5, "imageUrl": "mug.png"}
                ]
            },
            "_links": {"self": {"href": "http://localhost:8080/api/products"}},
            "page": {"size": 2, "totalElements": 42, "totalPages": 21, "number": 3}
        }"#;

        let envelope: Envelope<Products> = serde_json::from_str(json).unwrap();
        let page = envelope.into_page();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].id, ProductId::new(2));
        assert_eq!(
            page.page,
            PageMetadata {
                size: 2,
                total_elements: 42,
                total_pages: 21,
                number: 3,
            }
        );
    }

    #[test]
    fn test_category_envelope_without_page() {
        let json = r#"{"_embedded": {"productCategory": [{"id": 1, "categoryName": "Books"}]}}"#;
        let envelope: Envelope<ProductCategories> = serde_json::from_str(json).unwrap();
        let items = envelope.into_items();
        assert_eq!(items[0].id, CategoryId::new(1));
        assert_eq!(items[0].category_name, "Books");
    }

    #[test]
    fn test_missing_embedded_is_empty() {
        let json = r#"{"page": {"size": 20, "totalElements": 0, "totalPages": 0, "number": 0}}"#;
        let envelope: Envelope<States> = serde_json::from_str(json).unwrap();
        let page = envelope.into_page();
        assert!(page.items.is_empty());
        assert_eq!(page.page.total_pages, 0);
    }

    #[test]
    fn test_unpaged_metadata() {
        let json = r#"{"_embedded": {"countries": [{"id": 1, "code": "BR", "name": "Brazil"}]}}"#;
        let envelope: Envelope<Countries> = serde_json::from_str(json).unwrap();
        let page = envelope.into_page();
        assert_eq!(page.page.total_elements, 1);
        assert_eq!(page.page.total_pages, 1);
    }
}
