//! Product catalog queries.

use luv2shop_core::{CategoryId, Page, Product, ProductCategory, ProductId};
use tracing::instrument;

use super::envelope::{Envelope, ProductCategories, Products};
use super::{ApiClient, ApiError};

/// Read-only façade over the product and category endpoints.
///
/// The non-paginated listings leave paging to the API defaults and return
/// only the first page of items.
#[derive(Clone)]
pub struct CatalogClient {
    api: ApiClient,
}

impl CatalogClient {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn product_list(&self, category_id: CategoryId) -> Result<Vec<Product>, ApiError> {
        let url = self.api.url(
            &["products", "search", "findByCategoryId"],
            &[("id", category_id.to_string())],
        );
        let envelope: Envelope<Products> = self.api.get_json(url).await?;
        Ok(envelope.into_items())
    }

    /// One page of products in a category (`page` is zero-based).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn product_list_paginate(
        &self,
        page: u32,
        page_size: u32,
        category_id: CategoryId,
    ) -> Result<Page<Product>, ApiError> {
        let url = self.api.url(
            &["products", "search", "findByCategoryId"],
            &[
                ("id", category_id.to_string()),
                ("page", page.to_string()),
                ("size", page_size.to_string()),
            ],
        );
        let envelope: Envelope<Products> = self.api.get_json(url).await?;
        Ok(envelope.into_page())
    }

    /// Products whose name contains `keyword`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, keyword: &str) -> Result<Vec<Product>, ApiError> {
        let url = self.api.url(
            &["products", "search", "findByNameContaining"],
            &[("name", keyword.to_string())],
        );
        let envelope: Envelope<Products> = self.api.get_json(url).await?;
        Ok(envelope.into_items())
    }

    /// One page of keyword search results (`page` is zero-based).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products_paginate(
        &self,
        page: u32,
        page_size: u32,
        keyword: &str,
    ) -> Result<Page<Product>, ApiError> {
        let url = self.api.url(
            &["products", "search", "findByNameContaining"],
            &[
                ("name", keyword.to_string()),
                ("page", page.to_string()),
                ("size", page_size.to_string()),
            ],
        );
        let envelope: Envelope<Products> = self.api.get_json(url).await?;
        Ok(envelope.into_page())
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let url = self.api.url(&["products", &product_id.to_string()], &[]);
        self.api.get_json(url).await
    }

    /// All product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn product_categories(&self) -> Result<Vec<ProductCategory>, ApiError> {
        let url = self.api.url(&["product-category"], &[]);
        let envelope: Envelope<ProductCategories> = self.api.get_json(url).await?;
        Ok(envelope.into_items())
    }
}
