//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use luv2shop_core::{CategoryId, Page, Product, ProductCategory, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Default products per page.
const DEFAULT_PAGE_SIZE: u32 = 5;

/// Category shown when none is selected.
const DEFAULT_CATEGORY: CategoryId = CategoryId::new(1);

/// Zero-based page index and page size from one-based query values.
fn resolve_page(page: Option<u32>, size: Option<u32>) -> Result<(u32, u32)> {
    let page = page.unwrap_or(1);
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page == 0 {
        return Err(AppError::BadRequest("page starts at 1".to_string()));
    }
    if size == 0 {
        return Err(AppError::BadRequest("size must be positive".to_string()));
    }
    Ok((page - 1, size))
}

/// Query parameters for the category listing (`page` is one-based).
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<CategoryId>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Query parameters for keyword search (`page` is one-based).
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// List product categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<ProductCategory>>> {
    Ok(Json(state.catalog().product_categories().await?))
}

/// List one page of products in a category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Product>>> {
    let (page, size) = resolve_page(query.page, query.size)?;
    let category = query.category.unwrap_or(DEFAULT_CATEGORY);
    let products = state
        .catalog()
        .product_list_paginate(page, size, category)
        .await?;
    Ok(Json(products))
}

/// Search products by keyword.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<Product>>> {
    let (page, size) = resolve_page(query.page, query.size)?;
    let keyword = query.keyword.trim();
    let products = state
        .catalog()
        .search_products_paginate(page, size, keyword)
        .await?;
    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().product(id).await?))
}
