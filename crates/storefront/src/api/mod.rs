//! Clients for the luv2shop REST API.
//!
//! # Architecture
//!
//! - One shared [`ApiClient`] (reqwest + base URL), cheaply cloneable
//! - Thin typed façades per resource: [`CatalogClient`], [`ReferenceClient`],
//!   [`CheckoutClient`]
//! - No caching and no retries: every failure surfaces to the caller
//!
//! # Endpoints
//!
//! ```text
//! GET  {base}/products/search/findByCategoryId?id=&page=&size=
//! GET  {base}/products/search/findByNameContaining?name=&page=&size=
//! GET  {base}/products/{id}
//! GET  {base}/product-category
//! GET  {base}/countries
//! GET  {base}/states/search/findByCountryCode?code=
//! POST {base}/checkout/purchase
//! ```
//!
//! Listings arrive in a paginated `_embedded` envelope (see [`envelope`]).

mod catalog;
mod checkout;
pub mod envelope;
mod reference;

pub use catalog::CatalogClient;
pub use checkout::{CheckoutClient, OrderPlacement};
pub use reference::{ReferenceClient, ReferenceData};

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of response body characters kept in errors and logs.
const BODY_PREVIEW_CHARS: usize = 500;

/// Errors that can occur when calling the luv2shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Shared HTTP client bound to the API base URL.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot have path segments appended
    /// or the HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        })
    }

    /// Base URL all requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build `{base}/{segments...}?{query}`.
    ///
    /// Segments and query values are percent-encoded.
    pub(crate) fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    /// GET a JSON document.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        Self::read_json(url, response).await
    }

    /// POST a JSON body and read a JSON document back.
    pub(crate) async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await?;
        Self::read_json(url, response).await
    }

    async fn read_json<T: DeserializeOwned>(
        url: Url,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;
        let preview: String = response_text.chars().take(BODY_PREVIEW_CHARS).collect();

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %preview,
                "luv2shop API returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                body: preview,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %preview,
                "Failed to parse luv2shop API response"
            );
            ApiError::Parse(e)
        })
    }
}
