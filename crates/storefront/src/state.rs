//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ApiClient, ApiError, CatalogClient, CheckoutClient, ReferenceClient};
use crate::config::{OidcConfig, StorefrontConfig};
use crate::services::{CartService, CheckoutWorkflow};
use crate::storage::{FileStore, KeyValueStore};

/// Cart service over whichever store the process was started with.
pub type SharedCart = CartService<Box<dyn KeyValueStore>>;

/// Application state shared across all handlers.
///
/// The storefront serves a single shopper, so the cart and the checkout
/// workflow live here behind async mutexes. Handlers lock, mutate and
/// release; requests are applied in the order they acquire the lock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    oidc: OidcConfig,
    catalog: CatalogClient,
    orders: CheckoutClient,
    cart: Mutex<SharedCart>,
    checkout: Mutex<CheckoutWorkflow<ReferenceClient>>,
}

impl AppState {
    /// Create the state with the cart persisted to the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let store = FileStore::new(config.cart_store_path.clone());
        Self::with_store(config, Box::new(store))
    }

    /// Create the state over an explicit cart store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn with_store(
        config: &StorefrontConfig,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(config.api_url.clone())?;
        let cart = CartService::new(store);
        let checkout = CheckoutWorkflow::new(ReferenceClient::new(api.clone()), cart.subscribe());

        tracing::info!(
            api_url = %config.api_url,
            cart_items = cart.items().len(),
            "Application state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                oidc: config.oidc.clone(),
                catalog: CatalogClient::new(api.clone()),
                orders: CheckoutClient::new(api),
                cart: Mutex::new(cart),
                checkout: Mutex::new(checkout),
            }),
        })
    }

    /// OIDC client configuration served to the browser.
    #[must_use]
    pub fn oidc(&self) -> &OidcConfig {
        &self.inner.oidc
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn orders(&self) -> &CheckoutClient {
        &self.inner.orders
    }

    #[must_use]
    pub fn cart(&self) -> &Mutex<SharedCart> {
        &self.inner.cart
    }

    #[must_use]
    pub fn checkout(&self) -> &Mutex<CheckoutWorkflow<ReferenceClient>> {
        &self.inner.checkout
    }
}
