//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//! GET    /auth/config                     - OIDC client configuration
//!
//! # Catalog
//! GET    /categories                      - Category list
//! GET    /products?category=&page=&size=  - Products in a category
//! GET    /products/search?keyword=&page=&size= - Keyword search
//! GET    /products/{id}                   - Product detail
//!
//! # Cart
//! GET    /cart                            - Items and totals
//! POST   /cart/items                      - Add one unit ({productId})
//! POST   /cart/items/{id}/decrement       - Remove one unit
//! DELETE /cart/items/{id}                 - Remove the line
//! GET    /cart/totals/stream              - Totals as server-sent events
//!
//! # Checkout
//! GET    /checkout                        - Form, errors, options and totals
//! PUT    /checkout/form                   - Update form fields
//! POST   /checkout/billing-same-as-shipping - Copy or reset billing
//! POST   /checkout/expiration-year        - Select year, refresh months
//! POST   /checkout/country                - Reload states for a section
//! POST   /checkout/submit                 - Validate and place the order
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/search", get(products::search))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}", delete(cart::remove))
        .route("/items/{id}/decrement", post(cart::decrement))
        .route("/totals/stream", get(cart::totals_stream))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/form", put(checkout::update_form))
        .route(
            "/billing-same-as-shipping",
            post(checkout::billing_same_as_shipping),
        )
        .route("/expiration-year", post(checkout::expiration_year))
        .route("/country", post(checkout::country))
        .route("/submit", post(checkout::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/config", get(auth::config))
        .route("/categories", get(products::categories))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}

/// Build the application router with request tracing.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
