//! Cart route handlers.
//!
//! Every mutation answers with the full cart so the client never has to
//! recompute totals. Totals are also pushed over server-sent events.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use luv2shop_core::{CartItem, CartTotals, Price, ProductId};
use serde::{Deserialize, Serialize};
use tokio_stream::{Stream, StreamExt, wrappers::WatchStream};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::{AppState, SharedCart};

/// Cart contents with derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_price: Price,
    pub total_quantity: u32,
}

impl From<&SharedCart> for CartView {
    fn from(cart: &SharedCart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart.items().to_vec(),
            total_price: totals.total_price,
            total_quantity: totals.total_quantity,
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Current cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().lock().await;
    Json(CartView::from(&*cart))
}

/// Add one unit of a product.
///
/// The product is fetched so the line carries the current name, image and
/// price.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state.catalog().product(request.product_id).await?;
    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

    let mut cart = state.cart().lock().await;
    cart.add_to_cart(CartItem::from(&product));
    Ok(Json(CartView::from(&*cart)))
}

/// Remove one unit of a line.
#[instrument(skip(state))]
pub async fn decrement(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.decrement_quantity(id);
    Json(CartView::from(&*cart))
}

/// Remove a whole line.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<ProductId>) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.remove(id);
    Json(CartView::from(&*cart))
}

/// Stream of cart totals.
///
/// The latest totals are sent immediately, followed by every change.
pub async fn totals_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let receiver = state.cart().lock().await.subscribe();
    let stream = WatchStream::new(receiver).map(|totals| Ok(totals_event(totals)));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn totals_event(totals: CartTotals) -> Event {
    let event = Event::default().event("totals");
    match serde_json::to_string(&totals) {
        Ok(data) => event.data(data),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize cart totals");
            event.comment("unavailable")
        }
    }
}
