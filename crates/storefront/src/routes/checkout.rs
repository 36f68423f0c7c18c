//! Checkout route handlers.
//!
//! Every handler except submit answers with the full [`CheckoutView`], so
//! the page re-renders from a single document. The workflow initializes
//! itself (month/year options, countries) on first use.

use axum::{Json, extract::State};
use luv2shop_core::checkout::AddressSection;
use luv2shop_core::purchase::PurchaseResponse;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{CheckoutView, FormUpdate, SubmitOutcome};
use crate::state::AppState;

/// Body of `POST /checkout/billing-same-as-shipping`.
#[derive(Debug, Deserialize)]
pub struct BillingSameAsShippingRequest {
    pub enabled: bool,
}

/// Body of `POST /checkout/expiration-year`.
#[derive(Debug, Deserialize)]
pub struct ExpirationYearRequest {
    pub year: i32,
}

/// Body of `POST /checkout/country`.
#[derive(Debug, Deserialize)]
pub struct CountryRequest {
    pub section: AddressSection,
}

/// Current checkout page state.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let mut checkout = state.checkout().lock().await;
    checkout.ensure_initialized().await?;
    Ok(Json(checkout.view()))
}

/// Apply edited form fields.
#[instrument(skip(state, update))]
pub async fn update_form(
    State(state): State<AppState>,
    Json(update): Json<FormUpdate>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = state.checkout().lock().await;
    checkout.ensure_initialized().await?;
    checkout.update(&update);
    Ok(Json(checkout.view()))
}

/// Toggle "billing address same as shipping".
#[instrument(skip(state))]
pub async fn billing_same_as_shipping(
    State(state): State<AppState>,
    Json(request): Json<BillingSameAsShippingRequest>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = state.checkout().lock().await;
    checkout.ensure_initialized().await?;
    checkout.copy_shipping_to_billing(request.enabled);
    Ok(Json(checkout.view()))
}

/// Select the card expiration year.
#[instrument(skip(state))]
pub async fn expiration_year(
    State(state): State<AppState>,
    Json(request): Json<ExpirationYearRequest>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = state.checkout().lock().await;
    checkout.ensure_initialized().await?;
    if !checkout.years().contains(&request.year) {
        return Err(AppError::BadRequest(format!(
            "{} is not an offered expiration year",
            request.year
        )));
    }
    checkout.select_expiration_year(request.year);
    Ok(Json(checkout.view()))
}

/// Reload the states of an address section after its country changed.
#[instrument(skip(state))]
pub async fn country(
    State(state): State<AppState>,
    Json(request): Json<CountryRequest>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = state.checkout().lock().await;
    checkout.ensure_initialized().await?;
    checkout.load_states_for_country(request.section).await?;
    Ok(Json(checkout.view()))
}

/// Validate the form and place the order.
///
/// Answers `422` with the error map when the form is invalid.
#[instrument(skip(state))]
pub async fn submit(State(state): State<AppState>) -> Result<Json<PurchaseResponse>> {
    let cart = state.cart().lock().await.cart().clone();

    let mut checkout = state.checkout().lock().await;
    checkout.ensure_initialized().await?;
    match checkout.submit(&cart, state.orders()).await? {
        SubmitOutcome::Invalid(errors) => Err(AppError::Validation(errors)),
        SubmitOutcome::Placed(response) => {
            add_breadcrumb(
                "checkout",
                "Order placed",
                Some(&[("tracking_number", response.order_tracking_number.as_str())]),
            );
            Ok(Json(response))
        }
    }
}
