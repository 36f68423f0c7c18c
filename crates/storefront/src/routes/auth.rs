//! Authentication route handlers.
//!
//! Sign-in runs in the browser against the OIDC provider; the storefront
//! only tells the browser which client to use.

use axum::{Json, extract::State};

use crate::config::OidcConfig;
use crate::state::AppState;

/// OIDC client configuration for the browser sign-in widget.
pub async fn config(State(state): State<AppState>) -> Json<OidcConfig> {
    Json(state.oidc().clone())
}
