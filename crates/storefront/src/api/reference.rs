//! Countries and states for the checkout form.

use std::future::Future;

use luv2shop_core::reference::{Country, State};
use tracing::instrument;

use super::envelope::{Countries, Envelope, States};
use super::{ApiClient, ApiError};

/// Remote reference data needed by the checkout form.
pub trait ReferenceData: Send + Sync {
    /// All countries that can be shipped to.
    fn countries(&self) -> impl Future<Output = Result<Vec<Country>, ApiError>> + Send;

    /// States of the country with the given code.
    fn states(
        &self,
        country_code: &str,
    ) -> impl Future<Output = Result<Vec<State>, ApiError>> + Send;
}

/// Form reference data backed by the luv2shop API.
#[derive(Clone)]
pub struct ReferenceClient {
    api: ApiClient,
}

impl ReferenceClient {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl ReferenceData for ReferenceClient {
    #[instrument(skip(self))]
    async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        let url = self.api.url(&["countries"], &[]);
        let envelope: Envelope<Countries> = self.api.get_json(url).await?;
        Ok(envelope.into_items())
    }

    #[instrument(skip(self))]
    async fn states(&self, country_code: &str) -> Result<Vec<State>, ApiError> {
        let url = self.api.url(
            &["states", "search", "findByCountryCode"],
            &[("code", country_code.to_string())],
        );
        let envelope: Envelope<States> = self.api.get_json(url).await?;
        let states = envelope.into_items();
        tracing::debug!(count = states.len(), "Loaded states");
        Ok(states)
    }
}
