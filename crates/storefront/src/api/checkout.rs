//! Order placement.

use std::future::Future;

use luv2shop_core::purchase::{Purchase, PurchaseResponse};
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Something that can turn a [`Purchase`] into a placed order.
pub trait OrderPlacement: Send + Sync {
    fn place_order(
        &self,
        purchase: &Purchase,
    ) -> impl Future<Output = Result<PurchaseResponse, ApiError>> + Send;
}

/// Posts purchases to `{base}/checkout/purchase`.
#[derive(Clone)]
pub struct CheckoutClient {
    api: ApiClient,
}

impl CheckoutClient {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl OrderPlacement for CheckoutClient {
    #[instrument(
        skip(self, purchase),
        fields(
            items = purchase.order_items.len(),
            total_quantity = purchase.order.total_quantity,
        )
    )]
    async fn place_order(&self, purchase: &Purchase) -> Result<PurchaseResponse, ApiError> {
        let url = self.api.url(&["checkout", "purchase"], &[]);
        let response: PurchaseResponse = self.api.post_json(url, purchase).await?;
        tracing::info!(
            tracking_number = %response.order_tracking_number,
            "Order placed"
        );
        Ok(response)
    }
}
