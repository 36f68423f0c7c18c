//! Order placement payload.
//!
//! A [`Purchase`] is assembled from the validated checkout form and the cart
//! and posted to the checkout endpoint, which answers with a tracking number.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem, CartTotals};
use crate::checkout::{AddressValue, CustomerValue};
use crate::types::{Price, ProductId};

/// Customer section of a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&CustomerValue> for Customer {
    fn from(value: &CustomerValue) -> Self {
        Self {
            first_name: value.first_name.clone().unwrap_or_default(),
            last_name: value.last_name.clone().unwrap_or_default(),
            email: value.email.clone().unwrap_or_default(),
        }
    }
}

/// Shipping or billing address of a purchase, with display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl Address {
    /// Build from form values, replacing the country code with its name.
    ///
    /// Falls back to the code when no name is known.
    #[must_use]
    pub fn from_value(value: &AddressValue, country_name: Option<&str>) -> Self {
        let country = country_name
            .map(str::to_owned)
            .or_else(|| value.country.clone())
            .unwrap_or_default();

        Self {
            street: value.street.clone().unwrap_or_default(),
            city: value.city.clone().unwrap_or_default(),
            state: value.state.clone().unwrap_or_default(),
            country,
            zip_code: value.zip_code.clone().unwrap_or_default(),
        }
    }
}

/// Order header: the cart totals at the time of purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub total_price: Price,
    pub total_quantity: u32,
}

impl From<CartTotals> for Order {
    fn from(totals: CartTotals) -> Self {
        Self {
            total_price: totals.total_price,
            total_quantity: totals.total_quantity,
        }
    }
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub image_url: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub product_id: ProductId,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            image_url: item.image_url.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            product_id: item.id,
        }
    }
}

/// Body of `POST /checkout/purchase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub customer: Customer,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub order: Order,
    pub order_items: Vec<OrderItem>,
}

impl Purchase {
    /// Assemble a purchase for the current cart contents.
    #[must_use]
    pub fn new(
        customer: Customer,
        shipping_address: Address,
        billing_address: Address,
        cart: &Cart,
    ) -> Self {
        Self {
            customer,
            shipping_address,
            billing_address,
            order: Order::from(cart.totals()),
            order_items: cart.items().iter().map(OrderItem::from).collect(),
        }
    }
}

/// Response of the checkout endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub order_tracking_number: String,
}
