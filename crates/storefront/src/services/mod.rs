//! Stateful storefront services.
//!
//! - [`cart`] - The persisted cart and its totals channel
//! - [`checkout`] - The checkout form workflow and order placement

pub mod cart;
pub mod checkout;

pub use cart::{CART_ITEMS_KEY, CartService};
pub use checkout::{CheckoutView, CheckoutWorkflow, FormUpdate, SubmitOutcome};
