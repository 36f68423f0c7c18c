//! luv2shop Core - Shared types and pure storefront logic.
//!
//! This crate provides the domain model used by the storefront process:
//! - catalog DTOs as served by the luv2shop REST API
//! - the shopping cart aggregate and its derived totals
//! - the typed checkout form with field validation
//! - reference data (credit card months/years, countries, states)
//! - the purchase payload sent when an order is placed
//!
//! # Architecture
//!
//! The core crate contains only types and logic - no I/O, no HTTP clients,
//! no storage. Persistence and network access live in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money
//! - [`catalog`] - Products, categories and paginated envelopes
//! - [`cart`] - Cart items and the cart aggregate
//! - [`checkout`] - Checkout form, controls and validators
//! - [`reference`] - Countries, states and credit card date options
//! - [`purchase`] - Order placement payload and response

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod purchase;
pub mod reference;
pub mod types;

pub use cart::{Cart, CartItem, CartTotals};
pub use catalog::{Page, PageMetadata, Product, ProductCategory};
pub use types::*;
