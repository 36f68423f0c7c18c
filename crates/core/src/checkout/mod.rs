//! Checkout form model and validation.
//!
//! - [`validators`] - Field rules and the error taxonomy
//! - [`control`] - A single field with its rules
//! - [`form`] - The typed four-section checkout form

pub mod control;
pub mod form;
pub mod validators;

pub use control::FormControl;
pub use form::{
    AddressForm, AddressSection, AddressValue, CheckoutForm, CheckoutFormValue, CreditCardForm,
    CreditCardValue, CustomerForm, CustomerValue, FormErrors,
};
pub use validators::{FieldError, Pattern, Validator};
