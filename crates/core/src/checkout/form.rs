//! Typed checkout form.
//!
//! Each section is a struct of [`FormControl`]s with a matching plain value
//! struct (`*Value`) used to read, copy and submit the section. Error paths
//! such as `shippingAddress.street` exist only for reporting.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::control::FormControl;
use super::validators::{FieldError, Pattern, Validator};

const REQUIRED: &[Validator] = &[Validator::Required];
const TEXT: &[Validator] = &[
    Validator::Required,
    Validator::MinLength(2),
    Validator::NotOnlyWhitespace,
];
const EMAIL: &[Validator] = &[Validator::Required, Validator::Pattern(Pattern::Email)];
const CARD_NUMBER: &[Validator] = &[Validator::Required, Validator::Pattern(Pattern::CardNumber)];
const SECURITY_CODE: &[Validator] = &[
    Validator::Required,
    Validator::Pattern(Pattern::SecurityCode),
];
const NONE: &[Validator] = &[];

/// Field errors keyed by dotted path (`customer.email`). Valid fields are absent.
pub type FormErrors = BTreeMap<String, BTreeSet<FieldError>>;

/// Define a form section and its plain value struct.
macro_rules! form_group {
    (
        $(#[$meta:meta])*
        $group:ident => $value:ident {
            $( $field:ident ($key:literal) : $rules:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $group {
            $( pub $field: FormControl, )+
        }

        #[doc = concat!("Plain values of a [`", stringify!($group), "`].")]
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $value {
            $( pub $field: Option<String>, )+
        }

        impl $group {
            /// Create the section with every control empty and untouched.
            #[must_use]
            pub const fn new() -> Self {
                Self {
                    $( $field: FormControl::new($rules), )+
                }
            }

            /// Snapshot of the current values (a deep copy).
            #[must_use]
            pub fn value(&self) -> $value {
                $value {
                    $( $field: self.$field.value().map(str::to_owned), )+
                }
            }

            /// Overwrite every control with the given values.
            pub fn set_value(&mut self, value: &$value) {
                $( self.$field.set(value.$field.clone()); )+
            }

            /// Apply the fields present in `value`, marking each one touched.
            ///
            /// Absent fields keep their value; an empty string clears one.
            pub fn patch(&mut self, value: &$value) {
                $(
                    if let Some(field) = &value.$field {
                        self.$field.set(Some(field.clone()));
                        self.$field.mark_as_touched();
                    }
                )+
            }

            /// Return every control to its empty, untouched state.
            pub fn reset(&mut self) {
                $( self.$field.reset(); )+
            }

            pub fn mark_all_as_touched(&mut self) {
                $( self.$field.mark_as_touched(); )+
            }

            /// Controls paired with their field keys.
            #[must_use]
            pub fn controls(&self) -> Vec<(&'static str, &FormControl)> {
                vec![ $( ($key, &self.$field), )+ ]
            }

            fn collect_errors(&self, section: &str, touched_only: bool, errors: &mut FormErrors) {
                for (key, control) in self.controls() {
                    if touched_only && !control.touched() {
                        continue;
                    }
                    let failed = control.errors();
                    if !failed.is_empty() {
                        errors.insert(format!("{section}.{key}"), failed);
                    }
                }
            }
        }

        impl Default for $group {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

form_group! {
    /// Customer contact details.
    CustomerForm => CustomerValue {
        first_name("firstName"): TEXT,
        last_name("lastName"): TEXT,
        email("email"): EMAIL,
    }
}

form_group! {
    /// A postal address (used for both shipping and billing).
    ///
    /// `country` holds the country code; `state` holds the state name.
    AddressForm => AddressValue {
        street("street"): TEXT,
        city("city"): TEXT,
        state("state"): REQUIRED,
        country("country"): REQUIRED,
        zip_code("zipCode"): TEXT,
    }
}

form_group! {
    /// Payment card details.
    CreditCardForm => CreditCardValue {
        card_type("cardType"): REQUIRED,
        name_on_card("nameOnCard"): TEXT,
        card_number("cardNumber"): CARD_NUMBER,
        security_code("securityCode"): SECURITY_CODE,
        expiration_month("expirationMonth"): NONE,
        expiration_year("expirationYear"): NONE,
    }
}

/// Which address section of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressSection {
    Shipping,
    Billing,
}

impl AddressSection {
    /// Key of the section in the form (`shippingAddress`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Shipping => "shippingAddress",
            Self::Billing => "billingAddress",
        }
    }
}

/// Values of the whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutFormValue {
    pub customer: CustomerValue,
    pub shipping_address: AddressValue,
    pub billing_address: AddressValue,
    pub credit_card: CreditCardValue,
}

/// The four-section checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer: CustomerForm,
    pub shipping_address: AddressForm,
    pub billing_address: AddressForm,
    pub credit_card: CreditCardForm,
}

impl CheckoutForm {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            customer: CustomerForm::new(),
            shipping_address: AddressForm::new(),
            billing_address: AddressForm::new(),
            credit_card: CreditCardForm::new(),
        }
    }

    #[must_use]
    pub fn value(&self) -> CheckoutFormValue {
        CheckoutFormValue {
            customer: self.customer.value(),
            shipping_address: self.shipping_address.value(),
            billing_address: self.billing_address.value(),
            credit_card: self.credit_card.value(),
        }
    }

    #[must_use]
    pub const fn address(&self, section: AddressSection) -> &AddressForm {
        match section {
            AddressSection::Shipping => &self.shipping_address,
            AddressSection::Billing => &self.billing_address,
        }
    }

    pub fn address_mut(&mut self, section: AddressSection) -> &mut AddressForm {
        match section {
            AddressSection::Shipping => &mut self.shipping_address,
            AddressSection::Billing => &mut self.billing_address,
        }
    }

    /// Copy shipping into billing, or reset billing.
    ///
    /// The copy is a snapshot: later edits to shipping do not reach billing.
    pub fn copy_shipping_to_billing(&mut self, enabled: bool) {
        if enabled {
            let shipping = self.shipping_address.value();
            self.billing_address.set_value(&shipping);
        } else {
            self.billing_address.reset();
        }
    }

    /// Every failing field across all sections.
    #[must_use]
    pub fn errors(&self) -> FormErrors {
        self.collect_errors(false)
    }

    /// Failing fields the shopper has already touched.
    #[must_use]
    pub fn touched_errors(&self) -> FormErrors {
        self.collect_errors(true)
    }

    fn collect_errors(&self, touched_only: bool) -> FormErrors {
        let mut errors = FormErrors::new();
        self.customer
            .collect_errors("customer", touched_only, &mut errors);
        self.shipping_address
            .collect_errors(AddressSection::Shipping.key(), touched_only, &mut errors);
        self.billing_address
            .collect_errors(AddressSection::Billing.key(), touched_only, &mut errors);
        self.credit_card
            .collect_errors("creditCard", touched_only, &mut errors);
        errors
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn mark_all_as_touched(&mut self) {
        self.customer.mark_all_as_touched();
        self.shipping_address.mark_all_as_touched();
        self.billing_address.mark_all_as_touched();
        self.credit_card.mark_all_as_touched();
    }

    pub fn reset(&mut self) {
        self.customer.reset();
        self.shipping_address.reset();
        self.billing_address.reset();
        self.credit_card.reset();
    }
}
