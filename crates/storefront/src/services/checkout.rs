//! Checkout workflow: form state, dependent option lists and order placement.
//!
//! The workflow owns the [`CheckoutForm`] plus everything the checkout page
//! needs around it: credit card month/year options, the country list, one
//! state list per address section and the latest cart totals. Requests for
//! the same section are not cancelled; the last one to finish wins.

use chrono::{Datelike, Local, NaiveDate};
use luv2shop_core::checkout::{
    AddressSection, AddressValue, CheckoutForm, CheckoutFormValue, CreditCardValue, CustomerValue,
    FormErrors,
};
use luv2shop_core::purchase::{Address, Customer, Purchase, PurchaseResponse};
use luv2shop_core::reference::{self, Country, State};
use luv2shop_core::{Cart, CartTotals, Price};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::instrument;

use crate::api::{ApiError, OrderPlacement, ReferenceData};

/// Sections of the form to update. Only fields present are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormUpdate {
    pub customer: Option<CustomerValue>,
    pub shipping_address: Option<AddressValue>,
    pub billing_address: Option<AddressValue>,
    pub credit_card: Option<CreditCardValue>,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form has errors; every control is now touched and no order was sent.
    Invalid(FormErrors),
    /// The order was accepted and the form has been reset.
    Placed(PurchaseResponse),
}

/// Everything the checkout page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub form: CheckoutFormValue,
    /// Errors of touched controls only.
    pub errors: FormErrors,
    pub valid: bool,
    pub billing_same_as_shipping: bool,
    pub credit_card_months: Vec<u32>,
    pub credit_card_years: Vec<i32>,
    pub countries: Vec<Country>,
    pub shipping_address_states: Vec<State>,
    pub billing_address_states: Vec<State>,
    pub total_price: Price,
    pub total_quantity: u32,
}

/// State machine behind the checkout page.
pub struct CheckoutWorkflow<R> {
    reference: R,
    form: CheckoutForm,
    billing_same_as_shipping: bool,
    months: Vec<u32>,
    years: Vec<i32>,
    countries: Vec<Country>,
    shipping_states: Vec<State>,
    billing_states: Vec<State>,
    totals: watch::Receiver<CartTotals>,
    clock: fn() -> NaiveDate,
    initialized: bool,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<R: ReferenceData> CheckoutWorkflow<R> {
    pub fn new(reference: R, totals: watch::Receiver<CartTotals>) -> Self {
        Self {
            reference,
            form: CheckoutForm::new(),
            billing_same_as_shipping: false,
            months: Vec::new(),
            years: Vec::new(),
            countries: Vec::new(),
            shipping_states: Vec::new(),
            billing_states: Vec::new(),
            totals,
            clock: local_today,
            initialized: false,
        }
    }

    /// Replace the source of "today" used for month and year options.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    /// Populate month and year options and fetch the country list.
    ///
    /// # Errors
    ///
    /// Returns an error if the country list cannot be fetched. The local
    /// options are populated regardless and initialization is retried on
    /// the next [`ensure_initialized`](Self::ensure_initialized).
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Result<(), ApiError> {
        self.years = reference::credit_card_years((self.clock)().year());
        self.refresh_month_options();

        self.countries = self.reference.countries().await?;
        self.initialized = true;
        tracing::debug!(countries = self.countries.len(), "Checkout initialized");
        Ok(())
    }

    /// Initialize on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization is needed and fails.
    pub async fn ensure_initialized(&mut self) -> Result<(), ApiError> {
        if self.initialized {
            return Ok(());
        }
        self.initialize().await
    }

    /// Apply edited fields. A changed expiration year refreshes the months.
    pub fn update(&mut self, update: &FormUpdate) {
        let previous_year = self.form.credit_card.expiration_year.value().map(str::to_owned);

        if let Some(customer) = &update.customer {
            self.form.customer.patch(customer);
        }
        if let Some(shipping) = &update.shipping_address {
            self.form.shipping_address.patch(shipping);
        }
        if let Some(billing) = &update.billing_address {
            self.form.billing_address.patch(billing);
        }
        if let Some(card) = &update.credit_card {
            self.form.credit_card.patch(card);
        }

        if self.form.credit_card.expiration_year.value() != previous_year.as_deref() {
            self.refresh_month_options();
        }
    }

    /// Copy shipping into billing (a snapshot, including its state list),
    /// or reset billing.
    pub fn copy_shipping_to_billing(&mut self, enabled: bool) {
        self.billing_same_as_shipping = enabled;
        self.form.copy_shipping_to_billing(enabled);
        if enabled {
            self.billing_states.clone_from(&self.shipping_states);
        } else {
            self.billing_states.clear();
        }
    }

    /// Select an expiration year and refresh the month options.
    pub fn select_expiration_year(&mut self, year: i32) {
        self.form
            .credit_card
            .expiration_year
            .set(Some(year.to_string()));
        self.form.credit_card.expiration_year.mark_as_touched();
        self.refresh_month_options();
    }

    /// Current month onwards for the current (or unselected) year, all
    /// months otherwise.
    pub fn refresh_month_options(&mut self) {
        let selected = self
            .form
            .credit_card
            .expiration_year
            .value()
            .and_then(|year| year.trim().parse::<i32>().ok());
        self.months = reference::expiration_months(selected, (self.clock)());
    }

    /// Reload the state list of `section` for its selected country.
    ///
    /// The section's state defaults to the first entry, or is cleared when
    /// the country has no states. Without a country the list is cleared and
    /// nothing is fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if the states cannot be fetched; the previous list
    /// is kept.
    #[instrument(skip(self))]
    pub async fn load_states_for_country(
        &mut self,
        section: AddressSection,
    ) -> Result<(), ApiError> {
        let code = self
            .form
            .address(section)
            .country
            .value()
            .filter(|code| !code.is_empty())
            .map(str::to_owned);

        let Some(code) = code else {
            self.states_mut(section).clear();
            return Ok(());
        };

        let states = self.reference.states(&code).await?;
        let first = states.first().map(|state| state.name.clone());
        self.form.address_mut(section).state.set(first);
        *self.states_mut(section) = states;
        Ok(())
    }

    /// Validate and place the order for `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be placed; the form is kept.
    #[instrument(skip_all)]
    pub async fn submit<O: OrderPlacement>(
        &mut self,
        cart: &Cart,
        orders: &O,
    ) -> Result<SubmitOutcome, ApiError> {
        if !self.form.is_valid() {
            self.form.mark_all_as_touched();
            let errors = self.form.errors();
            tracing::info!(fields = errors.len(), "Checkout form invalid");
            return Ok(SubmitOutcome::Invalid(errors));
        }

        let purchase = self.purchase(cart);
        let response = orders.place_order(&purchase).await?;

        self.form.reset();
        self.billing_same_as_shipping = false;
        self.shipping_states.clear();
        self.billing_states.clear();
        self.refresh_month_options();
        Ok(SubmitOutcome::Placed(response))
    }

    /// Build the purchase payload from the form and the cart.
    #[must_use]
    pub fn purchase(&self, cart: &Cart) -> Purchase {
        let value = self.form.value();
        let shipping = Address::from_value(
            &value.shipping_address,
            self.country_name(value.shipping_address.country.as_deref()),
        );
        let billing = Address::from_value(
            &value.billing_address,
            self.country_name(value.billing_address.country.as_deref()),
        );
        Purchase::new(Customer::from(&value.customer), shipping, billing, cart)
    }

    #[must_use]
    pub fn view(&self) -> CheckoutView {
        let totals = *self.totals.borrow();
        CheckoutView {
            form: self.form.value(),
            errors: self.form.touched_errors(),
            valid: self.form.is_valid(),
            billing_same_as_shipping: self.billing_same_as_shipping,
            credit_card_months: self.months.clone(),
            credit_card_years: self.years.clone(),
            countries: self.countries.clone(),
            shipping_address_states: self.shipping_states.clone(),
            billing_address_states: self.billing_states.clone(),
            total_price: totals.total_price,
            total_quantity: totals.total_quantity,
        }
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Offered expiration years.
    #[must_use]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    #[must_use]
    pub fn states(&self, section: AddressSection) -> &[State] {
        match section {
            AddressSection::Shipping => &self.shipping_states,
            AddressSection::Billing => &self.billing_states,
        }
    }

    const fn states_mut(&mut self, section: AddressSection) -> &mut Vec<State> {
        match section {
            AddressSection::Shipping => &mut self.shipping_states,
            AddressSection::Billing => &mut self.billing_states,
        }
    }

    fn country_name(&self, code: Option<&str>) -> Option<&str> {
        let code = code?;
        self.countries
            .iter()
            .find(|country| country.code == code)
            .map(|country| country.name.as_str())
    }
}
