//! Reference data for the checkout form.
//!
//! Countries and states come from the API; credit card months and years are
//! computed locally from the current date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{CountryId, StateId};

/// Number of years after the current one offered for card expiration.
pub const EXPIRATION_YEARS_AHEAD: i32 = 10;

/// A country that can be shipped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    /// ISO 3166 alpha-2 code (`US`, `BR`).
    pub code: String,
    pub name: String,
}

/// A state or province of a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
}

/// Months from `start_month` through December.
///
/// `start_month` is clamped into `1..=12`.
#[must_use]
pub fn credit_card_months(start_month: u32) -> Vec<u32> {
    (start_month.clamp(1, 12)..=12).collect()
}

/// The current year followed by the next [`EXPIRATION_YEARS_AHEAD`] years.
#[must_use]
pub fn credit_card_years(current_year: i32) -> Vec<i32> {
    (current_year..=current_year + EXPIRATION_YEARS_AHEAD).collect()
}

/// Valid expiration months for the selected year.
///
/// No selection counts as the current year, the first year offered. For the
/// current year only the remaining months are offered; any other year offers
/// all twelve.
#[must_use]
pub fn expiration_months(selected_year: Option<i32>, today: NaiveDate) -> Vec<u32> {
    let start_month = if selected_year.unwrap_or(today.year()) == today.year() {
        today.month()
    } else {
        1
    };
    credit_card_months(start_month)
}
