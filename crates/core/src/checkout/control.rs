//! A single form control: value, touched flag and rule set.

use std::collections::BTreeSet;

use super::validators::{FieldError, Validator};

/// One leaf field of the checkout form.
///
/// The value is `None` after construction or [`reset`](Self::reset); it
/// becomes `Some` once anything (including an empty string) is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    value: Option<String>,
    touched: bool,
    validators: &'static [Validator],
}

impl FormControl {
    /// Create an empty, untouched control with the given rules.
    #[must_use]
    pub const fn new(validators: &'static [Validator]) -> Self {
        Self {
            value: None,
            touched: false,
            validators,
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Replace the value.
    pub fn set(&mut self, value: Option<String>) {
        self.value = value;
    }

    /// Clear the value and the touched flag.
    pub fn reset(&mut self) {
        self.value = None;
        self.touched = false;
    }

    /// Whether the control has been touched (validation messages render).
    #[must_use]
    pub const fn touched(&self) -> bool {
        self.touched
    }

    pub fn mark_as_touched(&mut self) {
        self.touched = true;
    }

    /// Union of every failing rule.
    #[must_use]
    pub fn errors(&self) -> BTreeSet<FieldError> {
        self.validators
            .iter()
            .filter_map(|validator| validator.check(self.value()))
            .collect()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::validators::Pattern;

    static NAME: [Validator; 3] = [
        Validator::Required,
        Validator::MinLength(2),
        Validator::NotOnlyWhitespace,
    ];
    static EMAIL: [Validator; 2] = [Validator::Required, Validator::Pattern(Pattern::Email)];

    fn control(rules: &'static [Validator], value: &str) -> FormControl {
        let mut c = FormControl::new(rules);
        c.set(Some(value.to_string()));
        c
    }

    #[test]
    fn test_blank_fails_only_not_only_whitespace() {
        let errors = control(&NAME, "   ").errors();
        assert_eq!(errors, BTreeSet::from([FieldError::NotOnlyWhitespace]));
    }

    #[test]
    fn test_empty_fails_only_required() {
        assert_eq!(
            control(&NAME, "").errors(),
            BTreeSet::from([FieldError::Required])
        );
        assert_eq!(
            FormControl::new(&NAME).errors(),
            BTreeSet::from([FieldError::Required])
        );
    }

    #[test]
    fn test_errors_are_a_union() {
        let errors = control(&NAME, " ").errors();
        assert_eq!(
            errors,
            BTreeSet::from([FieldError::MinLength, FieldError::NotOnlyWhitespace])
        );
    }

    #[test]
    fn test_valid_value_passes() {
        assert!(control(&NAME, "ok").is_valid());
        assert!(control(&EMAIL, "ok@example.com").is_valid());
        assert_eq!(
            control(&EMAIL, "ok").errors(),
            BTreeSet::from([FieldError::Pattern])
        );
    }

    #[test]
    fn test_reset_clears_value_and_touched() {
        let mut c = control(&NAME, "value");
        c.mark_as_touched();
        c.reset();
        assert_eq!(c.value(), None);
        assert!(!c.touched());
    }
}
