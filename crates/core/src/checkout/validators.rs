//! Field validators for the checkout form.
//!
//! Every validator attached to a control runs; a control's errors are the
//! union of all failures. `MinLength` and `Pattern` pass on empty values, so
//! an empty required field reports only [`FieldError::Required`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,4}$").expect("Invalid regex")
});

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("Invalid regex"));

static SECURITY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("Invalid regex"));

/// A single validation failure on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldError {
    /// Value is missing or empty.
    #[serde(rename = "required")]
    Required,
    /// Value is shorter than the configured minimum.
    #[serde(rename = "minlength")]
    MinLength,
    /// Value is non-empty but contains only whitespace.
    #[serde(rename = "notOnlyWhitespace")]
    NotOnlyWhitespace,
    /// Value does not match the expected shape.
    #[serde(rename = "pattern")]
    Pattern,
}

impl FieldError {
    /// Error key as reported to the client.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength => "minlength",
            Self::NotOnlyWhitespace => "notOnlyWhitespace",
            Self::Pattern => "pattern",
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named value shapes checked by [`Validator::Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Lowercase `local@domain.tld`.
    Email,
    /// Exactly sixteen digits.
    CardNumber,
    /// Exactly three digits.
    SecurityCode,
}

impl Pattern {
    fn regex(self) -> &'static Regex {
        match self {
            Self::Email => &*EMAIL_RE,
            Self::CardNumber => &*CARD_NUMBER_RE,
            Self::SecurityCode => &*SECURITY_CODE_RE,
        }
    }

    /// Returns `true` if the whole value matches.
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        self.regex().is_match(value)
    }
}

/// A rule attached to a form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Required,
    MinLength(usize),
    NotOnlyWhitespace,
    Pattern(Pattern),
}

impl Validator {
    /// Run this rule against a control value.
    #[must_use]
    pub fn check(self, value: Option<&str>) -> Option<FieldError> {
        match self {
            Self::Required => required(value),
            Self::MinLength(min) => min_length(value, min),
            Self::NotOnlyWhitespace => not_only_whitespace(value),
            Self::Pattern(pattern) => matches_pattern(value, pattern),
        }
    }
}

/// Fails when the value is absent or empty.
#[must_use]
pub fn required(value: Option<&str>) -> Option<FieldError> {
    match value {
        Some(v) if !v.is_empty() => None,
        _ => Some(FieldError::Required),
    }
}

/// Fails when a non-empty value has fewer than `min` characters.
#[must_use]
pub fn min_length(value: Option<&str>, min: usize) -> Option<FieldError> {
    match value {
        Some(v) if !v.is_empty() && v.chars().count() < min => Some(FieldError::MinLength),
        _ => None,
    }
}

/// Fails when the value is non-empty and blank after trimming.
///
/// `"   "` fails; `""` and `None` pass here and are left to [`required`].
#[must_use]
pub fn not_only_whitespace(value: Option<&str>) -> Option<FieldError> {
    match value {
        Some(v) if !v.is_empty() && v.trim().is_empty() => Some(FieldError::NotOnlyWhitespace),
        _ => None,
    }
}

/// Fails when a non-empty value does not match the pattern.
#[must_use]
pub fn matches_pattern(value: Option<&str>, pattern: Pattern) -> Option<FieldError> {
    match value {
        Some(v) if !v.is_empty() && !pattern.matches(v) => Some(FieldError::Pattern),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_only_whitespace() {
        assert_eq!(
            not_only_whitespace(Some("   ")),
            Some(FieldError::NotOnlyWhitespace)
        );
        assert_eq!(
            not_only_whitespace(Some("\t\n")),
            Some(FieldError::NotOnlyWhitespace)
        );
        assert_eq!(not_only_whitespace(Some("")), None);
        assert_eq!(not_only_whitespace(None), None);
        assert_eq!(not_only_whitespace(Some("ok")), None);
        assert_eq!(not_only_whitespace(Some("  ok  ")), None);
    }

    #[test]
    fn test_required() {
        assert_eq!(required(None), Some(FieldError::Required));
        assert_eq!(required(Some("")), Some(FieldError::Required));
        assert_eq!(required(Some("   ")), None);
        assert_eq!(required(Some("x")), None);
    }

    #[test]
    fn test_min_length_skips_empty() {
        assert_eq!(min_length(Some(""), 2), None);
        assert_eq!(min_length(None, 2), None);
        assert_eq!(min_length(Some("a"), 2), Some(FieldError::MinLength));
        assert_eq!(min_length(Some("ab"), 2), None);
        // Counted in characters, not bytes.
        assert_eq!(min_length(Some("é"), 2), Some(FieldError::MinLength));
    }

    #[test]
    fn test_email_pattern() {
        assert!(Pattern::Email.matches("john.doe@example.com"));
        assert!(Pattern::Email.matches("a+b@mail.co.uk"));
        assert!(!Pattern::Email.matches("john.doe@example"));
        assert!(!Pattern::Email.matches("John@Example.com"));
        assert!(!Pattern::Email.matches("john@example.company"));
        assert_eq!(
            matches_pattern(Some("nope"), Pattern::Email),
            Some(FieldError::Pattern)
        );
        assert_eq!(matches_pattern(Some(""), Pattern::Email), None);
    }

    #[test]
    fn test_card_patterns() {
        assert!(Pattern::CardNumber.matches("4111111111111111"));
        assert!(!Pattern::CardNumber.matches("4111 1111 1111 1111"));
        assert!(!Pattern::CardNumber.matches("41111111111111112"));
        assert!(Pattern::SecurityCode.matches("123"));
        assert!(!Pattern::SecurityCode.matches("12a"));
    }

    #[test]
    fn test_error_keys() {
        assert_eq!(FieldError::MinLength.to_string(), "minlength");
        assert_eq!(
            serde_json::to_string(&FieldError::NotOnlyWhitespace).ok(),
            Some("\"notOnlyWhitespace\"".to_string())
        );
    }
}
