//! Field validation for formbuilder
//!
//! Each field type maps to exactly one rule. A rule checks emptiness first,
//! then format, then range, and reports the first failure only.

use once_cell::sync::Lazy;
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};

use crate::models::FieldType;

/// HTML living-standard email syntax
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Validation failure; `Display` is the message shown next to the field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Required")]
    Required,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Must be a number")]
    NotANumber,

    #[error("Must be greater than 0")]
    NotPositive,

    #[error("Validation failed")]
    Internal,
}

/// Signature shared by every rule and by [`validate`] itself
pub type Validator = fn(FieldType, &str) -> Result<(), ValidationError>;

/// A validation rule bound to one field type
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field_type: FieldType,
    pub check: fn(&str) -> Result<(), ValidationError>,
}

/// Look up the rule for a field type
pub fn rule_for(field_type: FieldType) -> Rule {
    let check = match field_type {
        FieldType::Text => check_text,
        FieldType::Email => check_email,
        FieldType::Number => check_number,
    };
    Rule { field_type, check }
}

/// Validate a raw value under the rule for `field_type`
pub fn validate(field_type: FieldType, value: &str) -> Result<(), ValidationError> {
    (rule_for(field_type).check)(value)
}

/// Run `validator`, turning a panic into [`ValidationError::Internal`]
pub fn validate_guarded(
    validator: Validator,
    field_type: FieldType,
    value: &str,
) -> Result<(), ValidationError> {
    match panic::catch_unwind(AssertUnwindSafe(|| validator(field_type, value))) {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(%field_type, "validator panicked");
            Err(ValidationError::Internal)
        }
    }
}

/// The message to store on a field, `None` when valid
pub fn error_message(result: &Result<(), ValidationError>) -> Option<String> {
    result.as_ref().err().map(|e| e.to_string())
}

fn check_text(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required);
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required);
    }
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn check_number(value: &str) -> Result<(), ValidationError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(ValidationError::Required);
    }

    let number = coerce_number(&compact).ok_or(ValidationError::NotANumber)?;
    if number <= 0.0 {
        return Err(ValidationError::NotPositive);
    }
    Ok(())
}

/// Numeric coercion of a whitespace-free string
///
/// Accepts signed decimals with optional exponent, `Infinity` with an
/// optional sign (case-sensitive), and unsigned `0x`/`0b`/`0o` integers.
/// Rust-only spellings such as `inf` or `NaN` are rejected.
fn coerce_number(s: &str) -> Option<f64> {
    let (sign, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0b" | "0B") => Some(2),
        Some("0o" | "0O") => Some(8),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        });
    }

    let decimal = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !decimal {
        return None;
    }
    // Overflowing literals such as 1e400 become infinite, like Infinity
    s.parse::<f64>().ok()
}
