//! Input validation for request fields.
//!
//! Runs at the input boundary, before any store interaction.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Price is negative or not a finite number.
    InvalidPrice(f64),
    /// Quota limit must be a positive integer.
    InvalidLimit { field: &'static str, value: i64 },
    /// Value too long.
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Empty value where one is required.
    Empty(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::InvalidPrice(value) => {
                write!(f, "Invalid price: {} (must be a non-negative number)", value)
            }
            ValidationError::InvalidLimit { field, value } => {
                write!(f, "Invalid {}: {} (must be a positive integer)", field, value)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for names and other short text fields.
pub const MAX_NAME_LENGTH: usize = 255;

/// Largest price accepted, in whole currency units.
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Validate an email address (basic RFC 5322 format check).
///
/// Checks for a single `@` with a non-empty local part and a dotted domain;
/// full RFC compliance is not attempted.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email",
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail(
            "must contain an @ symbol".to_string(),
        ));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidEmail(
            "must have the form local@domain".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain has a misplaced dot".to_string(),
        ));
    }

    Ok(())
}

/// Validate a required short text field (name, identifier, key hash, ...).
pub fn validate_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    if value.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LENGTH,
            actual: value.len(),
        });
    }

    Ok(())
}

/// Validate a price and convert it to minor units (cents).
///
/// Prices are carried as ordinary JSON numbers at the API boundary but stored
/// as integer cents, so values are rounded to two decimal places here.
pub fn price_to_cents(price: f64) -> Result<i64, ValidationError> {
    if !price.is_finite() || price < 0.0 || price > MAX_PRICE {
        return Err(ValidationError::InvalidPrice(price));
    }

    Ok((price * 100.0).round() as i64)
}

/// Convert stored minor units back to a display price.
pub fn cents_to_price(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Validate an optional quota limit (must be positive when present).
pub fn validate_limit(field: &'static str, value: Option<i64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v <= 0 => Err(ValidationError::InvalidLimit { field, value: v }),
        _ => Ok(()),
    }
}
