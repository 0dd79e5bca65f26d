//! Error types for the shared calculation layer

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the energy and body metric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("Weight must be a positive number, got {0}")]
    InvalidWeight(f64),

    #[error("Height must be a positive number, got {0}")]
    InvalidHeight(f64),

    #[error("Age must be positive, got {0}")]
    InvalidAge(i32),
}

/// Parse error for the string-backed domain enums
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind}: '{value}'. Must be one of: {expected}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

/// A calendar day whose UTC bounds cannot be represented
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Date {0} is out of range")]
pub struct DateOutOfRange(pub NaiveDate);
