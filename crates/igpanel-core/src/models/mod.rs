//! Domain models for the igpanel system.

mod builtin;
mod panel;
mod ranges;
mod test_code;
mod user;

pub use builtin::{GUIDE_AP, GUIDE_CILV};
pub use panel::*;
pub use ranges::*;
pub use test_code::*;
pub use user::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::age::AgeError;

/// Validation errors raised at the data-model boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error(
        "Unknown test code '{code}'{}",
        .suggestion.map(|s| format!(" (did you mean '{}'?)", s)).unwrap_or_default()
    )]
    UnknownTestCode {
        code: String,
        suggestion: Option<TestCode>,
    },

    #[error("Missing value for {0}")]
    MissingValue(TestCode),

    #[error("Value '{raw}' for {code} is not a number")]
    InvalidValue { code: TestCode, raw: String },

    #[error("Invalid age range '{0}', expected 'lower-upper' in months")]
    InvalidAgeRange(String),

    #[error("Invalid band: {0}")]
    InvalidBand(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Guide name must not be empty")]
    EmptyGuideName,

    #[error("Guide '{0}' defines no bands")]
    EmptyGuide(String),

    #[error(transparent)]
    Age(#[from] AgeError),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> ModelResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ModelError::InvalidDate(raw.to_string()))
}

/// Parse a stored measurement. Empty, non-numeric and non-finite input yields `None`.
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
