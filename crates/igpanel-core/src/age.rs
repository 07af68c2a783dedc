//! Patient age in whole elapsed calendar months.
//!
//! Every place that needs an age (age-at-test when a panel is written, age-for-lookup
//! when a value is classified) goes through [`age_in_months`].

use chrono::{Datelike, NaiveDate, Utc};
use thiserror::Error;

/// Age computation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgeError {
    #[error("Date {on} is before birth date {birth}")]
    BeforeBirth { birth: NaiveDate, on: NaiveDate },

    #[error("Age of {0} months is out of range")]
    OutOfRange(i64),
}

/// Whole calendar months elapsed between `birth` and `on`.
///
/// `(on.year - birth.year) * 12 + (on.month - birth.month)`, minus one when the
/// day of month of `on` has not yet reached the birth day.
pub fn age_in_months(birth: NaiveDate, on: NaiveDate) -> Result<u32, AgeError> {
    if on < birth {
        return Err(AgeError::BeforeBirth { birth, on });
    }

    let years = i64::from(on.year()) - i64::from(birth.year());
    let months = i64::from(on.month()) - i64::from(birth.month());
    let mut total = years * 12 + months;
    if on.day() < birth.day() {
        total -= 1;
    }

    u32::try_from(total).map_err(|_| AgeError::OutOfRange(total))
}

/// Age in months as of today (UTC calendar date).
pub fn age_in_months_today(birth: NaiveDate) -> Result<u32, AgeError> {
    age_in_months(birth, Utc::now().date_naive())
}
