//! Blood-test panel models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{parse_value, ModelError, ModelResult, TestCode};

/// One blood-test submission for one patient. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestPanel {
    /// Unique panel ID
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Date the blood was drawn
    pub date: NaiveDate,
    /// Patient age in months on `date`
    pub age_in_months: u32,
    /// Measured values, kept in their submitted string form
    pub values: BTreeMap<TestCode, String>,
    /// Creation timestamp
    pub created_at: String,
}

impl TestPanel {
    /// Create a validated panel. Every supplied value must parse as a finite number.
    pub fn new(
        user_id: String,
        date: NaiveDate,
        age_in_months: u32,
        values: BTreeMap<TestCode, String>,
    ) -> ModelResult<Self> {
        let values = validate_values(values)?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            date,
            age_in_months,
            values,
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Parsed value for a code. `None` when absent or unparseable.
    pub fn value(&self, code: TestCode) -> Option<f64> {
        self.values.get(&code).and_then(|raw| parse_value(raw))
    }

    /// Codes from the vocabulary that this panel has no value for.
    pub fn missing_codes(&self) -> Vec<TestCode> {
        TestCode::ALL
            .iter()
            .filter(|code| !self.values.contains_key(code))
            .copied()
            .collect()
    }

    /// Whether every code in the vocabulary has a value.
    pub fn is_complete(&self) -> bool {
        self.missing_codes().is_empty()
    }
}

/// Trim and check every value. Empty input is missing, anything else must be numeric.
pub fn validate_values(values: BTreeMap<TestCode, String>) -> ModelResult<BTreeMap<TestCode, String>> {
    values
        .into_iter()
        .map(|(code, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ModelError::MissingValue(code));
            }
            if parse_value(trimmed).is_none() {
                return Err(ModelError::InvalidValue { code, raw });
            }
            Ok((code, trimmed.to_string()))
        })
        .collect()
}

/// Build a value map from raw string keys, as submitted by a form.
///
/// Keys must use the canonical spelling. With `require_complete`, every code in
/// the vocabulary must be present.
pub fn values_from_raw<'a, I>(entries: I, require_complete: bool) -> ModelResult<BTreeMap<TestCode, String>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut values = BTreeMap::new();
    for (key, raw) in entries {
        let code: TestCode = key.parse()?;
        values.insert(code, raw.to_string());
    }

    if require_complete {
        if let Some(missing) = TestCode::ALL.iter().find(|code| !values.contains_key(code)) {
            return Err(ModelError::MissingValue(*missing));
        }
    }

    validate_values(values)
}
