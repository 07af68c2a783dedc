//! Classification of a measured value against a band.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::AgeBand;

/// Why no classification could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailableReason {
    /// The guide is not loaded
    UnknownGuide,
    /// The test code is not in the vocabulary
    UnknownTestCode,
    /// The guide has no band for this code at this age
    NoRangeDefined,
    /// The value is missing, non-numeric or non-finite
    InvalidValue,
}

impl UnavailableReason {
    pub fn label(&self) -> &'static str {
        match self {
            UnavailableReason::UnknownGuide => "unknown guide",
            UnavailableReason::UnknownTestCode => "unknown test code",
            UnavailableReason::NoRangeDefined => "no range defined",
            UnavailableReason::InvalidValue => "invalid value",
        }
    }
}

/// Verdict for one measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Low,
    Normal,
    High,
    /// Must be shown as such, never as Normal
    Unavailable(UnavailableReason),
}

impl Classification {
    /// Whether a status was actually computed.
    pub fn is_available(&self) -> bool {
        !matches!(self, Classification::Unavailable(_))
    }

    /// Short label for display and export.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Low => "Low",
            Classification::Normal => "Normal",
            Classification::High => "High",
            Classification::Unavailable(_) => "Unavailable",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `value` against `band`. Both thresholds count as Normal.
pub fn classify_against(value: f64, band: &AgeBand) -> Classification {
    if !value.is_finite() {
        return Classification::Unavailable(UnavailableReason::InvalidValue);
    }
    if value < band.low {
        Classification::Low
    } else if value > band.high {
        Classification::High
    } else {
        Classification::Normal
    }
}
