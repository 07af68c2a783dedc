//! Trend between two measurements of the same test code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of the current value relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Higher,
    Lower,
    Equal,
}

impl Trend {
    /// `sign(current - previous)`. `None` if either side is not finite.
    pub fn between(previous: f64, current: f64) -> Option<Trend> {
        if !previous.is_finite() || !current.is_finite() {
            return None;
        }
        if current > previous {
            Some(Trend::Higher)
        } else if current < previous {
            Some(Trend::Lower)
        } else {
            Some(Trend::Equal)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Higher => "higher",
            Trend::Lower => "lower",
            Trend::Equal => "equal",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
