//! Longitudinal comparator over a patient's panel history.
//!
//! History is presented most recent first. Each panel is compared with the panel
//! right after it in that order, i.e. the chronologically previous one, and never
//! with anything older. The oldest panel has nothing to compare against.

mod trend;

pub use trend::*;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{TestCode, TestPanel};

/// Per-code trends of one panel against its predecessor.
pub type Comparison = BTreeMap<TestCode, Trend>;

/// A panel with its trend annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPanel {
    pub panel: TestPanel,
    /// `None` when there is no previous panel
    pub comparison: Option<Comparison>,
}

impl AnnotatedPanel {
    /// Trend for one code, if it could be computed.
    pub fn trend(&self, code: TestCode) -> Option<Trend> {
        self.comparison.as_ref().and_then(|c| c.get(&code).copied())
    }
}

/// Most recent first: date descending, then id descending for same-day panels.
pub fn most_recent_first(a: &TestPanel, b: &TestPanel) -> Ordering {
    b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id))
}

/// Sort panels in place, most recent first.
pub fn sort_most_recent_first(panels: &mut [TestPanel]) {
    panels.sort_by(most_recent_first);
}

/// Trends of `current` relative to `previous` for every code both panels carry.
///
/// Codes missing from `previous`, or unparseable on either side, are left out.
pub fn compare_panels(current: &TestPanel, previous: &TestPanel) -> Comparison {
    current
        .values
        .keys()
        .filter(|code| previous.values.contains_key(code))
        .filter_map(|code| {
            let trend = match (previous.value(*code), current.value(*code)) {
                (Some(before), Some(now)) => Trend::between(before, now),
                _ => None,
            };
            if trend.is_none() {
                warn!(
                    code = %code,
                    panel_id = %current.id,
                    previous_id = %previous.id,
                    "Skipped comparison, value does not parse"
                );
            }
            trend.map(|trend| (*code, trend))
        })
        .collect()
}

/// Annotate a history. The input order does not matter and is not modified.
pub fn annotate_history(panels: &[TestPanel]) -> Vec<AnnotatedPanel> {
    let mut sorted = panels.to_vec();
    sort_most_recent_first(&mut sorted);

    let comparisons: Vec<Option<Comparison>> = (0..sorted.len())
        .map(|i| sorted.get(i + 1).map(|previous| compare_panels(&sorted[i], previous)))
        .collect();

    sorted
        .into_iter()
        .zip(comparisons)
        .map(|(panel, comparison)| AnnotatedPanel { panel, comparison })
        .collect()
}
