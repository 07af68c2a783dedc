//! Range resolver: age band lookup and status classification.
//!
//! Pipeline: (guide, test code) → ordered bands → first band containing the age →
//! Low / Normal / High against that band.
//!
//! The resolver works on one guide per call and never fails. Every data problem
//! comes back as [`Classification::Unavailable`] with a reason.

mod band_lookup;
mod classification;

pub use band_lookup::*;
pub use classification::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{parse_value, AgeBand, RangeTable, TestCode, TestPanel};

/// Classification together with the band it was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub classification: Classification,
    /// `None` when no band applied
    pub band: Option<AgeBand>,
}

impl Verdict {
    fn unavailable(reason: UnavailableReason) -> Self {
        Self {
            classification: Classification::Unavailable(reason),
            band: None,
        }
    }
}

/// Verdict for one guide, as produced when a caller walks every loaded guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideVerdict {
    pub guide: String,
    pub verdict: Verdict,
}

/// Stateless resolver over an injected range table.
pub struct RangeResolver<'a> {
    table: &'a RangeTable,
}

impl<'a> RangeResolver<'a> {
    /// Create a resolver over `table`.
    pub fn new(table: &'a RangeTable) -> Self {
        Self { table }
    }

    /// The table this resolver reads.
    pub fn table(&self) -> &'a RangeTable {
        self.table
    }

    /// Find the applicable band for a code at an age in one guide.
    pub fn lookup(&self, guide: &str, code: TestCode, age_in_months: u32) -> Result<&'a AgeBand, UnavailableReason> {
        let ranges = self
            .table
            .guide(guide)
            .ok_or(UnavailableReason::UnknownGuide)?;
        let bands = ranges.get(&code).ok_or(UnavailableReason::NoRangeDefined)?;
        select_band(bands, age_in_months).ok_or(UnavailableReason::NoRangeDefined)
    }

    /// Classify a numeric value and report the band used.
    pub fn resolve(&self, guide: &str, code: TestCode, age_in_months: u32, value: f64) -> Verdict {
        match self.lookup(guide, code, age_in_months) {
            Ok(band) => Verdict {
                classification: classify_against(value, band),
                band: Some(*band),
            },
            Err(reason) => Verdict::unavailable(reason),
        }
    }

    /// Classify a value for a test code given by its canonical name.
    ///
    /// Unknown codes are `Unavailable`, not an error.
    pub fn classify(&self, guide: &str, test_code: &str, age_in_months: u32, value: f64) -> Classification {
        match test_code.parse::<TestCode>() {
            Ok(code) => self.resolve(guide, code, age_in_months, value).classification,
            Err(_) => Classification::Unavailable(UnavailableReason::UnknownTestCode),
        }
    }

    /// Classify a value still in its stored string form.
    pub fn classify_raw(&self, guide: &str, test_code: &str, age_in_months: u32, raw: &str) -> Classification {
        self.resolve_raw(guide, test_code, age_in_months, raw).classification
    }

    /// Like [`RangeResolver::classify_raw`], keeping the band.
    pub fn resolve_raw(&self, guide: &str, test_code: &str, age_in_months: u32, raw: &str) -> Verdict {
        let code = match test_code.parse::<TestCode>() {
            Ok(code) => code,
            Err(_) => return Verdict::unavailable(UnavailableReason::UnknownTestCode),
        };
        match self.lookup(guide, code, age_in_months) {
            Ok(band) => Verdict {
                classification: parse_value(raw)
                    .map(|value| classify_against(value, band))
                    .unwrap_or(Classification::Unavailable(UnavailableReason::InvalidValue)),
                band: Some(*band),
            },
            Err(reason) => Verdict::unavailable(reason),
        }
    }

    /// Classify every value of a panel against one guide, using the age at test time.
    pub fn classify_panel(&self, guide: &str, panel: &TestPanel) -> BTreeMap<TestCode, Verdict> {
        panel
            .values
            .iter()
            .map(|(code, raw)| {
                let verdict = self.resolve_raw(guide, code.as_str(), panel.age_in_months, raw);
                (*code, verdict)
            })
            .collect()
    }

    /// One verdict per loaded guide, in guide-name order.
    pub fn classify_across_guides(&self, test_code: &str, age_in_months: u32, raw: &str) -> Vec<GuideVerdict> {
        self.table
            .guide_names()
            .map(|guide| GuideVerdict {
                guide: guide.to_string(),
                verdict: self.resolve_raw(guide, test_code, age_in_months, raw),
            })
            .collect()
    }
}
