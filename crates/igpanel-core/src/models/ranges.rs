//! Reference range tables: guides, test codes and age bands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ModelError, ModelResult, TestCode};

/// One row of a guide's range table for a test code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgeBand {
    /// Inclusive lower age bound in months
    pub lower_months: u32,
    /// Inclusive upper age bound in months
    pub upper_months: u32,
    /// Lowest normal value
    pub low: f64,
    /// Highest normal value
    pub high: f64,
}

impl AgeBand {
    /// Create a checked band.
    pub fn new(lower_months: u32, upper_months: u32, low: f64, high: f64) -> ModelResult<Self> {
        if lower_months > upper_months {
            return Err(ModelError::InvalidBand(format!(
                "age {}-{} has lower bound above upper bound",
                lower_months, upper_months
            )));
        }
        if !low.is_finite() || !high.is_finite() {
            return Err(ModelError::InvalidBand("thresholds must be finite".into()));
        }
        if low > high {
            return Err(ModelError::InvalidBand(format!(
                "low threshold {} is above high threshold {}",
                low, high
            )));
        }
        Ok(Self {
            lower_months,
            upper_months,
            low,
            high,
        })
    }

    /// Parse a band stored in the `"lower-upper"` age-range form.
    pub fn from_legacy(age_range: &str, low: f64, high: f64) -> ModelResult<Self> {
        let (lower, upper) = age_range
            .split_once('-')
            .ok_or_else(|| ModelError::InvalidAgeRange(age_range.to_string()))?;
        let lower: u32 = lower
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidAgeRange(age_range.to_string()))?;
        let upper: u32 = upper
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidAgeRange(age_range.to_string()))?;
        Self::new(lower, upper, low, high)
    }

    /// Whether `age_in_months` falls inside the band, bounds included.
    pub fn contains(&self, age_in_months: u32) -> bool {
        self.lower_months <= age_in_months && age_in_months <= self.upper_months
    }

    /// The `"lower-upper"` label.
    pub fn age_range_label(&self) -> String {
        format!("{}-{}", self.lower_months, self.upper_months)
    }

    fn overlaps(&self, other: &AgeBand) -> bool {
        self.lower_months <= other.upper_months && other.lower_months <= self.upper_months
    }
}

/// Bands for every test code a guide defines.
pub type GuideRanges = BTreeMap<TestCode, Vec<AgeBand>>;

/// Authoritative reference table: guide name → test code → ordered bands.
///
/// Band order matters: lookups take the first band containing the age.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RangeTable {
    guides: BTreeMap<String, GuideRanges>,
}

/// A structural finding from [`RangeTable::audit`].
#[derive(Debug, Clone, PartialEq)]
pub enum BandIssue {
    /// Two bands in one list share ages; the earlier one shadows the later one there.
    Overlap {
        guide: String,
        code: TestCode,
        first: AgeBand,
        second: AgeBand,
    },
    /// Ages between two consecutive bands that no band covers.
    Gap {
        guide: String,
        code: TestCode,
        from_months: u32,
        to_months: u32,
    },
}

/// Band in the stored guide-document form.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LegacyBand {
    #[serde(rename = "ageRange")]
    age_range: String,
    low: f64,
    high: f64,
}

impl RangeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_guides(guides: BTreeMap<String, GuideRanges>) -> Self {
        Self { guides }
    }

    /// Canonical form of a guide name.
    pub fn normalize_guide_name(name: &str) -> ModelResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyGuideName);
        }
        Ok(trimmed.to_string())
    }

    /// Insert or replace a whole guide. A guide needs at least one band.
    pub fn insert_guide(&mut self, name: &str, ranges: GuideRanges) -> ModelResult<()> {
        let name = Self::normalize_guide_name(name)?;
        Self::check_guide(&name, &ranges)?;
        self.guides.insert(name, ranges);
        Ok(())
    }

    /// Reject a guide whose band lists are all empty; it could not be stored.
    pub fn check_guide(name: &str, ranges: &GuideRanges) -> ModelResult<()> {
        if ranges.values().all(Vec::is_empty) {
            return Err(ModelError::EmptyGuide(name.to_string()));
        }
        Ok(())
    }

    /// Replace the band list for one code in one guide, creating the guide if needed.
    pub fn set_bands(&mut self, guide: &str, code: TestCode, bands: Vec<AgeBand>) -> ModelResult<()> {
        let name = Self::normalize_guide_name(guide)?;
        self.guides.entry(name).or_default().insert(code, bands);
        Ok(())
    }

    /// Remove a guide. Returns whether it existed.
    pub fn remove_guide(&mut self, name: &str) -> bool {
        self.guides.remove(name.trim()).is_some()
    }

    /// Ordered bands for a code in a guide.
    pub fn bands(&self, guide: &str, code: TestCode) -> Option<&[AgeBand]> {
        self.guides
            .get(guide)
            .and_then(|ranges| ranges.get(&code))
            .map(Vec::as_slice)
    }

    /// All codes of one guide.
    pub fn guide(&self, name: &str) -> Option<&GuideRanges> {
        self.guides.get(name)
    }

    /// Whether the guide is loaded.
    pub fn has_guide(&self, name: &str) -> bool {
        self.guides.contains_key(name)
    }

    /// Guide names in sorted order.
    pub fn guide_names(&self) -> impl Iterator<Item = &str> {
        self.guides.keys().map(String::as_str)
    }

    /// Iterate guides in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GuideRanges)> {
        self.guides.iter().map(|(name, ranges)| (name.as_str(), ranges))
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    /// Parse the stored guide-document JSON:
    /// `{ "<guide>": { "<code>": [ { "ageRange": "0-1", "low": 700, "high": 1300 } ] } }`.
    ///
    /// Legacy code spellings are normalized here and nowhere else.
    pub fn from_legacy_json(json: &str) -> Result<Self, RangeImportError> {
        let raw: BTreeMap<String, BTreeMap<String, Vec<LegacyBand>>> = serde_json::from_str(json)?;

        let mut table = RangeTable::new();
        for (guide, codes) in raw {
            let mut ranges = GuideRanges::new();
            for (key, bands) in codes {
                let code = TestCode::from_legacy(&key)?;
                let bands = bands
                    .iter()
                    .map(|b| AgeBand::from_legacy(&b.age_range, b.low, b.high))
                    .collect::<ModelResult<Vec<_>>>()?;
                ranges.insert(code, bands);
            }
            table.insert_guide(&guide, ranges)?;
        }
        Ok(table)
    }

    /// Serialize into the guide-document JSON form.
    pub fn to_legacy_json(&self) -> Result<String, serde_json::Error> {
        let doc: BTreeMap<&str, BTreeMap<&str, Vec<LegacyBand>>> = self
            .guides
            .iter()
            .map(|(guide, ranges)| {
                let codes = ranges
                    .iter()
                    .map(|(code, bands)| {
                        let bands = bands
                            .iter()
                            .map(|b| LegacyBand {
                                age_range: b.age_range_label(),
                                low: b.low,
                                high: b.high,
                            })
                            .collect();
                        (code.as_str(), bands)
                    })
                    .collect();
                (guide.as_str(), codes)
            })
            .collect();
        serde_json::to_string_pretty(&doc)
    }

    /// Report overlapping and non-contiguous bands. Lookup behaviour is unaffected.
    pub fn audit(&self) -> Vec<BandIssue> {
        let mut issues = Vec::new();
        for (guide, ranges) in &self.guides {
            for (code, bands) in ranges {
                for (i, first) in bands.iter().enumerate() {
                    for second in &bands[i + 1..] {
                        if first.overlaps(second) {
                            issues.push(BandIssue::Overlap {
                                guide: guide.clone(),
                                code: *code,
                                first: *first,
                                second: *second,
                            });
                        }
                    }
                }

                for pair in bands.windows(2) {
                    let (prev, next) = (&pair[0], &pair[1]);
                    if next.lower_months > prev.upper_months.saturating_add(1) {
                        issues.push(BandIssue::Gap {
                            guide: guide.clone(),
                            code: *code,
                            from_months: prev.upper_months + 1,
                            to_months: next.lower_months - 1,
                        });
                    }
                }
            }
        }
        issues
    }
}

/// Errors importing a range table document.
#[derive(thiserror::Error, Debug)]
pub enum RangeImportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}
