//! Per-panel report: one row per test code with every guide's verdict and the trend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::history::{AnnotatedPanel, Trend};
use crate::models::{AgeBand, RangeTable, TestCode, UserRecord};
use crate::resolver::{Classification, RangeResolver};

pub(crate) const CSV_HEADER: &str =
    "user_id,panel_id,test_date,age_months,test_code,value,trend,guide,age_range,low,high,status,note\n";

/// Panel report for display or export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelReport {
    /// Export metadata
    pub metadata: PanelMetadata,
    /// One row per recorded test code, in panel entry order
    pub rows: Vec<ReportRow>,
}

/// Panel report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelMetadata {
    pub user_id: String,
    pub patient_name: String,
    pub birth_date: NaiveDate,
    pub panel_id: String,
    pub test_date: NaiveDate,
    /// Age at test time; every verdict in the report uses it
    pub age_in_months: u32,
    /// `false` for the oldest panel of a history
    pub has_previous: bool,
    pub exported_at: String,
}

/// One test code of the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub code: TestCode,
    pub label: String,
    pub unit: Option<String>,
    /// Value as submitted
    pub value: String,
    /// Against the previous panel, when one exists and both values parse
    pub trend: Option<Trend>,
    /// One entry per loaded guide, in guide-name order
    pub guides: Vec<GuideResult>,
}

/// A single guide's verdict for a row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideResult {
    pub guide: String,
    pub classification: Classification,
    pub band: Option<AgeBand>,
}

impl PanelReport {
    /// Build the report for one annotated panel of `user`.
    pub fn build(user: &UserRecord, annotated: &AnnotatedPanel, table: &RangeTable) -> Self {
        let panel = &annotated.panel;
        let resolver = RangeResolver::new(table);

        let rows = panel
            .values
            .iter()
            .map(|(code, raw)| ReportRow {
                code: *code,
                label: code.label().to_string(),
                unit: code.unit().map(str::to_string),
                value: raw.clone(),
                trend: annotated.trend(*code),
                guides: resolver
                    .classify_across_guides(code.as_str(), panel.age_in_months, raw)
                    .into_iter()
                    .map(|gv| GuideResult {
                        guide: gv.guide,
                        classification: gv.verdict.classification,
                        band: gv.verdict.band,
                    })
                    .collect(),
            })
            .collect();

        Self {
            metadata: PanelMetadata {
                user_id: user.id.clone(),
                patient_name: user.full_name(),
                birth_date: user.birth_date,
                panel_id: panel.id.clone(),
                test_date: panel.date,
                age_in_months: panel.age_in_months,
                has_previous: annotated.comparison.is_some(),
                exported_at: chrono::Utc::now().to_rfc3339(),
            },
            rows,
        }
    }

    /// Row for a code, if the panel recorded it.
    pub fn row(&self, code: TestCode) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.code == code)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one line per (test code, guide).
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        self.write_csv_lines(&mut csv);
        csv
    }

    pub(crate) fn write_csv_lines(&self, csv: &mut String) {
        let meta = &self.metadata;
        for row in &self.rows {
            let trend = row.trend.map(|t| t.label()).unwrap_or("");

            if row.guides.is_empty() {
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{},,,,,,\n",
                    escape_csv(&meta.user_id),
                    escape_csv(&meta.panel_id),
                    meta.test_date,
                    meta.age_in_months,
                    row.code,
                    escape_csv(&row.value),
                    trend,
                ));
                continue;
            }

            for result in &row.guides {
                let (age_range, low, high) = match result.band {
                    Some(band) => (band.age_range_label(), band.low.to_string(), band.high.to_string()),
                    None => (String::new(), String::new(), String::new()),
                };
                let note = match result.classification {
                    Classification::Unavailable(reason) => reason.label(),
                    _ => "",
                };

                csv.push_str(&format!(
                    "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                    escape_csv(&meta.user_id),
                    escape_csv(&meta.panel_id),
                    meta.test_date,
                    meta.age_in_months,
                    row.code,
                    escape_csv(&row.value),
                    trend,
                    escape_csv(&result.guide),
                    age_range,
                    low,
                    high,
                    result.classification.label(),
                    note,
                ));
            }
        }
    }
}
