//! Full-history report for one patient.

use serde::{Deserialize, Serialize};

use super::panel::{PanelReport, CSV_HEADER};
use crate::history::annotate_history;
use crate::models::{RangeTable, TestPanel, UserRecord};

/// Every panel of a patient, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryReport {
    pub user_id: String,
    pub patient_name: String,
    pub exported_at: String,
    pub panels: Vec<PanelReport>,
}

impl HistoryReport {
    /// Annotate `panels` and build one report per panel. Input order does not matter.
    pub fn build(user: &UserRecord, panels: &[TestPanel], table: &RangeTable) -> Self {
        let panels = annotate_history(panels)
            .iter()
            .map(|annotated| PanelReport::build(user, annotated, table))
            .collect();

        Self {
            user_id: user.id.clone(),
            patient_name: user.full_name(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            panels,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format under a single header.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        for panel in &self.panels {
            panel.write_csv_lines(&mut csv);
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Trend;
    use crate::models::TestCode;
    use chrono::NaiveDate;

    fn user() -> UserRecord {
        UserRecord::new(
            "lina@example.com".into(),
            "Lina".into(),
            "Koc".into(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        )
    }

    fn panel(user: &UserRecord, id: &str, month: u32, iga: &str) -> TestPanel {
        let date = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
        TestPanel {
            id: id.to_string(),
            user_id: user.id.clone(),
            date,
            age_in_months: user.age_in_months_on(date).unwrap(),
            values: [(TestCode::Iga, iga.to_string())].into_iter().collect(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_history_report() {
        let user = user();
        let panels = vec![
            panel(&user, "a", 1, "30"),
            panel(&user, "c", 6, "30"),
            panel(&user, "b", 3, "45"),
        ];

        let report = HistoryReport::build(&user, &panels, &RangeTable::builtin());
        let ids: Vec<&str> = report.panels.iter().map(|p| p.metadata.panel_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        assert_eq!(report.panels[0].row(TestCode::Iga).unwrap().trend, Some(Trend::Lower));
        assert_eq!(report.panels[1].row(TestCode::Iga).unwrap().trend, Some(Trend::Higher));
        assert_eq!(report.panels[2].row(TestCode::Iga).unwrap().trend, None);
    }

    #[test]
    fn test_history_csv_single_header() {
        let user = user();
        let panels = vec![panel(&user, "a", 1, "30"), panel(&user, "b", 3, "45")];
        let csv = HistoryReport::build(&user, &panels, &RangeTable::builtin()).to_csv();

        // Header + 2 panels x 1 code x 2 guides
        assert_eq!(csv.lines().count(), 5);
        assert_eq!(csv.matches("user_id,panel_id").count(), 1);
    }

    #[test]
    fn test_empty_history() {
        let report = HistoryReport::build(&user(), &[], &RangeTable::builtin());
        assert!(report.panels.is_empty());
        assert_eq!(report.to_csv(), CSV_HEADER);
        assert!(report.to_json().unwrap().contains("\"panels\": []"));
    }
}
