//! Blood-test panel database operations.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

use super::{constraint_error, Database, DbError, DbResult};
use crate::models::{parse_date, validate_values, ModelError, TestCode, TestPanel};

const PANEL_COLUMNS: &str = "id, user_id, test_date, age_months, test_values, created_at";

impl Database {
    /// Insert a panel. Values are re-checked and the age is recomputed from the
    /// owner's birth date; the stored panel is returned.
    pub fn insert_panel(&self, panel: &TestPanel) -> DbResult<TestPanel> {
        let checked = self.checked_panel(panel)?;
        self.write_panel(&checked)?;
        Ok(checked)
    }

    /// Validated copy of `panel` with its age derived from the stored birth date.
    fn checked_panel(&self, panel: &TestPanel) -> DbResult<TestPanel> {
        let user = self.require_user(&panel.user_id)?;
        let age_in_months = user.age_in_months_on(panel.date).map_err(ModelError::from)?;
        let values = validate_values(panel.values.clone())?;

        Ok(TestPanel {
            age_in_months,
            values,
            ..panel.clone()
        })
    }

    fn write_panel(&self, panel: &TestPanel) -> DbResult<()> {
        let values_json = values_to_json(&panel.values)?;

        self.conn
            .execute(
                r#"
                INSERT INTO blood_tests (id, user_id, test_date, age_months, test_values, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    panel.id,
                    panel.user_id,
                    panel.date.format("%Y-%m-%d").to_string(),
                    panel.age_in_months,
                    values_json,
                    panel.created_at,
                ],
            )
            .map_err(|e| constraint_error(e, &format!("panel {}", panel.id)))?;

        debug!(panel_id = %panel.id, codes = panel.values.len(), "Inserted panel");
        Ok(())
    }

    /// Record a new panel for a user. The age is derived from the stored birth date.
    pub fn record_blood_test(
        &self,
        user_id: &str,
        date: NaiveDate,
        values: BTreeMap<TestCode, String>,
    ) -> DbResult<TestPanel> {
        let user = self.require_user(user_id)?;
        let age = user.age_in_months_on(date).map_err(ModelError::from)?;

        let panel = TestPanel::new(user.id, date, age, values)?;
        self.write_panel(&panel)?;

        info!(panel_id = %panel.id, user_id = %panel.user_id, age_months = age, "Recorded blood test");
        Ok(panel)
    }

    /// Get a panel by ID.
    pub fn get_panel(&self, id: &str) -> DbResult<Option<TestPanel>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM blood_tests WHERE id = ?", PANEL_COLUMNS),
                [id],
                PanelRow::from_row,
            )
            .optional()?;

        row.map(|r| r.try_into()).transpose()
    }

    /// All panels of a user, most recent first.
    pub fn list_panels_for_user(&self, user_id: &str) -> DbResult<Vec<TestPanel>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM blood_tests WHERE user_id = ? ORDER BY test_date DESC, id DESC",
            PANEL_COLUMNS
        ))?;

        let rows = stmt.query_map([user_id], PanelRow::from_row)?;

        let mut panels = Vec::new();
        for row in rows {
            panels.push(row?.try_into()?);
        }
        Ok(panels)
    }

    /// Replace a stored panel wholesale. Panels are never edited field by field.
    ///
    /// The replacement goes through the same checks as a new panel and must keep
    /// its owner. Returns `false` when no panel has this ID.
    pub fn replace_panel(&self, panel: &TestPanel) -> DbResult<bool> {
        let existing = match self.get_panel(&panel.id)? {
            Some(existing) => existing,
            None => return Ok(false),
        };
        if existing.user_id != panel.user_id {
            return Err(DbError::Constraint(format!(
                "panel {} belongs to user {}",
                panel.id, existing.user_id
            )));
        }
        let checked = self.checked_panel(panel)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM blood_tests WHERE id = ?", [&checked.id])?;
        self.write_panel(&checked)?;
        tx.commit()?;

        info!(panel_id = %checked.id, age_months = checked.age_in_months, "Replaced panel");
        Ok(true)
    }

    /// Delete a panel.
    pub fn delete_panel(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM blood_tests WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Values are stored under their canonical string keys.
fn values_to_json(values: &BTreeMap<TestCode, String>) -> DbResult<String> {
    let keyed: BTreeMap<&str, &str> = values
        .iter()
        .map(|(code, raw)| (code.as_str(), raw.as_str()))
        .collect();
    Ok(serde_json::to_string(&keyed)?)
}

fn values_from_json(json: &str) -> DbResult<BTreeMap<TestCode, String>> {
    let keyed: BTreeMap<String, String> = serde_json::from_str(json)?;
    keyed
        .into_iter()
        .map(|(key, raw)| -> DbResult<(TestCode, String)> { Ok((key.parse()?, raw)) })
        .collect()
}

/// Raw database row for a panel.
struct PanelRow {
    id: String,
    user_id: String,
    test_date: String,
    age_months: u32,
    test_values: String,
    created_at: String,
}

impl PanelRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            test_date: row.get(2)?,
            age_months: row.get(3)?,
            test_values: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<PanelRow> for TestPanel {
    type Error = DbError;

    fn try_from(row: PanelRow) -> Result<Self, Self::Error> {
        Ok(TestPanel {
            id: row.id,
            user_id: row.user_id,
            date: parse_date(&row.test_date)?,
            age_in_months: row.age_months,
            values: values_from_json(&row.test_values)?,
            created_at: row.created_at,
        })
    }
}
