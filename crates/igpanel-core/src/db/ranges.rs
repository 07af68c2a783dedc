//! Reference range persistence.

use rusqlite::params;
use tracing::{debug, info};

use super::{Database, DbResult};
use crate::models::{AgeBand, GuideRanges, ModelResult, RangeTable, TestCode};

impl Database {
    /// Store a guide, replacing any previous definition under the same name.
    pub fn save_guide(&self, name: &str, ranges: &GuideRanges) -> DbResult<()> {
        let name = RangeTable::normalize_guide_name(name)?;
        RangeTable::check_guide(&name, ranges)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM range_bands WHERE guide = ?", [&name])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO range_bands (guide, test_code, position, lower_months, upper_months, low, high)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for (code, bands) in ranges {
                for (position, band) in bands.iter().enumerate() {
                    stmt.execute(params![
                        name,
                        code.as_str(),
                        position as i64,
                        band.lower_months,
                        band.upper_months,
                        band.low,
                        band.high,
                    ])?;
                }
            }
        }
        tx.commit()?;

        info!(guide = %name, codes = ranges.len(), "Saved guide");
        Ok(())
    }

    /// Store every guide of a table.
    pub fn save_range_table(&self, table: &RangeTable) -> DbResult<()> {
        for (name, ranges) in table.iter() {
            self.save_guide(name, ranges)?;
        }
        Ok(())
    }

    /// Load all stored guides with bands in their saved order.
    pub fn load_range_table(&self) -> DbResult<RangeTable> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT guide, test_code, lower_months, upper_months, low, high
            FROM range_bands
            ORDER BY guide, test_code, position
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, f64>(5)?,
            ))
        })?;

        let mut table = RangeTable::new();
        for row in rows {
            let (guide, code, lower, upper, low, high) = row?;
            let code: TestCode = code.parse()?;
            let band = AgeBand::new(lower, upper, low, high)?;
            push_band(&mut table, &guide, code, band)?;
        }

        debug!(guides = table.len(), "Loaded range table");
        Ok(table)
    }

    /// Names of stored guides, sorted.
    pub fn list_guides(&self) -> DbResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT guide FROM range_bands ORDER BY guide")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Delete a guide. Returns whether it existed.
    pub fn delete_guide(&self, name: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM range_bands WHERE guide = ?", [name.trim()])?;
        if rows_affected > 0 {
            info!(guide = %name.trim(), "Deleted guide");
        }
        Ok(rows_affected > 0)
    }

    /// Write the built-in guides when no guide is stored yet.
    ///
    /// Returns whether anything was written. Existing data is never overwritten.
    pub fn seed_builtin_guides(&self) -> DbResult<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM range_bands", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }

        self.save_range_table(&RangeTable::builtin())?;
        info!("Seeded built-in guides");
        Ok(true)
    }
}

fn push_band(table: &mut RangeTable, guide: &str, code: TestCode, band: AgeBand) -> ModelResult<()> {
    let mut bands = table
        .bands(guide, code)
        .map(<[AgeBand]>::to_vec)
        .unwrap_or_default();
    bands.push(band);
    table.set_bands(guide, code, bands)
}
