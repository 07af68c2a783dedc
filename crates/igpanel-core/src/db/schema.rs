//! SQLite schema definition.

/// Complete database schema for igpanel.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    birth_date TEXT NOT NULL,                    -- YYYY-MM-DD
    is_admin INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Blood Tests (one row per panel, replaced wholesale)
-- ============================================================================

CREATE TABLE IF NOT EXISTS blood_tests (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    test_date TEXT NOT NULL,                     -- YYYY-MM-DD
    age_months INTEGER NOT NULL CHECK (age_months >= 0),
    test_values TEXT NOT NULL DEFAULT '{}',      -- JSON object {code: value}
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_blood_tests_user_date ON blood_tests(user_id, test_date);

-- ============================================================================
-- Reference Ranges (position keeps band order within a guide/code list)
-- ============================================================================

CREATE TABLE IF NOT EXISTS range_bands (
    guide TEXT NOT NULL,
    test_code TEXT NOT NULL,
    position INTEGER NOT NULL,
    lower_months INTEGER NOT NULL CHECK (lower_months >= 0),
    upper_months INTEGER NOT NULL CHECK (upper_months >= lower_months),
    low REAL NOT NULL,
    high REAL NOT NULL CHECK (high >= low),
    PRIMARY KEY (guide, test_code, position)
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_blood_test_requires_user() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO blood_tests (id, user_id, test_date, age_months) VALUES ('p1', 'nobody', '2024-01-01', 3)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_band_constraints() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        // Upper below lower should fail
        let result = conn.execute(
            "INSERT INTO range_bands VALUES ('G', 'igg', 0, 7, 4, 1.0, 2.0)",
            [],
        );
        assert!(result.is_err());

        // Low above high should fail
        let result = conn.execute(
            "INSERT INTO range_bands VALUES ('G', 'igg', 0, 4, 7, 3.0, 2.0)",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO range_bands VALUES ('G', 'igg', 0, 4, 7, 200.0, 1200.0)",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_deleting_user_cascades() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO users (id, email, birth_date) VALUES ('u1', 'a@b.c', '2023-01-01')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO blood_tests (id, user_id, test_date, age_months) VALUES ('p1', 'u1', '2024-01-01', 12)",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM users WHERE id = 'u1'", []).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM blood_tests", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
