//! User database operations.

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{constraint_error, Database, DbError, DbResult};
use crate::models::{parse_date, UserRecord};

const USER_COLUMNS: &str = "id, email, first_name, last_name, birth_date, is_admin, created_at";

impl Database {
    /// Insert a new user. Emails are unique.
    pub fn insert_user(&self, user: &UserRecord) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO users (id, email, first_name, last_name, birth_date, is_admin, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    user.id,
                    user.email,
                    user.first_name,
                    user.last_name,
                    user.birth_date.format("%Y-%m-%d").to_string(),
                    user.is_admin,
                    user.created_at,
                ],
            )
            .map_err(|e| constraint_error(e, &format!("user {}", user.email)))?;
        info!(user_id = %user.id, "Registered user");
        Ok(())
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> DbResult<Option<UserRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                [id],
                UserRow::from_row,
            )
            .optional()?;

        row.map(|r| r.try_into()).transpose()
    }

    /// Get a user by email (case-insensitive).
    pub fn get_user_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                [email.trim().to_lowercase()],
                UserRow::from_row,
            )
            .optional()?;

        row.map(|r| r.try_into()).transpose()
    }

    /// Fetch a user or fail with [`DbError::NotFound`].
    pub fn require_user(&self, id: &str) -> DbResult<UserRecord> {
        self.get_user(id)?
            .ok_or_else(|| DbError::NotFound(format!("user {}", id)))
    }

    /// List all users ordered by last then first name.
    pub fn list_users(&self) -> DbResult<Vec<UserRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY last_name, first_name, email",
            USER_COLUMNS
        ))?;

        let rows = stmt.query_map([], UserRow::from_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?.try_into()?);
        }
        Ok(users)
    }

    /// Set the admin flag.
    pub fn set_admin(&self, id: &str, is_admin: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE users SET is_admin = ?2 WHERE id = ?1",
            params![id, is_admin],
        )?;
        if rows_affected > 0 {
            info!(user_id = %id, is_admin, "Changed admin role");
        }
        Ok(rows_affected > 0)
    }

    /// Flip the admin flag and return the new value.
    pub fn toggle_admin(&self, id: &str) -> DbResult<bool> {
        let user = self.require_user(id)?;
        let is_admin = !user.is_admin;
        self.set_admin(id, is_admin)?;
        Ok(is_admin)
    }

    /// Delete a user and, through the foreign key, their panels.
    pub fn delete_user(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM users WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Raw database row for a user.
struct UserRow {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    birth_date: String,
    is_admin: bool,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            birth_date: row.get(4)?,
            is_admin: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl TryFrom<UserRow> for UserRecord {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            birth_date: parse_date(&row.birth_date)?,
            is_admin: row.is_admin,
            created_at: row.created_at,
        })
    }
}
