//! Patient/user models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::age::{age_in_months, AgeError};

/// A registered user. Patients and administrators share this record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    /// Opaque identity (UUID)
    pub id: String,
    /// Login email, unique
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Birth date; age is always derived from it
    pub birth_date: NaiveDate,
    /// Whether this user may enter panels for other users
    pub is_admin: bool,
    /// Creation timestamp
    pub created_at: String,
}

impl UserRecord {
    /// Create a new non-admin user.
    pub fn new(email: String, first_name: String, last_name: String, birth_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.trim().to_lowercase(),
            first_name,
            last_name,
            birth_date,
            is_admin: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Age in months on the given date.
    pub fn age_in_months_on(&self, date: NaiveDate) -> Result<u32, AgeError> {
        age_in_months(self.birth_date, date)
    }
}
