//! igpanel Core Library
//!
//! Local-first pediatric immunoglobulin panel evaluation: age-banded reference
//! ranges and visit-to-visit trends.
//!
//! # Architecture
//!
//! ```text
//!   UserRecord (birth date)          TestPanel (date, values)
//!            │                                │
//!            └──────────► age_in_months ◄─────┘
//!                              │
//!        ┌─────────────────────┴─────────────────────┐
//!        │                                           │
//!        ▼                                           ▼
//!  RangeResolver                          Longitudinal Comparator
//!  guide → code → bands                   most recent first,
//!  first band containing age              each panel vs the one before
//!  Low / Normal / High / Unavailable      Higher / Lower / Equal
//!        │                                           │
//!        └─────────────────────┬─────────────────────┘
//!                              ▼
//!                   PanelReport / HistoryReport
//!                        (JSON, CSV)
//! ```
//!
//! # Core Principle
//!
//! **A value is never shown as Normal unless a band was found and the value parsed.**
//! Every missing piece of data comes back as `Unavailable`.
//!
//! # Modules
//!
//! - [`age`]: Whole-month age calculation
//! - [`config`]: Environment-driven configuration
//! - [`db`]: SQLite store for users, panels and range tables
//! - [`models`]: Domain types (TestCode, TestPanel, RangeTable, etc.)
//! - [`resolver`]: Band lookup and classification
//! - [`history`]: Trend annotation across panels
//! - [`export`]: Panel and history reports

pub mod age;
pub mod config;
pub mod db;
pub mod export;
pub mod history;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use age::{age_in_months, AgeError};
pub use config::{ConfigError, CoreConfig};
pub use db::Database;
pub use export::{HistoryReport, PanelReport};
pub use history::{annotate_history, AnnotatedPanel, Comparison, Trend};
pub use models::{AgeBand, RangeTable, TestCode, TestPanel, UserRecord};
pub use resolver::{Classification, RangeResolver, UnavailableReason, Verdict};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum IgPanelError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for IgPanelError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => IgPanelError::NotFound(what),
            db::DbError::Model(err) => err.into(),
            db::DbError::Constraint(msg) => IgPanelError::InvalidInput(msg),
            db::DbError::Json(err) => err.into(),
            other => IgPanelError::DatabaseError(other.to_string()),
        }
    }
}

impl From<models::ModelError> for IgPanelError {
    fn from(e: models::ModelError) -> Self {
        IgPanelError::InvalidInput(e.to_string())
    }
}

impl From<models::RangeImportError> for IgPanelError {
    fn from(e: models::RangeImportError) -> Self {
        match e {
            models::RangeImportError::Json(err) => err.into(),
            models::RangeImportError::Model(err) => err.into(),
        }
    }
}

impl From<AgeError> for IgPanelError {
    fn from(e: AgeError) -> Self {
        IgPanelError::InvalidInput(e.to_string())
    }
}

impl From<ConfigError> for IgPanelError {
    fn from(e: ConfigError) -> Self {
        IgPanelError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for IgPanelError {
    fn from(e: serde_json::Error) -> Self {
        IgPanelError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for IgPanelError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        IgPanelError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path, seeding the built-in guides.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<IgPanelCore>, IgPanelError> {
    let config = CoreConfig {
        database_path: Some(path),
        ..CoreConfig::default()
    };
    IgPanelCore::open(config)
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<IgPanelCore>, IgPanelError> {
    IgPanelCore::open(CoreConfig::default())
}

/// Open using `IGPANEL_*` environment variables.
#[uniffi::export]
pub fn open_database_from_env() -> Result<Arc<IgPanelCore>, IgPanelError> {
    IgPanelCore::open(CoreConfig::from_env()?)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct IgPanelCore {
    db: Arc<Mutex<Database>>,
    config: CoreConfig,
}

impl IgPanelCore {
    /// Open the store described by `config`.
    pub fn open(config: CoreConfig) -> Result<Arc<Self>, IgPanelError> {
        let db = match config.database_path {
            Some(ref path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };
        if config.seed_builtin_guides {
            db.seed_builtin_guides()?;
        }
        info!(default_guide = %config.default_guide, "igpanel core ready");

        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
        }))
    }

    fn resolve_guide(&self, guide: Option<String>) -> String {
        guide
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| self.config.default_guide.clone())
    }
}

#[uniffi::export]
impl IgPanelCore {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Register a new user. `birth_date` is `YYYY-MM-DD`.
    pub fn register_user(
        &self,
        email: String,
        first_name: String,
        last_name: String,
        birth_date: String,
    ) -> Result<FfiUser, IgPanelError> {
        let birth_date = models::parse_date(&birth_date)?;
        if email.trim().is_empty() {
            return Err(IgPanelError::InvalidInput("email must not be empty".into()));
        }

        let db = self.db.lock()?;
        let user = UserRecord::new(email, first_name, last_name, birth_date);
        db.insert_user(&user)?;
        Ok(user.into())
    }

    /// Get a user by ID.
    pub fn get_user(&self, user_id: String) -> Result<Option<FfiUser>, IgPanelError> {
        let db = self.db.lock()?;
        Ok(db.get_user(&user_id)?.map(|u| u.into()))
    }

    /// Get a user by email.
    pub fn get_user_by_email(&self, email: String) -> Result<Option<FfiUser>, IgPanelError> {
        let db = self.db.lock()?;
        Ok(db.get_user_by_email(&email)?.map(|u| u.into()))
    }

    /// List all users.
    pub fn list_users(&self) -> Result<Vec<FfiUser>, IgPanelError> {
        let db = self.db.lock()?;
        let users = db.list_users()?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    /// Flip a user's admin role. Returns the new value.
    pub fn toggle_admin(&self, user_id: String) -> Result<bool, IgPanelError> {
        let db = self.db.lock()?;
        Ok(db.toggle_admin(&user_id)?)
    }

    /// Delete a user together with their blood tests.
    pub fn delete_user(&self, user_id: String) -> Result<bool, IgPanelError> {
        let db = self.db.lock()?;
        Ok(db.delete_user(&user_id)?)
    }

    // =========================================================================
    // Blood Test Operations
    // =========================================================================

    /// Record a complete panel. Every test code needs a numeric value.
    pub fn add_blood_test(
        &self,
        user_id: String,
        date: String,
        values: HashMap<String, String>,
    ) -> Result<FfiPanel, IgPanelError> {
        let date = models::parse_date(&date)?;
        let values = models::values_from_raw(values.iter().map(|(k, v)| (k.as_str(), v.as_str())), true)?;

        let db = self.db.lock()?;
        let panel = db.record_blood_test(&user_id, date, values)?;
        Ok(panel.into())
    }

    /// A user's panels, most recent first.
    pub fn list_blood_tests(&self, user_id: String) -> Result<Vec<FfiPanel>, IgPanelError> {
        let db = self.db.lock()?;
        let panels = db.list_panels_for_user(&user_id)?;
        Ok(panels.into_iter().map(|p| p.into()).collect())
    }

    /// Delete a panel.
    pub fn delete_blood_test(&self, panel_id: String) -> Result<bool, IgPanelError> {
        let db = self.db.lock()?;
        Ok(db.delete_panel(&panel_id)?)
    }

    // =========================================================================
    // Guide Operations
    // =========================================================================

    /// Names of stored guides.
    pub fn list_guides(&self) -> Result<Vec<String>, IgPanelError> {
        let db = self.db.lock()?;
        Ok(db.list_guides()?)
    }

    /// Import guides from the guide-document JSON. Returns how many guides were saved.
    pub fn import_guides_json(&self, json: String) -> Result<u32, IgPanelError> {
        let table = RangeTable::from_legacy_json(&json)?;
        let db = self.db.lock()?;
        db.save_range_table(&table)?;
        Ok(table.len() as u32)
    }

    /// Export all stored guides as guide-document JSON.
    pub fn export_guides_json(&self) -> Result<String, IgPanelError> {
        let db = self.db.lock()?;
        Ok(db.load_range_table()?.to_legacy_json()?)
    }

    /// Guide used when none is given.
    pub fn default_guide(&self) -> String {
        self.config.default_guide.clone()
    }

    // =========================================================================
    // Classification Operations
    // =========================================================================

    /// Classify one value. `guide` falls back to the configured default.
    pub fn classify_value(
        &self,
        guide: Option<String>,
        test_code: String,
        age_in_months: i64,
        value: String,
    ) -> Result<FfiClassification, IgPanelError> {
        let age = checked_age(age_in_months)?;
        let guide = self.resolve_guide(guide);

        let db = self.db.lock()?;
        let table = db.load_range_table()?;
        let verdict = RangeResolver::new(&table).resolve_raw(&guide, &test_code, age, &value);
        Ok(verdict.into())
    }

    /// Classify one value against every stored guide.
    pub fn classify_across_guides(
        &self,
        test_code: String,
        age_in_months: i64,
        value: String,
    ) -> Result<Vec<FfiGuideClassification>, IgPanelError> {
        let age = checked_age(age_in_months)?;

        let db = self.db.lock()?;
        let table = db.load_range_table()?;
        let verdicts = RangeResolver::new(&table).classify_across_guides(&test_code, age, &value);
        Ok(verdicts
            .into_iter()
            .map(|gv| FfiGuideClassification {
                guide: gv.guide,
                classification: gv.verdict.into(),
            })
            .collect())
    }

    /// Classify every value of a stored panel against every guide, with its trends.
    ///
    /// Uses the age at test time, like the panel report.
    pub fn classify_blood_test(&self, panel_id: String) -> Result<Vec<FfiPanelRow>, IgPanelError> {
        let db = self.db.lock()?;
        let panel = db
            .get_panel(&panel_id)?
            .ok_or_else(|| IgPanelError::NotFound(format!("panel {}", panel_id)))?;
        let user = db.require_user(&panel.user_id)?;
        let history = annotate_history(&db.list_panels_for_user(&user.id)?);
        let table = db.load_range_table()?;

        let annotated = history
            .iter()
            .find(|a| a.panel.id == panel.id)
            .ok_or_else(|| IgPanelError::NotFound(format!("panel {}", panel_id)))?;
        let report = PanelReport::build(&user, annotated, &table);
        Ok(report.rows.into_iter().map(|row| row.into()).collect())
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    /// A user's panels with trends, most recent first.
    pub fn user_history(&self, user_id: String) -> Result<Vec<FfiAnnotatedPanel>, IgPanelError> {
        let db = self.db.lock()?;
        db.require_user(&user_id)?;
        let panels = db.list_panels_for_user(&user_id)?;

        let annotated = annotate_history(&panels);
        debug!(user_id = %user_id, panels = annotated.len(), "Annotated history");
        Ok(annotated.into_iter().map(|a| a.into()).collect())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export a user's full history report as JSON.
    pub fn export_history_json(&self, user_id: String) -> Result<String, IgPanelError> {
        let report = self.history_report(&user_id)?;
        Ok(report.to_json()?)
    }

    /// Export a user's full history report as CSV.
    pub fn export_history_csv(&self, user_id: String) -> Result<String, IgPanelError> {
        let report = self.history_report(&user_id)?;
        Ok(report.to_csv())
    }
}

impl IgPanelCore {
    fn history_report(&self, user_id: &str) -> Result<HistoryReport, IgPanelError> {
        let db = self.db.lock()?;
        let user = db.require_user(user_id)?;
        let panels = db.list_panels_for_user(user_id)?;
        let table = db.load_range_table()?;
        Ok(HistoryReport::build(&user, &panels, &table))
    }
}

fn checked_age(age_in_months: i64) -> Result<u32, IgPanelError> {
    u32::try_from(age_in_months)
        .map_err(|_| IgPanelError::InvalidInput(format!("age of {} months is out of range", age_in_months)))
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe user.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub is_admin: bool,
    /// Age today; `None` for a birth date in the future
    pub age_in_months: Option<u32>,
}

impl From<UserRecord> for FfiUser {
    fn from(user: UserRecord) -> Self {
        Self {
            age_in_months: age::age_in_months_today(user.birth_date).ok(),
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            birth_date: user.birth_date.format("%Y-%m-%d").to_string(),
            is_admin: user.is_admin,
        }
    }
}

/// FFI-safe blood test panel.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPanel {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub age_in_months: u32,
    /// Canonical test code → value as submitted
    pub values: HashMap<String, String>,
}

impl From<TestPanel> for FfiPanel {
    fn from(panel: TestPanel) -> Self {
        Self {
            id: panel.id,
            user_id: panel.user_id,
            date: panel.date.format("%Y-%m-%d").to_string(),
            age_in_months: panel.age_in_months,
            values: panel
                .values
                .into_iter()
                .map(|(code, raw)| (code.as_str().to_string(), raw))
                .collect(),
        }
    }
}

/// FFI-safe classification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiStatus {
    Low,
    Normal,
    High,
    Unavailable,
}

/// FFI-safe classification with the band it used.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClassification {
    pub status: FfiStatus,
    /// Set when `status` is `Unavailable`
    pub reason: Option<String>,
    pub age_range: Option<String>,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl From<Verdict> for FfiClassification {
    fn from(verdict: Verdict) -> Self {
        let (status, reason) = match verdict.classification {
            Classification::Low => (FfiStatus::Low, None),
            Classification::Normal => (FfiStatus::Normal, None),
            Classification::High => (FfiStatus::High, None),
            Classification::Unavailable(reason) => (FfiStatus::Unavailable, Some(reason.label().to_string())),
        };
        Self {
            status,
            reason,
            age_range: verdict.band.map(|b| b.age_range_label()),
            low: verdict.band.map(|b| b.low),
            high: verdict.band.map(|b| b.high),
        }
    }
}

/// FFI-safe per-guide classification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGuideClassification {
    pub guide: String,
    pub classification: FfiClassification,
}

/// FFI-safe report row: one test code of a panel.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPanelRow {
    pub test_code: String,
    pub label: String,
    pub unit: Option<String>,
    pub value: String,
    /// `None` without a previous panel or a parseable pair of values
    pub trend: Option<FfiTrend>,
    pub guides: Vec<FfiGuideClassification>,
}

impl From<export::ReportRow> for FfiPanelRow {
    fn from(row: export::ReportRow) -> Self {
        Self {
            test_code: row.code.as_str().to_string(),
            label: row.label,
            unit: row.unit,
            value: row.value,
            trend: row.trend.map(|t| t.into()),
            guides: row
                .guides
                .into_iter()
                .map(|result| FfiGuideClassification {
                    guide: result.guide,
                    classification: Verdict {
                        classification: result.classification,
                        band: result.band,
                    }
                    .into(),
                })
                .collect(),
        }
    }
}

/// FFI-safe trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiTrend {
    Higher,
    Lower,
    Equal,
}

impl From<Trend> for FfiTrend {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::Higher => FfiTrend::Higher,
            Trend::Lower => FfiTrend::Lower,
            Trend::Equal => FfiTrend::Equal,
        }
    }
}

/// FFI-safe panel with its trends against the previous panel.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnnotatedPanel {
    pub panel: FfiPanel,
    /// `None` for the oldest panel
    pub trends: Option<HashMap<String, FfiTrend>>,
}

impl From<AnnotatedPanel> for FfiAnnotatedPanel {
    fn from(annotated: AnnotatedPanel) -> Self {
        Self {
            panel: annotated.panel.into(),
            trends: annotated.comparison.map(|comparison| {
                comparison
                    .into_iter()
                    .map(|(code, trend)| (code.as_str().to_string(), trend.into()))
                    .collect()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_values(igg: &str) -> HashMap<String, String> {
        TestCode::ALL
            .iter()
            .map(|c| {
                let v = if *c == TestCode::Igg { igg } else { "10" };
                (c.as_str().to_string(), v.to_string())
            })
            .collect()
    }

    #[test]
    fn test_register_and_add_blood_test() {
        let core = open_database_in_memory().unwrap();
        let user = core
            .register_user("Ada@Example.com".into(), "Ada".into(), "Yilmaz".into(), "2023-06-15".into())
            .unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert!(!user.is_admin);

        let panel = core
            .add_blood_test(user.id.clone(), "2024-06-10".into(), full_values("650"))
            .unwrap();
        assert_eq!(panel.age_in_months, 11);
        assert_eq!(panel.values.len(), 12);
        assert_eq!(core.list_blood_tests(user.id).unwrap().len(), 1);
    }

    #[test]
    fn test_incomplete_panel_rejected() {
        let core = open_database_in_memory().unwrap();
        let user = core
            .register_user("b@example.com".into(), "B".into(), "C".into(), "2023-01-01".into())
            .unwrap();

        let mut values = full_values("650");
        values.remove("antib");
        let result = core.add_blood_test(user.id.clone(), "2024-01-01".into(), values);
        assert!(matches!(result, Err(IgPanelError::InvalidInput(_))));

        let result = core.add_blood_test("missing".into(), "2024-01-01".into(), full_values("1"));
        assert!(matches!(result, Err(IgPanelError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_email_is_invalid_input() {
        let core = open_database_in_memory().unwrap();
        core.register_user("x@example.com".into(), "X".into(), "Y".into(), "2023-01-01".into())
            .unwrap();
        let result = core.register_user("X@example.com".into(), "X".into(), "Y".into(), "2023-01-01".into());
        assert!(matches!(result, Err(IgPanelError::InvalidInput(_))));
    }

    #[test]
    fn test_classify_value() {
        let core = open_database_in_memory().unwrap();

        let c = core
            .classify_value(None, "igg".into(), 5, "150".into())
            .unwrap();
        assert_eq!(c.status, FfiStatus::Low);
        assert_eq!(c.age_range.as_deref(), Some("4-7"));

        let c = core
            .classify_value(Some("Guide Ap".into()), "igg".into(), 5, "150".into())
            .unwrap();
        assert_eq!(c.status, FfiStatus::Unavailable);
        assert_eq!(c.reason.as_deref(), Some("no range defined"));

        let c = core
            .classify_value(None, "igg".into(), 5, "abc".into())
            .unwrap();
        assert_eq!(c.status, FfiStatus::Unavailable);

        assert!(matches!(
            core.classify_value(None, "igg".into(), -1, "150".into()),
            Err(IgPanelError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_classify_across_guides() {
        let core = open_database_in_memory().unwrap();
        let results = core.classify_across_guides("igg1".into(), 5, "500".into()).unwrap();
        let guides: Vec<&str> = results.iter().map(|r| r.guide.as_str()).collect();
        assert_eq!(guides, vec!["Guide Ap", "Guide Cilv"]);
        assert!(results.iter().all(|r| r.classification.status != FfiStatus::Unavailable));
    }

    #[test]
    fn test_user_history_and_export() {
        let core = open_database_in_memory().unwrap();
        let user = core
            .register_user("h@example.com".into(), "H".into(), "K".into(), "2023-01-01".into())
            .unwrap();
        core.add_blood_test(user.id.clone(), "2024-01-01".into(), full_values("500"))
            .unwrap();
        core.add_blood_test(user.id.clone(), "2024-04-01".into(), full_values("650"))
            .unwrap();

        let history = core.user_history(user.id.clone()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].panel.date, "2024-04-01");
        let trends = history[0].trends.as_ref().unwrap();
        assert_eq!(trends.get("igg"), Some(&FfiTrend::Higher));
        assert_eq!(trends.get("iga"), Some(&FfiTrend::Equal));
        assert!(history[1].trends.is_none());

        let csv = core.export_history_csv(user.id.clone()).unwrap();
        assert!(csv.starts_with("user_id,panel_id"));
        let json = core.export_history_json(user.id).unwrap();
        assert!(json.contains("Guide Cilv"));

        assert!(matches!(
            core.user_history("missing".into()),
            Err(IgPanelError::NotFound(_))
        ));
    }

    #[test]
    fn test_classify_blood_test() {
        let core = open_database_in_memory().unwrap();
        let user = core
            .register_user("p@example.com".into(), "P".into(), "Q".into(), "2023-06-15".into())
            .unwrap();
        core.add_blood_test(user.id.clone(), "2023-11-20".into(), full_values("150"))
            .unwrap();
        let latest = core
            .add_blood_test(user.id.clone(), "2024-01-20".into(), full_values("700"))
            .unwrap();

        let rows = core.classify_blood_test(latest.id).unwrap();
        assert_eq!(rows.len(), 12);

        let igg = rows.iter().find(|r| r.test_code == "igg").unwrap();
        assert_eq!(igg.trend, Some(FfiTrend::Higher));
        let guides: Vec<&str> = igg.guides.iter().map(|g| g.guide.as_str()).collect();
        assert_eq!(guides, vec!["Guide Ap", "Guide Cilv"]);
        assert_eq!(igg.guides[0].classification.status, FfiStatus::Unavailable);
        assert_eq!(igg.guides[1].classification.status, FfiStatus::Normal);
        assert_eq!(igg.guides[1].classification.age_range.as_deref(), Some("4-7"));

        assert!(matches!(
            core.classify_blood_test("missing".into()),
            Err(IgPanelError::NotFound(_))
        ));
    }

    #[test]
    fn test_import_rejects_guide_without_bands() {
        let core = open_database_in_memory().unwrap();
        assert!(matches!(
            core.import_guides_json(r#"{ "Guide Empty": {} }"#.into()),
            Err(IgPanelError::InvalidInput(_))
        ));
        assert_eq!(core.list_guides().unwrap(), vec!["Guide Ap", "Guide Cilv"]);
    }

    #[test]
    fn test_guide_import_and_export() {
        let core = open_database_in_memory().unwrap();
        let imported = core
            .import_guides_json(r#"{ "Guide Local": { "IgA": [ { "ageRange": "0-1200", "low": 1, "high": 2 } ] } }"#.into())
            .unwrap();
        assert_eq!(imported, 1);
        assert_eq!(core.list_guides().unwrap().len(), 3);

        let c = core
            .classify_value(Some("Guide Local".into()), "iga".into(), 30, "3".into())
            .unwrap();
        assert_eq!(c.status, FfiStatus::High);

        assert!(core.export_guides_json().unwrap().contains("\"ageRange\": \"0-1200\""));
        assert!(matches!(
            core.import_guides_json("{".into()),
            Err(IgPanelError::SerializationError(_))
        ));
    }

    #[test]
    fn test_admin_and_delete() {
        let core = open_database_in_memory().unwrap();
        let user = core
            .register_user("a@example.com".into(), "A".into(), "B".into(), "2023-01-01".into())
            .unwrap();
        assert!(core.toggle_admin(user.id.clone()).unwrap());
        assert!(core.get_user(user.id.clone()).unwrap().unwrap().is_admin);
        assert!(core.delete_user(user.id.clone()).unwrap());
        assert!(core.get_user(user.id).unwrap().is_none());
    }
}
