//! Core configuration.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::GUIDE_CILV;

pub const ENV_DB_PATH: &str = "IGPANEL_DB_PATH";
pub const ENV_SEED_GUIDES: &str = "IGPANEL_SEED_GUIDES";
pub const ENV_DEFAULT_GUIDE: &str = "IGPANEL_DEFAULT_GUIDE";

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("{0} must not be empty")]
    Empty(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for opening the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// SQLite file; `None` keeps everything in memory
    pub database_path: Option<String>,
    /// Write the built-in guides into an empty range table on open
    pub seed_builtin_guides: bool,
    /// Guide used when a caller does not name one
    pub default_guide: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_builtin_guides: true,
            default_guide: GUIDE_CILV.to_string(),
        }
    }
}

impl CoreConfig {
    /// Read configuration from `IGPANEL_*` environment variables, falling back to defaults.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Used by [`CoreConfig::from_env`] and tests.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_path = lookup(ENV_DB_PATH)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let seed_builtin_guides = match lookup(ENV_SEED_GUIDES) {
            Some(raw) => parse_bool(ENV_SEED_GUIDES, &raw)?,
            None => defaults.seed_builtin_guides,
        };

        let default_guide = match lookup(ENV_DEFAULT_GUIDE) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::Empty(ENV_DEFAULT_GUIDE.to_string()))
            }
            Some(raw) => raw.trim().to_string(),
            None => defaults.default_guide,
        };

        match database_path {
            Some(ref path) => info!(path = %path, "Using SQLite database"),
            None => info!("No {} provided, using an in-memory database", ENV_DB_PATH),
        }

        Ok(Self {
            database_path,
            seed_builtin_guides,
            default_guide,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.default_guide, "Guide Cilv");
        assert!(config.seed_builtin_guides);
    }

    #[test]
    fn test_overrides() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /tmp/igpanel.db "),
            (ENV_SEED_GUIDES, "off"),
            (ENV_DEFAULT_GUIDE, "Guide Ap"),
        ]))
        .unwrap();

        assert_eq!(config.database_path.as_deref(), Some("/tmp/igpanel.db"));
        assert!(!config.seed_builtin_guides);
        assert_eq!(config.default_guide, "Guide Ap");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            CoreConfig::from_lookup(lookup(&[(ENV_SEED_GUIDES, "maybe")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            CoreConfig::from_lookup(lookup(&[(ENV_DEFAULT_GUIDE, "  ")])),
            Err(ConfigError::Empty(_))
        ));
    }

    #[test]
    fn test_blank_path_means_in_memory() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_DB_PATH, "")])).unwrap();
        assert!(config.database_path.is_none());
    }
}
