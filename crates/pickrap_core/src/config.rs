//! Runtime configuration resolved from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `PICKRAP_DB_PATH` | `<temp dir>/pickrap.sqlite3` |
//! | `PICKRAP_LOG_LEVEL` | [`default_log_level`] |
//! | `PICKRAP_LOG_DIR` | unset: file logging disabled |
//! | `PICKRAP_PREVIEW_TIMEOUT_MS` | `3000` |
//!
//! Blank values count as unset; unparsable numbers fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_VAR: &str = "PICKRAP_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "PICKRAP_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "PICKRAP_LOG_DIR";
pub const PREVIEW_TIMEOUT_VAR: &str = "PICKRAP_PREVIEW_TIMEOUT_MS";

const DEFAULT_DB_FILE_NAME: &str = "pickrap.sqlite3";
const DEFAULT_PREVIEW_TIMEOUT_MS: u64 = 3_000;

/// Settings needed to bootstrap storage, logging and link previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub preview_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            preview_timeout: Duration::from_millis(DEFAULT_PREVIEW_TIMEOUT_MS),
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: value(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: value(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
            log_dir: value(LOG_DIR_VAR).map(PathBuf::from),
            preview_timeout: value(PREVIEW_TIMEOUT_VAR)
                .and_then(|raw| raw.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.preview_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_VAR, LOG_DIR_VAR, PREVIEW_TIMEOUT_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config_from(pairs: &[(&str, &str)]) -> CoreConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), CoreConfig::default());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            (DB_PATH_VAR, " /data/pickrap.db "),
            (LOG_DIR_VAR, "/var/log/pickrap"),
            (PREVIEW_TIMEOUT_VAR, "250"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/data/pickrap.db"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/pickrap")));
        assert_eq!(config.preview_timeout, Duration::from_millis(250));
    }

    #[test]
    fn blank_and_invalid_values_fall_back() {
        let config = config_from(&[(LOG_DIR_VAR, "   "), (PREVIEW_TIMEOUT_VAR, "soon")]);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.preview_timeout, CoreConfig::default().preview_timeout);
    }
}
