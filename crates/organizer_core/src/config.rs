//! Store configuration.
//!
//! Values come from code or from `ORGANIZER_*` environment variables.

use crate::logging::{default_log_level, init_logging};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ORGANIZER_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ORGANIZER_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ORGANIZER_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file. `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Config for a database file with default logging.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Reads config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads config through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV).map(PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when no directory is set.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", dir.display()))?;
        init_logging(&self.log_level, dir)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn lookup_reads_values_and_ignores_blanks() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DB_PATH_ENV, "/tmp/organizer.sqlite3"),
            (LOG_LEVEL_ENV, "  "),
            (LOG_DIR_ENV, "/tmp/organizer-logs"),
        ]);
        let config = StoreConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/tmp/organizer.sqlite3"))
        );
        assert_eq!(config.log_level, StoreConfig::default().log_level);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/organizer-logs")));
    }

    #[test]
    fn missing_log_dir_skips_logging() {
        let config = StoreConfig::default();
        assert_eq!(config.init_logging(), Ok(false));
    }
}
