//! Core runtime configuration.
//!
//! # Invariants
//! - `data_dir` is never empty.
//! - `log_dir`, when set, is absolute (required by `init_logging`).

use crate::logging::default_log_level;
use crate::search::listing::ScheduleOrder;
use std::path::PathBuf;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".data";

/// Settings a front end resolves before opening a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Directory holding one JSON container per entity kind.
    pub data_dir: PathBuf,
    pub log_level: String,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
    pub schedule_order: ScheduleOrder,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: default_log_level().to_string(),
            log_dir: None,
            schedule_order: ScheduleOrder::default(),
        }
    }
}

impl CoreConfig {
    /// Checks the invariants above.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir cannot be empty".to_string());
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                ));
            }
        }
        Ok(())
    }
}
