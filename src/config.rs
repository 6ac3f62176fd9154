//! Runtime configuration resolved from CLI flags, environment and platform defaults.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "sakura-todo";
pub const LOG_FILE_NAME: &str = "sakura-todo.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the task document and the log file.
    pub data_dir: PathBuf,
    /// `tracing` filter directive, e.g. `info` or `sakura_todo=debug`.
    pub log_level: String,
}

impl Config {
    /// Resolve configuration. An explicit directory wins over the platform default.
    pub fn resolve(dir: Option<PathBuf>, log_level: Option<String>) -> Result<Self> {
        let data_dir = match dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self {
            data_dir,
            log_level: log_level
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// `<platform data dir>/sakura-todo`, falling back to `~/.sakura-todo`.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(dir) = dirs::data_dir() {
        return Ok(dir.join(APP_DIR_NAME));
    }
    dirs::home_dir()
        .map(|home| home.join(format!(".{APP_DIR_NAME}")))
        .ok_or(Error::NoDataDir)
}
