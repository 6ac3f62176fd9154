//! File-based `tracing` setup.
//!
//! The terminal belongs to the UI, so events go to `<data dir>/sakura-todo.log`
//! as plain text. Initialization is fallible and never panics; callers may
//! carry on without logging.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{Error, Result};

/// Install the global subscriber writing to the configured log file.
///
/// # Errors
/// - the data directory or log file cannot be created;
/// - the level is not a valid filter directive;
/// - a global subscriber is already installed.
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(config.data_dir())?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())?;

    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| Error::Logging(format!("invalid log level `{}`: {e}", config.log_level)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), dir = %config.data_dir().display(), "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_log_file_and_rejects_second_init() {
        let tmp = TempDir::new().unwrap();
        let config = Config::resolve(Some(tmp.path().join("data")), Some("info".into())).unwrap();

        init(&config).unwrap();
        assert!(config.log_file().exists());
        assert!(matches!(init(&config), Err(Error::Logging(_))));
    }
}
