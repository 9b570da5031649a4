//! Logging setup
//!
//! The TUI owns stdout, so interactive runs log to a file in the XDG data
//! directory (`~/.local/share/wsaweather/wsaweather.log` on Linux). One-shot
//! `--print` runs log to stderr. `RUST_LOG` overrides the configured level.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::cli::StartupConfig;

const LOG_FILE_NAME: &str = "wsaweather.log";

/// Errors that can occur while installing the log subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory or file could not be created
    #[error("Failed to open log file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber was already installed
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Directory the log file lives in, if a home directory can be determined
pub fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wsaweather").map(|dirs| dirs.data_local_dir().to_path_buf())
}

/// Opens (creating if needed) the log file inside `dir` for appending
pub fn open_log_file(dir: &Path) -> Result<(PathBuf, File), LoggingError> {
    let path = dir.join(LOG_FILE_NAME);
    let io_error = |source| LoggingError::Io {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_error)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(io_error)?;

    Ok((path, file))
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global tracing subscriber for this run
///
/// Returns the log file path for interactive runs. When no home directory is
/// available an interactive run goes without a log file.
pub fn init(config: &StartupConfig) -> Result<Option<PathBuf>, LoggingError> {
    let filter = env_filter(&config.log_level);

    if !config.is_interactive() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
        return Ok(None);
    }

    let Some(dir) = default_log_dir() else {
        return Ok(None);
    };
    let (path, file) = open_log_file(&dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!(path = %path.display(), "Logging initialized");
    Ok(Some(path))
}
