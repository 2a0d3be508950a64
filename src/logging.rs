//! File logging for the dialog runtime.
//!
//! The terminal belongs to the UI, so log output only ever goes to a file.
//! Without a configured path nothing is installed and `tracing` events are
//! discarded.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("a global tracing subscriber is already installed")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Level used when `RUST_LOG` is unset.
pub fn default_directive(config: &EnvConfig) -> &'static str {
    if config.debug {
        "debug"
    } else {
        "info"
    }
}

pub fn env_filter(config: &EnvConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(config)))
}

pub fn open_log_file(path: impl AsRef<Path>) -> Result<File, LoggingError> {
    let path = path.as_ref();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Installs the global subscriber. Returns `Ok(false)` when no log file is configured.
pub fn init(config: &EnvConfig) -> Result<bool, LoggingError> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(false);
    };
    let file = open_log_file(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(LoggingError::Install)?;

    tracing::info!(path, "logging initialized");
    Ok(true)
}
