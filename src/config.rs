//! Environment configuration.

use std::env;
use std::time::Duration;

use crate::runtime::dialog::{DialogTiming, DEFAULT_REDRAW_INTERVAL};
use crate::runtime::sequencer::DEFAULT_ESCAPE_TIMEOUT;

pub const ESC_TIMEOUT_VAR: &str = "MODAL_TUI_ESC_TIMEOUT_MS";
pub const REDRAW_VAR: &str = "MODAL_TUI_REDRAW_MS";
pub const LOG_VAR: &str = "MODAL_TUI_LOG";
pub const DEBUG_VAR: &str = "MODAL_TUI_DEBUG";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive number of milliseconds, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub escape_timeout: Duration,
    pub redraw_interval: Duration,
    pub log_file: Option<String>,
    pub debug: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            redraw_interval: DEFAULT_REDRAW_INTERVAL,
            log_file: None,
            debug: false,
        }
    }
}

impl EnvConfig {
    /// Reads the environment, keeping defaults for unset or malformed values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            escape_timeout: env_millis_or(ESC_TIMEOUT_VAR, defaults.escape_timeout),
            redraw_interval: env_millis_or(REDRAW_VAR, defaults.redraw_interval),
            log_file: env_string_opt(LOG_VAR),
            debug: env_flag(DEBUG_VAR),
        }
    }

    /// Like [`EnvConfig::from_env`], but malformed numbers are an error.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            escape_timeout: env_millis(ESC_TIMEOUT_VAR)?.unwrap_or(defaults.escape_timeout),
            redraw_interval: env_millis(REDRAW_VAR)?.unwrap_or(defaults.redraw_interval),
            log_file: env_string_opt(LOG_VAR),
            debug: env_flag(DEBUG_VAR),
        })
    }

    pub fn timing(&self) -> DialogTiming {
        DialogTiming::from(self)
    }
}

impl From<&EnvConfig> for DialogTiming {
    fn from(config: &EnvConfig) -> Self {
        Self {
            escape_timeout: config.escape_timeout,
            redraw_interval: config.redraw_interval,
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_millis(key: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = env_string_opt(key) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Some(Duration::from_millis(ms))),
        _ => Err(ConfigError::InvalidNumber { key, value }),
    }
}

fn env_millis_or(key: &'static str, default: Duration) -> Duration {
    match env_millis(key) {
        Ok(value) => value.unwrap_or(default),
        Err(err) => {
            tracing::warn!(%err, "using default");
            default
        }
    }
}
