//! Logging setup.

use std::env;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ConfigError;

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use.
    pub level: Level,
    /// Whether to include file and line information.
    pub file_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: Level::INFO,
            file_info: false,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: Level) -> Self {
        LoggingConfig {
            level,
            ..Default::default()
        }
    }

    /// Read the level from `LOG_LEVEL`, falling back to `info` when unset
    /// or unparseable.
    pub fn from_env() -> Self {
        let level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|value| Level::from_str(&value).ok())
            .unwrap_or(Level::INFO);
        LoggingConfig::new(level)
    }

    /// Enable file and line information in logs.
    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }
}

/// Set up the global subscriber with the provided configuration.
pub fn setup_logging(config: LoggingConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::from_default_env().add_directive(config.level.into());

    let subscriber = fmt::Subscriber::builder().with_env_filter(filter);

    if config.file_info {
        subscriber.with_file(true).with_line_number(true).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Parse a log level from a string.
pub fn parse_log_level(level: &str) -> Result<Level, ConfigError> {
    Level::from_str(level).map_err(|_| ConfigError::InvalidValue {
        name: "LOG_LEVEL",
        reason: format!("invalid log level: {}", level),
    })
}
