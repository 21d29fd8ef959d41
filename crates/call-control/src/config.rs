//! Service configuration.

use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Read-only configuration consumed by the call-control state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct CallControlConfig {
    /// The system's own phone number. Calls originating from it are
    /// Outbound; everything else bridges to it.
    pub source_phone: String,
    /// Bucket holding the audio prompt assets.
    pub wav_bucket: String,
    /// Bucket recordings are written into.
    pub recording_bucket: String,
    /// Key-value table holding call records.
    pub call_records_table: String,
}

impl CallControlConfig {
    pub fn new(
        source_phone: impl Into<String>,
        wav_bucket: impl Into<String>,
        recording_bucket: impl Into<String>,
        call_records_table: impl Into<String>,
    ) -> Self {
        Self {
            source_phone: source_phone.into(),
            wav_bucket: wav_bucket.into(),
            recording_bucket: recording_bucket.into(),
            call_records_table: call_records_table.into(),
        }
    }

    /// Load from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            source_phone: require("SOURCE_PHONE")?,
            wav_bucket: require("WAV_BUCKET")?,
            recording_bucket: require("RECORDING_BUCKET")?,
            call_records_table: require("CALL_RECORDS_TABLE")?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
