//! Crate-level error type.
//!
//! The state machine itself never surfaces errors — every code path returns
//! a well-formed response. This type exists for the fallible edges around
//! it: configuration loading and direct store access by embedding services.

use crate::config::ConfigError;
use crate::records::RecordStoreError;

#[derive(Debug, thiserror::Error)]
pub enum CallControlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("call record store error: {0}")]
    Store(#[from] RecordStoreError),
}

pub type Result<T> = std::result::Result<T, CallControlError>;
