//! Call-record persistence.
//!
//! A `CallRecord` is the per-conversation metadata document, keyed by
//! transaction id, that downstream asynchronous processing (recording
//! pipeline, analytics) reads and extends. The state machine owns the
//! write contract but never reads records back for control flow; every
//! update touches a disjoint field set, so concurrent writers for the same
//! call are safe under last-writer-wins.

mod memory;

pub use memory::MemoryCallRecordStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Persisted metadata for one call, keyed by transaction id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub transaction_id: String,
    pub direction: Option<Direction>,
    pub caller: Option<String>,
    pub callee: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub recording_key: Option<String>,
    pub execution_id: Option<String>,
    pub analytics_job_id: Option<String>,
}

impl CallRecord {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            ..Default::default()
        }
    }
}

/// Fields written when the bridged call is answered.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerUpdate {
    pub direction: Direction,
    pub caller: String,
    pub callee: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("call record store unavailable: {0}")]
    Unavailable(String),

    #[error("call record write rejected for transaction {transaction_id}: {reason}")]
    WriteRejected {
        transaction_id: String,
        reason: String,
    },
}

/// Key-value persistence adapter for call records.
///
/// Implementations must upsert: an update for a transaction id that has no
/// record yet creates it. Callers in the call-control path treat every error
/// as non-fatal (logged and swallowed); the pipeline crate propagates them.
#[async_trait]
pub trait CallRecordStore: Send + Sync {
    /// Set direction, caller, callee and start time when the bridge is
    /// answered.
    async fn update_on_answer(
        &self,
        transaction_id: &str,
        update: AnswerUpdate,
    ) -> Result<(), RecordStoreError>;

    /// Set the end time once every leg has hung up.
    async fn update_on_hangup(
        &self,
        transaction_id: &str,
        end_time: DateTime<Utc>,
    ) -> Result<(), RecordStoreError>;

    /// Set the recording object key and the workflow execution id once the
    /// recording lands in storage.
    async fn update_recording(
        &self,
        transaction_id: &str,
        recording_key: &str,
        execution_id: &str,
    ) -> Result<(), RecordStoreError>;

    /// Set the analytics job id once transcription is submitted.
    async fn update_analytics(
        &self,
        transaction_id: &str,
        analytics_job_id: &str,
    ) -> Result<(), RecordStoreError>;

    /// Fetch a record, if one exists.
    async fn get(&self, transaction_id: &str) -> Result<Option<CallRecord>, RecordStoreError>;
}
