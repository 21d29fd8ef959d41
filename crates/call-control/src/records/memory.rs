use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{AnswerUpdate, CallRecord, CallRecordStore, RecordStoreError};

/// In-memory call-record store for tests and local runs.
///
/// Production deployments implement [`CallRecordStore`] against a real
/// key-value backend; this keeps the same upsert semantics behind a
/// `RwLock`-guarded map.
#[derive(Clone, Default)]
pub struct MemoryCallRecordStore {
    records: Arc<RwLock<HashMap<String, CallRecord>>>,
}

impl MemoryCallRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn upsert<F>(&self, transaction_id: &str, apply: F)
    where
        F: FnOnce(&mut CallRecord),
    {
        let mut records = self.records.write().await;
        let record = records
            .entry(transaction_id.to_string())
            .or_insert_with(|| CallRecord::new(transaction_id));
        apply(record);
        debug!(transaction_id, "call record updated");
    }
}

#[async_trait]
impl CallRecordStore for MemoryCallRecordStore {
    async fn update_on_answer(
        &self,
        transaction_id: &str,
        update: AnswerUpdate,
    ) -> Result<(), RecordStoreError> {
        self.upsert(transaction_id, |record| {
            record.direction = Some(update.direction);
            record.caller = Some(update.caller);
            record.callee = Some(update.callee);
            record.start_time = Some(update.start_time);
        })
        .await;
        Ok(())
    }

    async fn update_on_hangup(
        &self,
        transaction_id: &str,
        end_time: DateTime<Utc>,
    ) -> Result<(), RecordStoreError> {
        self.upsert(transaction_id, |record| {
            record.end_time = Some(end_time);
        })
        .await;
        Ok(())
    }

    async fn update_recording(
        &self,
        transaction_id: &str,
        recording_key: &str,
        execution_id: &str,
    ) -> Result<(), RecordStoreError> {
        self.upsert(transaction_id, |record| {
            record.recording_key = Some(recording_key.to_string());
            record.execution_id = Some(execution_id.to_string());
        })
        .await;
        Ok(())
    }

    async fn update_analytics(
        &self,
        transaction_id: &str,
        analytics_job_id: &str,
    ) -> Result<(), RecordStoreError> {
        self.upsert(transaction_id, |record| {
            record.analytics_job_id = Some(analytics_job_id.to_string());
        })
        .await;
        Ok(())
    }

    async fn get(&self, transaction_id: &str) -> Result<Option<CallRecord>, RecordStoreError> {
        Ok(self.records.read().await.get(transaction_id).cloned())
    }
}
