//! Workflow trigger: turns a recording-write notification into a running
//! recording-analysis workflow and stamps the call record with the recording
//! key and execution id.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use sma_call_control::{CallRecordStore, Direction};

use crate::notification::{RecordingKey, StorageNotification};
use crate::PipelineError;

/// Input handed to the recording-analysis workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInput {
    #[serde(rename = "call_id")]
    pub transaction_id: String,
    pub bucket: String,
    pub key: String,
    pub recording_date: String,
    /// Direction from the call record; absent when the record was never
    /// written or cannot be read.
    pub direction: Option<Direction>,
}

/// Collaborator that starts the downstream workflow execution.
#[async_trait]
pub trait WorkflowStarter: Send + Sync {
    async fn start_execution(
        &self,
        execution_id: &str,
        input: &WorkflowInput,
    ) -> Result<(), PipelineError>;
}

/// Handles recording-write notifications.
pub struct RecordingTrigger {
    records: Arc<dyn CallRecordStore>,
    workflow: Arc<dyn WorkflowStarter>,
}

impl RecordingTrigger {
    pub fn new(records: Arc<dyn CallRecordStore>, workflow: Arc<dyn WorkflowStarter>) -> Self {
        Self { records, workflow }
    }

    /// Process one notification: resolve the call record, stamp it with the
    /// recording key and a freshly minted execution id, and start the
    /// workflow. Store failures degrade (missing direction, unstamped
    /// record) but a workflow start failure propagates.
    pub async fn handle(
        &self,
        notification: &StorageNotification,
    ) -> Result<WorkflowInput, PipelineError> {
        let parsed = RecordingKey::parse(&notification.key)?;
        let transaction_id = parsed.transaction_id;

        let direction = match self.records.get(&transaction_id).await {
            Ok(record) => record.and_then(|r| r.direction),
            Err(err) => {
                warn!(
                    transaction_id,
                    error = %err,
                    "could not read call record, proceeding without direction"
                );
                None
            }
        };

        let execution_id = Uuid::new_v4().to_string();
        if let Err(err) = self
            .records
            .update_recording(&transaction_id, &notification.key, &execution_id)
            .await
        {
            warn!(
                transaction_id,
                error = %err,
                "call record update failed, continuing"
            );
        }

        let input = WorkflowInput {
            transaction_id: transaction_id.clone(),
            bucket: notification.bucket.clone(),
            key: notification.key.clone(),
            recording_date: parsed.recording_date,
            direction,
        };
        info!(
            transaction_id,
            execution_id, "starting recording-analysis workflow"
        );
        self.workflow.start_execution(&execution_id, &input).await?;

        Ok(input)
    }
}
