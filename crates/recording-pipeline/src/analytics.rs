//! Call-analytics submission: hands a finished recording to the
//! transcription service with the right channel-role mapping and stamps the
//! call record with the job id.
//!
//! No transcript ever flows through here; this is submission glue only.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use sma_call_control::{CallRecordStore, Direction};

use crate::trigger::WorkflowInput;
use crate::PipelineError;

/// Which party a recording track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelRole {
    Agent,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDefinition {
    pub channel_id: u8,
    pub participant_role: ChannelRole,
}

/// A transcription job submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsJobRequest {
    pub job_name: String,
    pub media_uri: String,
    pub output_location: String,
    pub language_options: Vec<String>,
    pub channel_definitions: Vec<ChannelDefinition>,
}

/// Receipt returned by the transcription collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsJobReceipt {
    pub job_name: String,
    pub transaction_id: String,
    pub bucket: String,
    pub recording_key: String,
}

/// Collaborator that submits analytics jobs to the transcription service.
#[async_trait]
pub trait AnalyticsClient: Send + Sync {
    async fn start_analytics_job(
        &self,
        request: &AnalyticsJobRequest,
    ) -> Result<(), PipelineError>;
}

/// Maps direction to channel roles. On an inbound call the operator
/// (source phone) answers on channel 0; on an outbound call the operator
/// originated the call, so the roles flip.
fn channel_definitions(direction: Option<Direction>) -> Vec<ChannelDefinition> {
    let (role_0, role_1) = match direction {
        Some(Direction::Inbound) => (ChannelRole::Agent, ChannelRole::Customer),
        _ => (ChannelRole::Customer, ChannelRole::Agent),
    };
    vec![
        ChannelDefinition {
            channel_id: 0,
            participant_role: role_0,
        },
        ChannelDefinition {
            channel_id: 1,
            participant_role: role_1,
        },
    ]
}

/// Submits the analytics job for a recorded call.
pub struct AnalyticsSubmitter {
    records: Arc<dyn CallRecordStore>,
    client: Arc<dyn AnalyticsClient>,
}

impl AnalyticsSubmitter {
    pub fn new(records: Arc<dyn CallRecordStore>, client: Arc<dyn AnalyticsClient>) -> Self {
        Self { records, client }
    }

    pub async fn handle(
        &self,
        input: &WorkflowInput,
    ) -> Result<AnalyticsJobReceipt, PipelineError> {
        let job_name = Uuid::new_v4().to_string();

        if let Err(err) = self
            .records
            .update_analytics(&input.transaction_id, &job_name)
            .await
        {
            warn!(
                transaction_id = input.transaction_id,
                error = %err,
                "call record update failed, continuing"
            );
        }

        let request = AnalyticsJobRequest {
            job_name: job_name.clone(),
            media_uri: format!("s3://{}/{}", input.bucket, input.key),
            output_location: format!(
                "s3://{}/transcriptions/{}/{}.json",
                input.bucket, input.recording_date, input.transaction_id
            ),
            language_options: vec!["en-US".to_string()],
            channel_definitions: channel_definitions(input.direction),
        };
        info!(
            transaction_id = input.transaction_id,
            job_name, "submitting call analytics job"
        );
        self.client.start_analytics_job(&request).await?;

        Ok(AnalyticsJobReceipt {
            job_name,
            transaction_id: input.transaction_id.clone(),
            bucket: input.bucket.clone(),
            recording_key: input.key.clone(),
        })
    }
}
