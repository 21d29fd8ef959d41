//! Downstream processing glue for recorded calls.
//!
//! Two small handlers sit behind the call-control state machine:
//!
//! - [`trigger::RecordingTrigger`] reacts to the blob store's write
//!   notification for a finished recording, stamps the call record with the
//!   recording key and a workflow execution id, and starts the
//!   recording-analysis workflow.
//! - [`analytics::AnalyticsSubmitter`] submits the recording to the
//!   transcription service with channel roles derived from the call's
//!   direction, and stamps the call record with the job id.
//!
//! Both talk to the same [`sma_call_control::CallRecordStore`] the state
//! machine writes, and treat record updates as best-effort.

pub mod analytics;
pub mod notification;
pub mod trigger;

pub use analytics::{
    AnalyticsClient, AnalyticsJobReceipt, AnalyticsJobRequest, AnalyticsSubmitter, ChannelRole,
};
pub use notification::{RecordingKey, StorageNotification};
pub use trigger::{RecordingTrigger, WorkflowInput, WorkflowStarter};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("malformed storage notification: {0}")]
    MalformedNotification(String),

    #[error("recording key does not match the expected layout: {0}")]
    MalformedKey(String),

    #[error("workflow start failed: {0}")]
    Workflow(String),

    #[error("analytics job submission failed: {0}")]
    Analytics(String),
}
