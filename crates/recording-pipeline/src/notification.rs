//! Storage-write notifications and recording object keys.
//!
//! When the control plane finishes writing a recording, the blob store emits
//! a write notification for an object keyed
//! `originalAudio/<yyyy>/<mm>/<dd>/<prefix>_<transactionId>.wav`. The
//! transaction id embedded in the key is what links the recording back to
//! its call record.

use serde::Deserialize;

use crate::PipelineError;

/// A blob-store write notification, reduced to what the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageNotification {
    pub bucket: String,
    pub key: String,
}

impl StorageNotification {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse the first record out of an S3-style event notification payload.
    pub fn from_s3_event(payload: &serde_json::Value) -> Result<Self, PipelineError> {
        let event: S3Event = serde_json::from_value(payload.clone())
            .map_err(|err| PipelineError::MalformedNotification(err.to_string()))?;
        let record = event.records.into_iter().next().ok_or_else(|| {
            PipelineError::MalformedNotification("notification carried no records".to_string())
        })?;
        Ok(Self {
            bucket: record.s3.bucket.name,
            key: record.s3.object.key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct S3Event {
    #[serde(rename = "Records")]
    records: Vec<S3Record>,
}

#[derive(Debug, Deserialize)]
struct S3Record {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: String,
}

/// The parsed components of a recording object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingKey {
    /// Transaction id of the recorded call.
    pub transaction_id: String,
    /// Date path segment, `yyyy/mm/dd`.
    pub recording_date: String,
}

impl RecordingKey {
    /// Parse `originalAudio/<yyyy>/<mm>/<dd>/<prefix>_<transactionId>.wav`.
    pub fn parse(key: &str) -> Result<Self, PipelineError> {
        let parts: Vec<&str> = key.splitn(5, '/').collect();
        if parts.len() != 5 {
            return Err(PipelineError::MalformedKey(key.to_string()));
        }
        let recording_date = parts[1..4].join("/");

        // File name is "<prefix>_<transactionId>.<ext>".
        let file_name = parts[4];
        let transaction_id = file_name
            .splitn(3, '_')
            .nth(1)
            .and_then(|tail| tail.split('.').next())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PipelineError::MalformedKey(key.to_string()))?;

        Ok(Self {
            transaction_id: transaction_id.to_string(),
            recording_date,
        })
    }
}
