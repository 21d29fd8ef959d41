//! Telephony actions and their builders.
//!
//! `Action` is the closed union of commands the state machine can return to
//! the control plane; it serializes to the wire shape
//! `{"Type": …, "Parameters": {…}}`. The builder functions at the bottom are
//! pure constructors: fixed timeouts, digit windows and audio asset names are
//! encoded here as constants, and nothing in this module performs I/O or
//! consults call state beyond its explicit arguments.

use serde::{Deserialize, Serialize};

use crate::types::ParticipantTag;

/// Audio asset file names, stored in the configured audio bucket.
pub const RECORDING_NOTICE_AUDIO: &str = "thisCallIsBeingRecorded.wav";
pub const CONNECTING_AUDIO: &str = "connectingYou.wav";
pub const RECORDING_PAUSED_AUDIO: &str = "recordingPaused.wav";
pub const RECORDING_RESUMED_AUDIO: &str = "recordingResumed.wav";
pub const RECORDING_STOPPED_AUDIO: &str = "recordingStopped.wav";
pub const ENTER_NUMBER_AUDIO: &str = "enterNumberToDial.wav";
pub const GATHER_FAILURE_AUDIO: &str = "sorryIDidntGetThat.wav";
pub const UNABLE_TO_CONNECT_AUDIO: &str = "we_were_unable_to_connect_your_call.wav";

/// Seconds an outbound bridge attempt rings before giving up.
pub const BRIDGE_TIMEOUT_SECONDS: u32 = 30;

/// Digit window for the outbound destination gather.
pub const GATHER_MIN_DIGITS: u32 = 10;
pub const GATHER_MAX_DIGITS: u32 = 15;
pub const GATHER_REPEAT: u32 = 3;
pub const GATHER_INTER_DIGIT_TIMEOUT_MS: u64 = 2500;
pub const GATHER_REPEAT_TIMEOUT_MS: u64 = 5000;

/// Recording-control digit capture: only digits 5-7 are meaningful.
pub const RECORDING_CONTROL_DIGITS_REGEX: &str = "[5-7]";
pub const RECEIVE_DIGITS_INTER_DIGIT_TIMEOUT_MS: u64 = 1000;
pub const RECEIVE_DIGITS_FLUSH_TIMEOUT_MS: u64 = 10000;

/// SIP response code attached to a Hangup action.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SipResponseCode {
    #[serde(rename = "480")]
    Unavailable,
    #[serde(rename = "486")]
    Busy,
    #[serde(rename = "0")]
    Terminated,
}

/// An audio file reference in blob storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioSource {
    #[serde(rename = "Type")]
    pub source_type: String,
    pub bucket_name: String,
    pub key: String,
}

impl AudioSource {
    pub fn s3(bucket: &str, key: &str) -> Self {
        Self {
            source_type: "S3".to_string(),
            bucket_name: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HangupParameters {
    pub call_id: String,
    pub sip_response_code: SipResponseCode,
}

/// PlayAudio targets either a specific call id or a participant tag,
/// never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayAudioParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_tag: Option<ParticipantTag>,
    pub audio_source: AudioSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayAudioAndGetDigitsParameters {
    pub call_id: String,
    pub min_number_of_digits: u32,
    pub max_number_of_digits: u32,
    pub repeat: u32,
    pub in_between_digits_duration_in_milliseconds: u64,
    pub repeat_duration_in_milliseconds: u64,
    pub terminator_digits: Vec<String>,
    pub audio_source: AudioSource,
    pub failure_audio_source: AudioSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BridgeEndpoint {
    pub uri: String,
    pub bridge_endpoint_type: String,
}

impl BridgeEndpoint {
    pub fn pstn(destination: &str) -> Self {
        Self {
            uri: destination.to_string(),
            bridge_endpoint_type: "PSTN".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallAndBridgeParameters {
    pub call_timeout_seconds: u32,
    pub caller_id_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ringback_tone: Option<AudioSource>,
    pub endpoints: Vec<BridgeEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiveDigitsParameters {
    pub call_id: String,
    pub input_digits_regex: String,
    pub in_between_digits_duration_in_milliseconds: u64,
    pub flush_digits_duration_in_milliseconds: u64,
}

/// Shared parameter shape for pause/resume/stop recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallIdParameters {
    pub call_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordingDestination {
    #[serde(rename = "Type")]
    pub destination_type: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartCallRecordingParameters {
    pub call_id: String,
    pub track: String,
    pub destination: RecordingDestination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PauseParameters {
    pub duration_in_milliseconds: u64,
}

/// A telephony command for the control plane to execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Parameters")]
pub enum Action {
    Hangup(HangupParameters),
    PlayAudio(PlayAudioParameters),
    PlayAudioAndGetDigits(PlayAudioAndGetDigitsParameters),
    CallAndBridge(CallAndBridgeParameters),
    ReceiveDigits(ReceiveDigitsParameters),
    StartCallRecording(StartCallRecordingParameters),
    PauseCallRecording(CallIdParameters),
    ResumeCallRecording(CallIdParameters),
    StopCallRecording(CallIdParameters),
    Pause(PauseParameters),
}

/// The complete decision for one event: an ordered action list under the
/// fixed schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmaResponse {
    pub schema_version: String,
    pub actions: Vec<Action>,
}

impl SmaResponse {
    pub fn of(actions: Vec<Action>) -> Self {
        Self {
            schema_version: "1.0".to_string(),
            actions,
        }
    }

    /// A well-formed response carrying no actions.
    pub fn none() -> Self {
        Self::of(Vec::new())
    }
}

pub fn hangup(call_id: &str, code: SipResponseCode) -> Action {
    Action::Hangup(HangupParameters {
        call_id: call_id.to_string(),
        sip_response_code: code,
    })
}

/// Play an audio file to a specific leg by call id.
pub fn play_audio(call_id: &str, bucket: &str, file: &str) -> Action {
    Action::PlayAudio(PlayAudioParameters {
        call_id: Some(call_id.to_string()),
        participant_tag: None,
        audio_source: AudioSource::s3(bucket, file),
    })
}

/// Play an audio file to a leg addressed by participant tag.
pub fn play_audio_on_leg(tag: ParticipantTag, bucket: &str, file: &str) -> Action {
    Action::PlayAudio(PlayAudioParameters {
        call_id: None,
        participant_tag: Some(tag),
        audio_source: AudioSource::s3(bucket, file),
    })
}

/// Prompt for a destination number and collect 10-15 digits terminated
/// by `#`, re-prompting up to three times.
pub fn gather_destination_digits(call_id: &str, bucket: &str) -> Action {
    Action::PlayAudioAndGetDigits(PlayAudioAndGetDigitsParameters {
        call_id: call_id.to_string(),
        min_number_of_digits: GATHER_MIN_DIGITS,
        max_number_of_digits: GATHER_MAX_DIGITS,
        repeat: GATHER_REPEAT,
        in_between_digits_duration_in_milliseconds: GATHER_INTER_DIGIT_TIMEOUT_MS,
        repeat_duration_in_milliseconds: GATHER_REPEAT_TIMEOUT_MS,
        terminator_digits: vec!["#".to_string()],
        audio_source: AudioSource::s3(bucket, ENTER_NUMBER_AUDIO),
        failure_audio_source: AudioSource::s3(bucket, GATHER_FAILURE_AUDIO),
    })
}

/// Create a new PSTN leg toward `destination` and bridge it to this call.
pub fn call_and_bridge(caller_id: &str, destination: &str) -> Action {
    Action::CallAndBridge(CallAndBridgeParameters {
        call_timeout_seconds: BRIDGE_TIMEOUT_SECONDS,
        caller_id_number: caller_id.to_string(),
        ringback_tone: None,
        endpoints: vec![BridgeEndpoint::pstn(destination)],
    })
}

/// Same as [`call_and_bridge`] but plays a custom ringback tone to the
/// waiting party while the new leg rings.
pub fn call_and_bridge_with_ringback(
    caller_id: &str,
    destination: &str,
    bucket: &str,
    file: &str,
) -> Action {
    Action::CallAndBridge(CallAndBridgeParameters {
        call_timeout_seconds: BRIDGE_TIMEOUT_SECONDS,
        caller_id_number: caller_id.to_string(),
        ringback_tone: Some(AudioSource::s3(bucket, file)),
        endpoints: vec![BridgeEndpoint::pstn(destination)],
    })
}

/// Arm DTMF capture for the recording-control digits on the given leg.
pub fn receive_digits(call_id: &str) -> Action {
    Action::ReceiveDigits(ReceiveDigitsParameters {
        call_id: call_id.to_string(),
        input_digits_regex: RECORDING_CONTROL_DIGITS_REGEX.to_string(),
        in_between_digits_duration_in_milliseconds: RECEIVE_DIGITS_INTER_DIGIT_TIMEOUT_MS,
        flush_digits_duration_in_milliseconds: RECEIVE_DIGITS_FLUSH_TIMEOUT_MS,
    })
}

/// Record both tracks of the call into the recording bucket.
pub fn start_call_recording(call_id: &str, recording_bucket: &str) -> Action {
    Action::StartCallRecording(StartCallRecordingParameters {
        call_id: call_id.to_string(),
        track: "BOTH".to_string(),
        destination: RecordingDestination {
            destination_type: "S3".to_string(),
            location: format!("{}/originalAudio", recording_bucket),
        },
    })
}

pub fn pause_call_recording(call_id: &str) -> Action {
    Action::PauseCallRecording(CallIdParameters {
        call_id: call_id.to_string(),
    })
}

pub fn resume_call_recording(call_id: &str) -> Action {
    Action::ResumeCallRecording(CallIdParameters {
        call_id: call_id.to_string(),
    })
}

pub fn stop_call_recording(call_id: &str) -> Action {
    Action::StopCallRecording(CallIdParameters {
        call_id: call_id.to_string(),
    })
}

pub fn pause(duration_ms: u64) -> Action {
    Action::Pause(PauseParameters {
        duration_in_milliseconds: duration_ms,
    })
}
