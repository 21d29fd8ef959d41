//! Inbound event model.
//!
//! Every invocation of the state machine is driven by one `SipMediaEvent`
//! delivered by the telephony control plane. The event carries a discriminant
//! (`InvocationEventType`), the current participant list, and — for events
//! reporting on a previously issued action — an `ActionData` payload.
//!
//! Both discriminants are closed enums with a catch-all variant so that an
//! event type or action type we do not recognize still deserializes and can
//! be routed to the fail-safe branch instead of being dropped.

use serde::{Deserialize, Serialize};

use crate::types::{CallDetails, Participant};

/// Event discriminant as delivered on the wire.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvocationEventType {
    NewInboundCall,
    Ringing,
    DigitsReceived,
    ActionSuccessful,
    ActionFailed,
    Hangup,
    InvalidLambdaResponse,
    /// Any event type we do not recognize. Never silently dropped; the
    /// dispatcher resolves it to the fail-safe termination sequence.
    #[serde(other)]
    Unhandled,
}

/// The action type reported inside `ActionData` for completion/failure
/// events.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CompletedActionType {
    Answer,
    Hangup,
    PlayAudio,
    PlayAudioAndGetDigits,
    CallAndBridge,
    ReceiveDigits,
    StartCallRecording,
    PauseCallRecording,
    ResumeCallRecording,
    StopCallRecording,
    Pause,
    #[serde(other)]
    Other,
}

/// Payload attached to DIGITS_RECEIVED, ACTION_SUCCESSFUL and ACTION_FAILED
/// events: which action this is about, plus its results or failure details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionData {
    #[serde(rename = "Type")]
    pub action_type: CompletedActionType,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub received_digits: Option<String>,
}

/// One call-lifecycle event from the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SipMediaEvent {
    pub invocation_event_type: InvocationEventType,
    pub call_details: CallDetails,
    #[serde(default)]
    pub action_data: Option<ActionData>,
    // INVALID_LAMBDA_RESPONSE carries its error details at the top level
    // rather than inside ActionData.
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl SipMediaEvent {
    pub fn transaction_id(&self) -> &str {
        &self.call_details.transaction_id
    }

    pub fn leg_a(&self) -> Option<&Participant> {
        self.call_details.leg_a()
    }

    pub fn leg_b(&self) -> Option<&Participant> {
        self.call_details.leg_b()
    }

    /// Digits reported by the active digit-capture action, if any.
    pub fn received_digits(&self) -> Option<&str> {
        self.action_data
            .as_ref()
            .and_then(|data| data.received_digits.as_deref())
    }
}
