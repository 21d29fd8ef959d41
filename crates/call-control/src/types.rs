//! Core types shared across the call-control crate.
//!
//! These model the control plane's view of a call: the per-leg participant
//! records delivered with every event, the conversation-scoped transaction id,
//! and the call direction computed at inception.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a call, computed once when the call is first seen.
///
/// A call whose originating number is the configured source phone is
/// `Outbound` (the operator dialing out through the system); anything else
/// is `Inbound`.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    /// Classify a call by its originating number.
    pub fn of(from: &str, source_phone: &str) -> Self {
        if from == source_phone {
            Direction::Outbound
        } else {
            Direction::Inbound
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => write!(f, "Inbound"),
            Direction::Outbound => write!(f, "Outbound"),
        }
    }
}

/// Connection status of a single leg as reported by the control plane.
///
/// Statuses we do not recognize deserialize to `Unknown`; teardown logic only
/// ever acts on legs it can positively see as `Connected`.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    #[serde(other)]
    Unknown,
}

/// One SIP leg of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Participant {
    pub call_id: String,
    pub from: String,
    pub to: String,
    pub status: ConnectionStatus,
}

impl Participant {
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// Participant tag addressing one side of a bridged call in a leg-scoped
/// action, without naming a call id.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ParticipantTag {
    #[serde(rename = "LEG-A")]
    LegA,
    #[serde(rename = "LEG-B")]
    LegB,
}

/// The call-level details delivered with every event: the stable transaction
/// id and the current participant list. `participants[0]` is always the
/// originally-received leg; `participants[1]` exists once the call is bridged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallDetails {
    pub transaction_id: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl CallDetails {
    /// The originally-received leg, if any.
    pub fn leg_a(&self) -> Option<&Participant> {
        self.participants.first()
    }

    /// The bridged leg, present only after a CallAndBridge has created it.
    pub fn leg_b(&self) -> Option<&Participant> {
        self.participants.get(1)
    }
}
