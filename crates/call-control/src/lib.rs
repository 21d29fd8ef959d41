//! Call-control state machine for an on-demand call recording service.
//!
//! The control plane delivers one call-lifecycle event at a time; this crate
//! deterministically turns each event into an ordered list of telephony
//! actions — answering, bridging to the configured source phone, recording
//! both legs, and a DTMF sub-protocol (digits 5/6/7) for pausing, resuming
//! and stopping the recording mid-call. Call metadata is persisted through
//! the [`records::CallRecordStore`] adapter so downstream processing can pick
//! the call up asynchronously.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sma_call_control::{
//!     CallControlConfig, CallControlMachine, MemoryCallRecordStore, SipMediaEvent,
//! };
//!
//! # async fn example(payload: &str) -> anyhow::Result<()> {
//! let config = Arc::new(CallControlConfig::from_env()?);
//! let machine = CallControlMachine::new(config, Arc::new(MemoryCallRecordStore::new()));
//!
//! let event: SipMediaEvent = serde_json::from_str(payload)?;
//! let response = machine.handle(&event).await;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod records;
pub mod state_machine;
pub mod types;

pub use actions::{Action, SipResponseCode, SmaResponse};
pub use config::{CallControlConfig, ConfigError};
pub use errors::CallControlError;
pub use events::{ActionData, CompletedActionType, InvocationEventType, SipMediaEvent};
pub use logging::{setup_logging, LoggingConfig};
pub use records::{AnswerUpdate, CallRecord, CallRecordStore, MemoryCallRecordStore};
pub use state_machine::CallControlMachine;
pub use types::{CallDetails, ConnectionStatus, Direction, Participant, ParticipantTag};
