//! The call-control state machine.
//!
//! One invocation processes exactly one event for one call and returns a
//! complete, self-consistent action list. No decision state is held across
//! invocations: direction and leg targeting are re-derived from the event's
//! own participant data every time, and durability lives in the external
//! call-record store. Dispatch is total over the event type enumeration —
//! an event we cannot interpret resolves to the fail-safe termination
//! sequence rather than leaving the call connected with nothing pending.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::actions::{self, SipResponseCode, SmaResponse};
use crate::actions::{
    CONNECTING_AUDIO, RECORDING_NOTICE_AUDIO, RECORDING_PAUSED_AUDIO, RECORDING_RESUMED_AUDIO,
    RECORDING_STOPPED_AUDIO, UNABLE_TO_CONNECT_AUDIO,
};
use crate::config::CallControlConfig;
use crate::events::{CompletedActionType, InvocationEventType, SipMediaEvent};
use crate::records::{AnswerUpdate, CallRecordStore, RecordStoreError};
use crate::types::{Direction, Participant, ParticipantTag};

/// Per-invocation context threaded through the handlers, in place of any
/// global logging state.
#[derive(Debug, Clone, Copy)]
struct EventContext<'a> {
    call_id: &'a str,
    transaction_id: &'a str,
    direction: Direction,
}

/// Decides the next telephony actions for each call-lifecycle event.
pub struct CallControlMachine {
    config: Arc<CallControlConfig>,
    records: Arc<dyn CallRecordStore>,
}

impl CallControlMachine {
    pub fn new(config: Arc<CallControlConfig>, records: Arc<dyn CallRecordStore>) -> Self {
        Self { config, records }
    }

    /// Handle one event and return the response to hand back to the control
    /// plane. Never fails: malformed input degrades to the fail-safe
    /// sequence, and persistence problems are logged and swallowed.
    pub async fn handle(&self, event: &SipMediaEvent) -> SmaResponse {
        let Some(leg_a) = event.leg_a() else {
            // Nothing to act on and no leg to tear down.
            warn!(
                event_type = ?event.invocation_event_type,
                transaction_id = event.transaction_id(),
                "event carried no participants"
            );
            return SmaResponse::none();
        };

        let ctx = EventContext {
            call_id: &leg_a.call_id,
            transaction_id: event.transaction_id(),
            direction: Direction::of(&leg_a.from, &self.config.source_phone),
        };
        info!(
            call_id = ctx.call_id,
            event_type = ?event.invocation_event_type,
            direction = %ctx.direction,
            "received invocation"
        );

        match event.invocation_event_type {
            InvocationEventType::NewInboundCall => self.on_new_call(&ctx, leg_a),
            InvocationEventType::Ringing => SmaResponse::none(),
            InvocationEventType::Hangup => self.on_hangup(&ctx, event).await,
            InvocationEventType::DigitsReceived => self.on_digits_received(&ctx, event),
            InvocationEventType::ActionSuccessful => self.on_action_success(&ctx, event).await,
            InvocationEventType::ActionFailed => {
                let data = event.action_data.as_ref();
                error!(
                    call_id = ctx.call_id,
                    error_type = data.and_then(|d| d.error_type.as_deref()),
                    error_message = data.and_then(|d| d.error_message.as_deref()),
                    "action failed"
                );
                self.unable_to_connect(&ctx)
            }
            InvocationEventType::InvalidLambdaResponse => {
                error!(
                    call_id = ctx.call_id,
                    error_type = event.error_type.as_deref(),
                    error_message = event.error_message.as_deref(),
                    "control plane rejected previous response"
                );
                self.unable_to_connect(&ctx)
            }
            InvocationEventType::Unhandled => {
                error!(call_id = ctx.call_id, "unhandled event type");
                self.unable_to_connect(&ctx)
            }
        }
    }

    /// First event of a call. Outbound calls (from the source phone) are
    /// prompted for a destination; inbound calls are bridged straight to the
    /// source phone with digit capture armed before the bridge completes.
    fn on_new_call(&self, ctx: &EventContext<'_>, leg_a: &Participant) -> SmaResponse {
        let wav = &self.config.wav_bucket;
        match ctx.direction {
            Direction::Outbound => {
                info!(
                    call_id = ctx.call_id,
                    "call from source phone, gathering destination digits"
                );
                SmaResponse::of(vec![actions::gather_destination_digits(ctx.call_id, wav)])
            }
            Direction::Inbound => {
                info!(
                    call_id = ctx.call_id,
                    "call from external number, bridging to source phone"
                );
                SmaResponse::of(vec![
                    actions::play_audio(ctx.call_id, wav, RECORDING_NOTICE_AUDIO),
                    actions::play_audio_on_leg(ParticipantTag::LegA, wav, CONNECTING_AUDIO),
                    actions::call_and_bridge(&leg_a.from, &self.config.source_phone),
                    actions::receive_digits(ctx.call_id),
                ])
            }
        }
    }

    /// Tear down at most one still-connected leg per event; the control
    /// plane delivers a fresh HANGUP per remaining leg. Only once no leg is
    /// left connected does the end time get written.
    async fn on_hangup(&self, ctx: &EventContext<'_>, event: &SipMediaEvent) -> SmaResponse {
        for participant in &event.call_details.participants {
            if participant.is_connected() {
                info!(
                    call_id = ctx.call_id,
                    hangup_target = %participant.call_id,
                    "disconnecting remaining leg"
                );
                return SmaResponse::of(vec![actions::hangup(
                    &participant.call_id,
                    SipResponseCode::Terminated,
                )]);
            }
        }

        info!(call_id = ctx.call_id, "all legs hung up");
        self.swallow(
            ctx,
            self.records
                .update_on_hangup(ctx.transaction_id, Utc::now())
                .await,
        );
        SmaResponse::none()
    }

    /// DTMF recording control, reachable only once both legs exist.
    ///
    /// Recording control always targets leg A's call id, while digit capture
    /// is re-armed on the "primary" leg: leg B for outbound calls, leg A for
    /// inbound. For outbound calls these legs differ.
    fn on_digits_received(&self, ctx: &EventContext<'_>, event: &SipMediaEvent) -> SmaResponse {
        let Some(leg_b) = event.leg_b() else {
            error!(
                call_id = ctx.call_id,
                "digits received without a bridged leg"
            );
            return self.unable_to_connect(ctx);
        };
        let primary_call_id = match ctx.direction {
            Direction::Outbound => leg_b.call_id.as_str(),
            Direction::Inbound => ctx.call_id,
        };
        let digits = event.received_digits().unwrap_or("");
        info!(call_id = ctx.call_id, digits, "digits received");

        let (notice, control) = match digits {
            "5" => (
                RECORDING_PAUSED_AUDIO,
                actions::pause_call_recording(ctx.call_id),
            ),
            "6" => (
                RECORDING_RESUMED_AUDIO,
                actions::resume_call_recording(ctx.call_id),
            ),
            "7" => (
                RECORDING_STOPPED_AUDIO,
                actions::stop_call_recording(ctx.call_id),
            ),
            other => {
                debug!(call_id = ctx.call_id, digits = other, "ignoring digits");
                return SmaResponse::none();
            }
        };

        let wav = &self.config.wav_bucket;
        SmaResponse::of(vec![
            actions::play_audio_on_leg(ParticipantTag::LegA, wav, notice),
            actions::play_audio_on_leg(ParticipantTag::LegB, wav, notice),
            control,
            actions::receive_digits(primary_call_id),
        ])
    }

    /// A previously issued action completed; a few completions require
    /// follow-up, the rest are no-ops.
    async fn on_action_success(
        &self,
        ctx: &EventContext<'_>,
        event: &SipMediaEvent,
    ) -> SmaResponse {
        let Some(data) = event.action_data.as_ref() else {
            warn!(call_id = ctx.call_id, "action success without action data");
            return SmaResponse::none();
        };

        match data.action_type {
            CompletedActionType::Answer | CompletedActionType::Hangup => SmaResponse::none(),

            CompletedActionType::PlayAudioAndGetDigits => {
                let Some(digits) = data.received_digits.as_deref() else {
                    error!(call_id = ctx.call_id, "destination gather returned no digits");
                    return self.unable_to_connect(ctx);
                };
                let destination = format!("+1{}", digits);
                info!(
                    call_id = ctx.call_id,
                    destination, "destination gathered, bridging"
                );
                SmaResponse::of(vec![
                    actions::play_audio_on_leg(
                        ParticipantTag::LegA,
                        &self.config.wav_bucket,
                        CONNECTING_AUDIO,
                    ),
                    actions::call_and_bridge(&self.config.source_phone, &destination),
                ])
            }

            CompletedActionType::CallAndBridge => self.on_bridge_answered(ctx, event).await,

            _ => SmaResponse::none(),
        }
    }

    /// The far end answered the bridge: persist the answer fields, then
    /// start recording and arm digit capture. Recording begins here, not at
    /// bridge initiation, so both parties are live when it starts.
    async fn on_bridge_answered(
        &self,
        ctx: &EventContext<'_>,
        event: &SipMediaEvent,
    ) -> SmaResponse {
        let Some(leg_a) = event.leg_a() else {
            return SmaResponse::none();
        };
        let Some(leg_b) = event.leg_b() else {
            error!(call_id = ctx.call_id, "bridge answered without a second leg");
            return self.unable_to_connect(ctx);
        };

        info!(call_id = ctx.call_id, "call answered, starting recording");
        self.swallow(
            ctx,
            self.records
                .update_on_answer(
                    ctx.transaction_id,
                    AnswerUpdate {
                        direction: ctx.direction,
                        caller: leg_a.from.clone(),
                        callee: leg_a.to.clone(),
                        start_time: Utc::now(),
                    },
                )
                .await,
        );

        let wav = &self.config.wav_bucket;
        let recording = &self.config.recording_bucket;
        match ctx.direction {
            Direction::Outbound => SmaResponse::of(vec![
                actions::play_audio(&leg_a.call_id, wav, RECORDING_NOTICE_AUDIO),
                actions::start_call_recording(&leg_b.call_id, recording),
                actions::receive_digits(&leg_b.call_id),
            ]),
            Direction::Inbound => SmaResponse::of(vec![
                actions::start_call_recording(&leg_a.call_id, recording),
                actions::receive_digits(&leg_a.call_id),
            ]),
        }
    }

    /// Fail-safe: apologize and disconnect. Issued for every upstream
    /// failure or uninterpretable event, so the call is never left connected
    /// with no pending action.
    fn unable_to_connect(&self, ctx: &EventContext<'_>) -> SmaResponse {
        SmaResponse::of(vec![
            actions::play_audio(ctx.call_id, &self.config.wav_bucket, UNABLE_TO_CONNECT_AUDIO),
            actions::hangup(ctx.call_id, SipResponseCode::Terminated),
        ])
    }

    /// Persistence is best-effort: failures never change the decision.
    fn swallow(&self, ctx: &EventContext<'_>, result: Result<(), RecordStoreError>) {
        if let Err(err) = result {
            warn!(
                call_id = ctx.call_id,
                transaction_id = ctx.transaction_id,
                error = %err,
                "call record update failed, continuing"
            );
        }
    }
}
