//! Wire-format tests: events as the control plane sends them, responses as
//! it expects them back.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use sma_call_control::{
    CallControlConfig, CallControlMachine, CompletedActionType, ConnectionStatus,
    InvocationEventType, MemoryCallRecordStore, SipMediaEvent,
};

fn machine() -> CallControlMachine {
    CallControlMachine::new(
        Arc::new(CallControlConfig::new(
            "+15550100",
            "wav-bucket",
            "recording-bucket",
            "call-records",
        )),
        Arc::new(MemoryCallRecordStore::new()),
    )
}

#[test]
fn new_inbound_call_event_parses_including_extra_fields() {
    let event: SipMediaEvent = serde_json::from_value(json!({
        "SchemaVersion": "1.0",
        "Sequence": 1,
        "InvocationEventType": "NEW_INBOUND_CALL",
        "CallDetails": {
            "TransactionId": "tx-4f5e",
            "AwsAccountId": "111122223333",
            "Participants": [
                {
                    "CallId": "leg-a",
                    "ParticipantTag": "LEG-A",
                    "To": "+15550100",
                    "From": "+15550199",
                    "Direction": "Inbound",
                    "Status": "Connected"
                }
            ]
        }
    }))
    .unwrap();

    assert_eq!(
        event.invocation_event_type,
        InvocationEventType::NewInboundCall
    );
    assert_eq!(event.transaction_id(), "tx-4f5e");
    let leg_a = event.leg_a().unwrap();
    assert_eq!(leg_a.call_id, "leg-a");
    assert_eq!(leg_a.from, "+15550199");
    assert_eq!(leg_a.status, ConnectionStatus::Connected);
    assert!(event.leg_b().is_none());
}

#[test]
fn action_failed_event_carries_error_details_in_action_data() {
    let event: SipMediaEvent = serde_json::from_value(json!({
        "InvocationEventType": "ACTION_FAILED",
        "ActionData": {
            "Type": "CallAndBridge",
            "ErrorType": "CallNotAnswered",
            "ErrorMessage": "The outbound call was not answered",
            "Parameters": {"CallTimeoutSeconds": 30}
        },
        "CallDetails": {
            "TransactionId": "tx-4f5e",
            "Participants": [
                {"CallId": "leg-a", "To": "+15550100", "From": "+15550199", "Status": "Connected"}
            ]
        }
    }))
    .unwrap();

    let data = event.action_data.as_ref().unwrap();
    assert_eq!(data.action_type, CompletedActionType::CallAndBridge);
    assert_eq!(data.error_type.as_deref(), Some("CallNotAnswered"));
    assert_eq!(event.received_digits(), None);
}

#[test]
fn digits_received_event_exposes_the_digits() {
    let event: SipMediaEvent = serde_json::from_value(json!({
        "InvocationEventType": "DIGITS_RECEIVED",
        "ActionData": {"Type": "ReceiveDigits", "ReceivedDigits": "7"},
        "CallDetails": {
            "TransactionId": "tx-4f5e",
            "Participants": [
                {"CallId": "leg-a", "To": "+15550100", "From": "+15550199", "Status": "Connected"},
                {"CallId": "leg-b", "To": "+15550199", "From": "+15550100", "Status": "Connected"}
            ]
        }
    }))
    .unwrap();

    assert_eq!(event.received_digits(), Some("7"));
    assert_eq!(event.leg_b().unwrap().call_id, "leg-b");
}

#[tokio::test]
async fn inbound_new_call_response_serializes_to_the_exact_wire_shape() {
    let event: SipMediaEvent = serde_json::from_value(json!({
        "InvocationEventType": "NEW_INBOUND_CALL",
        "CallDetails": {
            "TransactionId": "tx-4f5e",
            "Participants": [
                {"CallId": "leg-a", "To": "+15550100", "From": "+15550199", "Status": "Connected"}
            ]
        }
    }))
    .unwrap();

    let response = machine().handle(&event).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "SchemaVersion": "1.0",
            "Actions": [
                {
                    "Type": "PlayAudio",
                    "Parameters": {
                        "CallId": "leg-a",
                        "AudioSource": {
                            "Type": "S3",
                            "BucketName": "wav-bucket",
                            "Key": "thisCallIsBeingRecorded.wav"
                        }
                    }
                },
                {
                    "Type": "PlayAudio",
                    "Parameters": {
                        "ParticipantTag": "LEG-A",
                        "AudioSource": {
                            "Type": "S3",
                            "BucketName": "wav-bucket",
                            "Key": "connectingYou.wav"
                        }
                    }
                },
                {
                    "Type": "CallAndBridge",
                    "Parameters": {
                        "CallTimeoutSeconds": 30,
                        "CallerIdNumber": "+15550199",
                        "Endpoints": [
                            {"Uri": "+15550100", "BridgeEndpointType": "PSTN"}
                        ]
                    }
                },
                {
                    "Type": "ReceiveDigits",
                    "Parameters": {
                        "CallId": "leg-a",
                        "InputDigitsRegex": "[5-7]",
                        "InBetweenDigitsDurationInMilliseconds": 1000,
                        "FlushDigitsDurationInMilliseconds": 10000
                    }
                }
            ]
        })
    );
}

#[tokio::test]
async fn unknown_event_type_on_the_wire_still_fails_safe() {
    let event: SipMediaEvent = serde_json::from_value(json!({
        "InvocationEventType": "CALL_UPDATE_REQUESTED",
        "CallDetails": {
            "TransactionId": "tx-4f5e",
            "Participants": [
                {"CallId": "leg-a", "To": "+15550100", "From": "+15550199", "Status": "Connected"}
            ]
        }
    }))
    .unwrap();

    assert_eq!(event.invocation_event_type, InvocationEventType::Unhandled);

    let response = machine().handle(&event).await;
    let value = serde_json::to_value(&response).unwrap();
    let actions = value["Actions"].as_array().unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0]["Type"], json!("PlayAudio"));
    assert_eq!(
        actions[0]["Parameters"]["AudioSource"]["Key"],
        json!("we_were_unable_to_connect_your_call.wav")
    );
    assert_eq!(actions[1]["Type"], json!("Hangup"));
    assert_eq!(actions[1]["Parameters"]["SipResponseCode"], json!("0"));
}

#[tokio::test]
async fn no_op_response_is_still_a_schema_response() {
    let event: SipMediaEvent = serde_json::from_value(json!({
        "InvocationEventType": "RINGING",
        "CallDetails": {
            "TransactionId": "tx-4f5e",
            "Participants": [
                {"CallId": "leg-a", "To": "+15550100", "From": "+15550199", "Status": "Connected"}
            ]
        }
    }))
    .unwrap();

    let response = machine().handle(&event).await;
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"SchemaVersion": "1.0", "Actions": []})
    );
}
