// Gateway webhook envelope and dispatch
// Event types are a closed enum; types we do not act on are acknowledged
// and ignored so new gateway event types never cause retry storms.

use serde::Deserialize;
use thiserror::Error;

use crate::entities::wallet::AdminWallet;

pub const CHARGE_SUCCESS: &str = "charge.success";
pub const TRANSFER_SUCCESS: &str = "transfer.success";
pub const TRANSFER_FAILED: &str = "transfer.failed";
pub const TRANSFER_REVERSED: &str = "transfer.reversed";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid webhook body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("event '{event}' is missing field '{field}'")]
    MissingField {
        event: String,
        field: &'static str,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl GatewayEnvelope {
    pub fn parse(body: &[u8]) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_slice(body)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    ChargeSuccess {
        reference: String,
        amount_minor: Option<i64>,
    },
    TransferSuccess {
        transfer_code: String,
    },
    TransferFailed {
        transfer_code: String,
        reason: Option<String>,
    },
    Unhandled {
        event: String,
    },
}

impl GatewayEvent {
    pub fn from_envelope(envelope: &GatewayEnvelope) -> Result<Self, EnvelopeError> {
        let data = &envelope.data;
        match envelope.event.as_str() {
            CHARGE_SUCCESS => Ok(Self::ChargeSuccess {
                reference: require_str(&envelope.event, data, "reference")?,
                amount_minor: data.get("amount").and_then(serde_json::Value::as_i64),
            }),
            TRANSFER_SUCCESS => Ok(Self::TransferSuccess {
                transfer_code: require_str(&envelope.event, data, "transfer_code")?,
            }),
            TRANSFER_FAILED | TRANSFER_REVERSED => Ok(Self::TransferFailed {
                transfer_code: require_str(&envelope.event, data, "transfer_code")?,
                reason: data
                    .get("failure_reason")
                    .or_else(|| data.get("reason"))
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string),
            }),
            other => Ok(Self::Unhandled {
                event: other.to_string(),
            }),
        }
    }
}

fn require_str(
    event: &str,
    data: &serde_json::Value,
    field: &'static str,
) -> Result<String, EnvelopeError> {
    data.get(field)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| EnvelopeError::MissingField {
            event: event.to_string(),
            field,
        })
}

/// Result of applying one webhook delivery. Replays resolve to
/// `AlreadyApplied` with no ledger effect. `reserved_minor` is the sum of
/// in-flight withdrawal reservations against the wallet at commit time,
/// reported so callers can check the ledger invariant.
#[derive(Debug)]
pub enum WebhookOutcome {
    Applied {
        wallet: AdminWallet,
        reserved_minor: i64,
    },
    AlreadyApplied,
    UnknownReference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> GatewayEnvelope {
        GatewayEnvelope::parse(body.as_bytes()).expect("parse envelope")
    }

    #[test]
    fn charge_success_carries_reference_and_amount() {
        let env = envelope(r#"{"event":"charge.success","data":{"reference":"ref_123","amount":50000}}"#);
        let event = GatewayEvent::from_envelope(&env).expect("dispatch");
        assert_eq!(
            event,
            GatewayEvent::ChargeSuccess {
                reference: "ref_123".to_string(),
                amount_minor: Some(50_000),
            }
        );
    }

    #[test]
    fn charge_success_without_reference_is_rejected() {
        let env = envelope(r#"{"event":"charge.success","data":{"amount":50000}}"#);
        let err = GatewayEvent::from_envelope(&env).expect_err("missing reference");
        match err {
            EnvelopeError::MissingField { field, .. } => assert_eq!(field, "reference"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn transfer_failed_prefers_failure_reason() {
        let env = envelope(
            r#"{"event":"transfer.failed","data":{"transfer_code":"TRF_1","failure_reason":"account closed","reason":"payout"}}"#,
        );
        let event = GatewayEvent::from_envelope(&env).expect("dispatch");
        assert_eq!(
            event,
            GatewayEvent::TransferFailed {
                transfer_code: "TRF_1".to_string(),
                reason: Some("account closed".to_string()),
            }
        );
    }

    #[test]
    fn transfer_reversed_maps_to_failed() {
        let env = envelope(r#"{"event":"transfer.reversed","data":{"transfer_code":"TRF_2"}}"#);
        let event = GatewayEvent::from_envelope(&env).expect("dispatch");
        assert_eq!(
            event,
            GatewayEvent::TransferFailed {
                transfer_code: "TRF_2".to_string(),
                reason: None,
            }
        );
    }

    #[test]
    fn unknown_event_types_are_unhandled_not_errors() {
        let env = envelope(r#"{"event":"subscription.create","data":{}}"#);
        let event = GatewayEvent::from_envelope(&env).expect("dispatch");
        assert_eq!(
            event,
            GatewayEvent::Unhandled {
                event: "subscription.create".to_string(),
            }
        );
    }

    #[test]
    fn missing_data_object_still_dispatches_unhandled() {
        let env = envelope(r#"{"event":"ping"}"#);
        let event = GatewayEvent::from_envelope(&env).expect("dispatch");
        assert!(matches!(event, GatewayEvent::Unhandled { .. }));
    }
}
