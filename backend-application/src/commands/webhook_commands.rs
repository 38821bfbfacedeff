use hmac::{Hmac, Mac};
use sha2::Sha512;
use tracing::{debug, info, warn};

use crate::{AppError, AppState};
use backend_domain::{GatewayEnvelope, GatewayEvent, WebhookOutcome};

type HmacSha512 = Hmac<Sha512>;

pub const SIGNATURE_HEADER: &str = "x-gateway-signature";

/// Applies one gateway callback. Replays are a normal operating condition:
/// every dispatch path resolves duplicates to a no-op acknowledgement.
/// Internal errors bubble up as 500 so the gateway retries the delivery.
pub async fn process_webhook(
    state: &AppState,
    signature: Option<&str>,
    body: &[u8],
) -> Result<(), AppError> {
    state.metrics.record_webhook_received();

    let secret = state
        .config
        .gateway_secret_key
        .as_deref()
        .filter(|value| !value.trim().is_empty());
    let Some(secret) = secret else {
        warn!("webhook received but no gateway secret is configured");
        state.metrics.record_webhook_rejection();
        return Err(AppError::Unauthorized);
    };
    let verified = signature
        .map(|sig| verify_signature(secret, body, sig))
        .unwrap_or(false);
    if !verified {
        state.metrics.record_webhook_rejection();
        return Err(AppError::Unauthorized);
    }

    let envelope =
        GatewayEnvelope::parse(body).map_err(|err| AppError::BadRequest(err.to_string()))?;
    let event = GatewayEvent::from_envelope(&envelope)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    match event {
        GatewayEvent::ChargeSuccess {
            reference,
            amount_minor,
        } => {
            let outcome = state
                .settlement_repo
                .apply_charge_success(&reference, amount_minor, &envelope.data)
                .await
                .map_err(AppError::Internal)?;
            settle(state, &envelope.event, &reference, outcome);
            Ok(())
        }
        GatewayEvent::TransferSuccess { transfer_code } => {
            let outcome = state
                .settlement_repo
                .apply_transfer_success(&transfer_code, &envelope.data)
                .await
                .map_err(AppError::Internal)?;
            settle(state, &envelope.event, &transfer_code, outcome);
            Ok(())
        }
        GatewayEvent::TransferFailed {
            transfer_code,
            reason,
        } => {
            let outcome = state
                .settlement_repo
                .apply_transfer_failure(&transfer_code, reason.as_deref(), &envelope.data)
                .await
                .map_err(AppError::Internal)?;
            settle(state, &envelope.event, &transfer_code, outcome);
            Ok(())
        }
        GatewayEvent::Unhandled { event } => {
            debug!("ignoring unhandled gateway event '{}'", event);
            Ok(())
        }
    }
}

fn settle(state: &AppState, event: &str, reference: &str, outcome: WebhookOutcome) {
    match outcome {
        WebhookOutcome::Applied {
            wallet,
            reserved_minor,
        } => {
            state.metrics.record_webhook_applied();
            info!("applied {} for reference {}", event, reference);
            if !wallet.is_consistent(reserved_minor) {
                warn!(
                    "wallet {} ledger imbalance after {}: earnings={} available={} withdrawn={} reserved={}",
                    wallet.id,
                    event,
                    wallet.total_earnings_minor,
                    wallet.available_balance_minor,
                    wallet.withdrawn_minor,
                    reserved_minor
                );
            }
        }
        WebhookOutcome::AlreadyApplied => {
            state.metrics.record_webhook_replay();
            debug!("replayed {} for reference {}, no-op", event, reference);
        }
        WebhookOutcome::UnknownReference(unknown) => {
            warn!("{} references unknown '{}', acknowledged", event, unknown);
        }
    }
}

/// Constant-time verification of the hex HMAC-SHA512 digest the gateway
/// sends over the raw request body.
pub fn verify_signature(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Some(signature) = decode_hex(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.is_empty() || value.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(value.len() / 2);
    let bytes = value.as_bytes();
    for pair in bytes.chunks_exact(2) {
        let high = hex_digit(pair[0])?;
        let low = hex_digit(pair[1])?;
        out.push((high << 4) | low);
    }
    Some(out)
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).expect("hmac init");
        mac.update(body);
        let digest = mac.finalize().into_bytes();
        let mut out = String::with_capacity(digest.len() * 2);
        for byte in digest {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }

    #[test]
    fn valid_signature_verifies() {
        let body = br#"{"event":"charge.success","data":{"reference":"ref_1"}}"#;
        let signature = sign("secret", body);
        assert!(verify_signature("secret", body, &signature));
    }

    #[test]
    fn uppercase_hex_signature_verifies() {
        let body = b"payload";
        let signature = sign("secret", body).to_uppercase();
        assert!(verify_signature("secret", body, &signature));
    }

    #[test]
    fn tampered_body_fails_verification() {
        let signature = sign("secret", b"original");
        assert!(!verify_signature("secret", b"tampered", &signature));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let body = b"payload";
        let signature = sign("secret", body);
        assert!(!verify_signature("other-secret", body, &signature));
    }

    #[test]
    fn malformed_hex_fails_verification() {
        assert!(!verify_signature("secret", b"payload", "zz"));
        assert!(!verify_signature("secret", b"payload", "abc"));
        assert!(!verify_signature("secret", b"payload", ""));
    }

    #[test]
    fn decode_hex_round_trip() {
        assert_eq!(decode_hex("00ff10"), Some(vec![0x00, 0xff, 0x10]));
        assert_eq!(decode_hex("DEADBEEF"), Some(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(decode_hex("0g"), None);
    }
}
