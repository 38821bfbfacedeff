use tracing::info;
use uuid::Uuid;

use crate::{AppError, AppState};
use backend_domain::value_objects::CheckInMethod;
use backend_domain::{CheckInOutcome, CheckInRequest, Ticket, TicketLookup};

pub async fn check_in_by_payload(
    state: &AppState,
    qr_payload: String,
    operator_id: Uuid,
    notes: Option<String>,
) -> Result<Ticket, AppError> {
    let payload = normalize_key(qr_payload, "qr_payload")?;
    check_in(
        state,
        TicketLookup::ByPayload(payload),
        CheckInMethod::Scan,
        operator_id,
        notes,
    )
    .await
}

/// Manual fallback for when scanning is impossible; keyed by the
/// human-legible ticket number.
pub async fn check_in_by_number(
    state: &AppState,
    ticket_number: String,
    operator_id: Uuid,
    notes: Option<String>,
) -> Result<Ticket, AppError> {
    let number = normalize_key(ticket_number, "ticket_number")?.to_uppercase();
    check_in(
        state,
        TicketLookup::ByNumber(number),
        CheckInMethod::Manual,
        operator_id,
        notes,
    )
    .await
}

async fn check_in(
    state: &AppState,
    lookup: TicketLookup,
    method: CheckInMethod,
    operator_id: Uuid,
    notes: Option<String>,
) -> Result<Ticket, AppError> {
    let request = CheckInRequest {
        operator_id,
        method,
        notes: notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
    };
    let outcome = state
        .ticket_repo
        .check_in(&lookup, &request)
        .await
        .map_err(AppError::Internal)?;
    match outcome {
        CheckInOutcome::CheckedIn(ticket) => {
            state.metrics.record_check_in();
            info!(
                "ticket {} checked in by {} ({})",
                ticket.ticket_number,
                operator_id,
                method.as_str()
            );
            Ok(ticket)
        }
        CheckInOutcome::AlreadyCheckedIn(ticket) => {
            state.metrics.record_check_in_conflict();
            Err(AppError::Conflict(format!(
                "ticket {} is already checked in",
                ticket.ticket_number
            )))
        }
        CheckInOutcome::NotFound => Err(AppError::NotFound("ticket not found".to_string())),
    }
}

fn normalize_key(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key_trims_whitespace() {
        let key = normalize_key("  SP-20260806-ABCDEF  ".to_string(), "ticket_number")
            .expect("normalize");
        assert_eq!(key, "SP-20260806-ABCDEF");
    }

    #[test]
    fn normalize_key_rejects_blank_input() {
        let err = normalize_key("   ".to_string(), "qr_payload").expect_err("blank");
        match err {
            AppError::BadRequest(message) => assert!(message.contains("qr_payload")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
