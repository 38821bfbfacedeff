use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{AppError, AppState};
use backend_domain::services::codes;
use backend_domain::value_objects::PaymentStatus;
use backend_domain::{
    IssueBatch, IssueBatchRequest, IssueOutcome, PaymentDraft, Ticket, TicketDraft,
};

const MAX_CODE_ATTEMPTS: usize = 5;

/// Paid issuance: the caller supplies the gateway charge reference and the
/// per-line price agreed at purchase time. The payment row is written as
/// pending; the charge webhook settles it.
pub async fn issue_paid_batch(
    state: &AppState,
    request: IssueBatchRequest,
) -> Result<Vec<Ticket>, AppError> {
    let reference = request
        .payment_reference
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| AppError::BadRequest("payment_reference is required".to_string()))?;
    issue_batch(state, request, reference, PaymentStatus::Pending, false).await
}

/// Free issuance follows the identical path with every price forced to zero
/// and the payment completed immediately under an internal reference. It
/// still consumes inventory with the same all-or-nothing guarantee.
pub async fn issue_free_batch(
    state: &AppState,
    request: IssueBatchRequest,
) -> Result<Vec<Ticket>, AppError> {
    let reference = format!("free_{}", Uuid::new_v4().simple());
    issue_batch(state, request, reference, PaymentStatus::Successful, true).await
}

async fn issue_batch(
    state: &AppState,
    request: IssueBatchRequest,
    reference: String,
    payment_status: PaymentStatus,
    force_zero_price: bool,
) -> Result<Vec<Ticket>, AppError> {
    validate_batch(&request)?;

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let batch = prepare_batch(&request, &reference, payment_status, force_zero_price);
        let outcome = state
            .ticket_repo
            .issue_batch(&batch)
            .await
            .map_err(AppError::Internal)?;
        match outcome {
            IssueOutcome::Issued(tickets) => {
                state.metrics.record_tickets_issued(tickets.len());
                info!(
                    "issued {} tickets for event {} (reference {})",
                    tickets.len(),
                    request.event_id,
                    reference
                );
                return Ok(tickets);
            }
            IssueOutcome::DuplicateCode => {
                warn!(
                    "ticket code collision on attempt {}/{}, regenerating",
                    attempt, MAX_CODE_ATTEMPTS
                );
                continue;
            }
            rejected => {
                state.metrics.record_issuance_rejection();
                return Err(map_rejection(rejected));
            }
        }
    }

    Err(AppError::Internal(anyhow!(
        "ticket code generation exhausted after {} attempts",
        MAX_CODE_ATTEMPTS
    )))
}

fn validate_batch(request: &IssueBatchRequest) -> Result<(), AppError> {
    if request.lines.is_empty() {
        return Err(AppError::BadRequest(
            "issuance batch must contain at least one ticket".to_string(),
        ));
    }
    for (idx, line) in request.lines.iter().enumerate() {
        if line.price_minor < 0 {
            return Err(AppError::BadRequest(format!(
                "line {}: price must not be negative",
                idx
            )));
        }
        let has_guest = line
            .guest_name
            .as_deref()
            .map(str::trim)
            .is_some_and(|name| !name.is_empty());
        if line.owner_user_id.is_none() && !has_guest {
            return Err(AppError::BadRequest(format!(
                "line {}: a user id or guest name is required",
                idx
            )));
        }
    }
    Ok(())
}

fn prepare_batch(
    request: &IssueBatchRequest,
    reference: &str,
    payment_status: PaymentStatus,
    force_zero_price: bool,
) -> IssueBatch {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();

    let tickets: Vec<TicketDraft> = request
        .lines
        .iter()
        .map(|line| TicketDraft {
            id: Uuid::new_v4(),
            ticket_number: codes::ticket_number(today, &mut rng),
            qr_payload: codes::qr_payload(&mut rng),
            event_id: request.event_id,
            ticket_type_id: line.ticket_type_id,
            owner_user_id: line.owner_user_id,
            guest_name: normalize_optional(&line.guest_name),
            guest_email: normalize_optional(&line.guest_email),
            price_minor: if force_zero_price { 0 } else { line.price_minor },
            form_responses: line.form_responses.clone(),
        })
        .collect();

    let amount_minor = tickets.iter().map(|ticket| ticket.price_minor).sum();

    IssueBatch {
        event_id: request.event_id,
        payment: PaymentDraft {
            id: Uuid::new_v4(),
            reference: reference.to_string(),
            event_id: request.event_id,
            organizer_id: request.organizer_id,
            amount_minor,
            status: payment_status,
        },
        tickets,
    }
}

fn normalize_optional(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(ToString::to_string)
}

fn map_rejection(outcome: IssueOutcome) -> AppError {
    match outcome {
        IssueOutcome::UnknownType(id) => AppError::NotFound(format!("ticket type {} not found", id)),
        IssueOutcome::InactiveType(id) => {
            AppError::BadRequest(format!("ticket type {} is no longer available", id))
        }
        IssueOutcome::WrongEvent(id) => AppError::BadRequest(format!(
            "ticket type {} does not belong to the requested event",
            id
        )),
        IssueOutcome::SoldOut {
            ticket_type_id,
            requested,
            available,
        } => AppError::BadRequest(format!(
            "ticket type {} has {} left, {} requested",
            ticket_type_id, available, requested
        )),
        IssueOutcome::PerUserLimitExceeded {
            ticket_type_id,
            limit,
        } => AppError::BadRequest(format!(
            "purchase limit of {} per user reached for ticket type {}",
            limit, ticket_type_id
        )),
        IssueOutcome::DuplicateReference(reference) => {
            AppError::Conflict(format!("payment reference '{}' already used", reference))
        }
        IssueOutcome::DuplicateCode | IssueOutcome::Issued(_) => {
            AppError::Internal(anyhow!("unexpected issuance outcome"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::IssueLine;

    fn line(price: i64) -> IssueLine {
        IssueLine {
            ticket_type_id: Uuid::new_v4(),
            owner_user_id: Some(Uuid::new_v4()),
            guest_name: None,
            guest_email: None,
            price_minor: price,
            form_responses: None,
        }
    }

    fn request(lines: Vec<IssueLine>) -> IssueBatchRequest {
        IssueBatchRequest {
            event_id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            payment_reference: Some("ref_1".to_string()),
            lines,
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        let err = validate_batch(&request(Vec::new())).expect_err("empty batch");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn line_without_buyer_is_rejected() {
        let mut bad = line(1000);
        bad.owner_user_id = None;
        bad.guest_name = Some("  ".to_string());
        let err = validate_batch(&request(vec![bad])).expect_err("no buyer");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = validate_batch(&request(vec![line(-1)])).expect_err("negative price");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn prepared_batch_snapshots_prices_and_sums_the_payment() {
        let req = request(vec![line(5_000), line(7_500)]);
        let batch = prepare_batch(&req, "ref_1", PaymentStatus::Pending, false);
        assert_eq!(batch.tickets.len(), 2);
        assert_eq!(batch.payment.amount_minor, 12_500);
        assert_eq!(batch.payment.status, PaymentStatus::Pending);
        assert!(batch
            .tickets
            .iter()
            .all(|t| !t.ticket_number.is_empty() && t.qr_payload.len() == 64));
    }

    #[test]
    fn free_batch_forces_zero_prices_and_completed_payment() {
        let req = request(vec![line(5_000)]);
        let batch = prepare_batch(&req, "free_abc", PaymentStatus::Successful, true);
        assert_eq!(batch.tickets[0].price_minor, 0);
        assert_eq!(batch.payment.amount_minor, 0);
        assert_eq!(batch.payment.status, PaymentStatus::Successful);
    }

    #[test]
    fn generated_codes_differ_across_lines() {
        let req = request(vec![line(0), line(0), line(0)]);
        let batch = prepare_batch(&req, "ref_1", PaymentStatus::Pending, false);
        let mut numbers: Vec<&str> =
            batch.tickets.iter().map(|t| t.ticket_number.as_str()).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), 3);
    }
}
