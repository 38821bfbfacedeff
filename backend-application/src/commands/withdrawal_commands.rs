use anyhow::anyhow;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{AppError, AppState};
use backend_domain::{
    BankDestination, InitiateWithdrawalRequest, NewWithdrawal, ReserveOutcome, WithdrawalRequest,
};

/// Initiates a payout of ticket-sale earnings. The reservation is taken
/// before the gateway call; if the gateway rejects synchronously the
/// reservation is refunded on the spot so no funds stay stranded. Terminal
/// success/failure is decided by the transfer webhooks, never here.
pub async fn initiate_withdrawal(
    state: &AppState,
    request: InitiateWithdrawalRequest,
) -> Result<WithdrawalRequest, AppError> {
    if request.amount_minor <= 0 {
        return Err(AppError::BadRequest(
            "withdrawal amount must be positive".to_string(),
        ));
    }
    let destination = validate_destination(&request)?;

    let wallet = state
        .wallet_repo
        .find(request.organizer_id, request.event_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no wallet for organizer {} and event {}",
                request.organizer_id, request.event_id
            ))
        })?;

    // Destination validation against the gateway happens before any ledger
    // effect: a bad account number fails the request without touching funds.
    let resolved = state
        .gateway
        .resolve_account(&destination.bank_code, &destination.account_number)
        .await
        .map_err(|err| AppError::Gateway(format!("account verification failed: {err}")))?;
    if !resolved.account_name.trim().is_empty()
        && !names_match(&resolved.account_name, &destination.account_name)
    {
        warn!(
            "account name mismatch for withdrawal: provided '{}', bank reports '{}'",
            destination.account_name, resolved.account_name
        );
    }
    let recipient_code = state
        .gateway
        .create_transfer_recipient(&destination)
        .await
        .map_err(|err| AppError::Gateway(format!("recipient creation failed: {err}")))?;

    match state
        .wallet_repo
        .reserve(wallet.id, request.amount_minor)
        .await
        .map_err(AppError::Internal)?
    {
        ReserveOutcome::Reserved(_) => {}
        ReserveOutcome::InsufficientBalance { available } => {
            return Err(AppError::BadRequest(format!(
                "insufficient balance: {} available, {} requested",
                available, request.amount_minor
            )));
        }
        ReserveOutcome::NotFound => {
            return Err(AppError::NotFound("wallet not found".to_string()));
        }
    }

    let withdrawal = NewWithdrawal {
        id: Uuid::new_v4(),
        wallet_id: wallet.id,
        amount_minor: request.amount_minor,
        destination,
    };
    let created = match state.withdrawal_repo.create(&withdrawal).await {
        Ok(created) => created,
        Err(err) => {
            // The reservation exists but the request row does not; put the
            // funds back before surfacing the failure.
            refund_quietly(state, wallet.id, request.amount_minor).await;
            return Err(AppError::Internal(err));
        }
    };

    let reference = created.id.simple().to_string();
    match state
        .gateway
        .initiate_transfer(
            &recipient_code,
            request.amount_minor,
            &reference,
            "ticket sales payout",
        )
        .await
    {
        Ok(accepted) => {
            state
                .withdrawal_repo
                .mark_processing(created.id, &accepted.transfer_code)
                .await
                .map_err(AppError::Internal)?;
            state.metrics.record_withdrawal_initiated();
            info!(
                "withdrawal {} accepted by gateway as {}",
                created.id, accepted.transfer_code
            );
            state
                .withdrawal_repo
                .find(created.id)
                .await
                .map_err(AppError::Internal)?
                .ok_or_else(|| AppError::Internal(anyhow!("withdrawal vanished after update")))
        }
        Err(err) => {
            state.metrics.record_withdrawal_failure();
            refund_quietly(state, wallet.id, request.amount_minor).await;
            let reason = format!("transfer initiation failed: {err}");
            if let Err(mark_err) = state.withdrawal_repo.mark_failed(created.id, &reason).await {
                error!(
                    "failed to mark withdrawal {} as failed: {}",
                    created.id, mark_err
                );
            }
            Err(AppError::Gateway(reason))
        }
    }
}

async fn refund_quietly(state: &AppState, wallet_id: Uuid, amount_minor: i64) {
    if let Err(err) = state
        .wallet_repo
        .refund_reservation(wallet_id, amount_minor)
        .await
    {
        error!(
            "CRITICAL: failed to refund reservation of {} on wallet {}: {}",
            amount_minor, wallet_id, err
        );
    }
}

fn validate_destination(
    request: &InitiateWithdrawalRequest,
) -> Result<BankDestination, AppError> {
    let bank_code = request.bank_code.trim();
    let account_number = request.account_number.trim();
    let account_name = request.account_name.trim();
    let bank_name = request.bank_name.trim();

    if bank_code.is_empty() {
        return Err(AppError::BadRequest("bank_code must not be empty".to_string()));
    }
    if account_number.is_empty() || !account_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest(
            "account_number must be numeric".to_string(),
        ));
    }
    if account_name.is_empty() {
        return Err(AppError::BadRequest(
            "account_name must not be empty".to_string(),
        ));
    }

    Ok(BankDestination {
        bank_name: bank_name.to_string(),
        bank_code: bank_code.to_string(),
        account_number: account_number.to_string(),
        account_name: account_name.to_string(),
    })
}

fn names_match(left: &str, right: &str) -> bool {
    let canon = |value: &str| {
        value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase()
    };
    canon(left) == canon(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> InitiateWithdrawalRequest {
        InitiateWithdrawalRequest {
            organizer_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            amount_minor: 30_000,
            bank_name: "First Bank".to_string(),
            bank_code: "011".to_string(),
            account_number: "0123456789".to_string(),
            account_name: "Jane Organizer".to_string(),
        }
    }

    #[test]
    fn destination_is_trimmed_and_accepted() {
        let mut req = request();
        req.account_number = " 0123456789 ".to_string();
        let destination = validate_destination(&req).expect("valid destination");
        assert_eq!(destination.account_number, "0123456789");
    }

    #[test]
    fn non_numeric_account_number_is_rejected() {
        let mut req = request();
        req.account_number = "01234A6789".to_string();
        let err = validate_destination(&req).expect_err("reject letters");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn blank_account_name_is_rejected() {
        let mut req = request();
        req.account_name = "  ".to_string();
        assert!(validate_destination(&req).is_err());
    }

    #[test]
    fn name_matching_ignores_case_and_punctuation() {
        assert!(names_match("JANE ORGANIZER", "Jane Organizer"));
        assert!(names_match("JANE-ORGANIZER", "jane organizer"));
        assert!(!names_match("JANE ORGANIZER", "John Organizer"));
    }
}
