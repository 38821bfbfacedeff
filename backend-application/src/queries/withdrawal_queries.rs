use tracing::error;
use uuid::Uuid;

use crate::{AppError, AppState};
use backend_domain::WithdrawalRequest;

pub async fn get_withdrawal(state: &AppState, id: Uuid) -> Result<WithdrawalRequest, AppError> {
    state
        .withdrawal_repo
        .find(id)
        .await
        .map_err(|err| {
            error!("failed to fetch withdrawal {}: {}", id, err);
            AppError::Internal(err)
        })?
        .ok_or_else(|| AppError::NotFound(format!("withdrawal {} not found", id)))
}
