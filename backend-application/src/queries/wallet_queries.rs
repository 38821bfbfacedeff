use tracing::error;
use uuid::Uuid;

use crate::{AppError, AppState};
use backend_domain::AdminWallet;

pub async fn get_wallet(
    state: &AppState,
    organizer_id: Uuid,
    event_id: Uuid,
) -> Result<AdminWallet, AppError> {
    state
        .wallet_repo
        .find(organizer_id, event_id)
        .await
        .map_err(|err| {
            error!(
                "failed to fetch wallet for organizer {} event {}: {}",
                organizer_id, event_id, err
            );
            AppError::Internal(err)
        })?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no wallet for organizer {} and event {}",
                organizer_id, event_id
            ))
        })
}
