use tracing::error;

use crate::{AppError, AppState};
use backend_domain::Ticket;

pub async fn get_ticket(state: &AppState, ticket_number: &str) -> Result<Ticket, AppError> {
    let number = ticket_number.trim().to_uppercase();
    if number.is_empty() {
        return Err(AppError::BadRequest(
            "ticket_number must not be empty".to_string(),
        ));
    }
    state
        .ticket_repo
        .find_by_number(&number)
        .await
        .map_err(|err| {
            error!("failed to fetch ticket {}: {}", number, err);
            AppError::Internal(err)
        })?
        .ok_or_else(|| AppError::NotFound(format!("ticket {} not found", number)))
}
