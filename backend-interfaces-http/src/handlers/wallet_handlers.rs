use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use uuid::Uuid;

use backend_application::commands::withdrawal_commands;
use backend_application::queries::{wallet_queries, withdrawal_queries};
use backend_application::AppState;
use backend_domain::{AdminWallet, InitiateWithdrawalRequest, WithdrawalRequest};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((organizer_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AdminWallet>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let wallet = wallet_queries::get_wallet(&state, organizer_id, event_id).await?;
    Ok(Json(wallet))
}

pub async fn initiate_withdrawal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<InitiateWithdrawalRequest>,
) -> Result<Json<WithdrawalRequest>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let withdrawal = withdrawal_commands::initiate_withdrawal(&state, payload).await?;
    Ok(Json(withdrawal))
}

pub async fn get_withdrawal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<WithdrawalRequest>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let withdrawal = withdrawal_queries::get_withdrawal(&state, id).await?;
    Ok(Json(withdrawal))
}
