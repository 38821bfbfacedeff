use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use uuid::Uuid;

use backend_application::commands::check_in_commands;
use backend_application::AppState;
use backend_domain::Ticket;

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(serde::Deserialize)]
pub struct ScanCheckInPayload {
    pub qr_payload: String,
    pub operator_id: Uuid,
    pub notes: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct ManualCheckInPayload {
    pub ticket_number: String,
    pub operator_id: Uuid,
    pub notes: Option<String>,
}

pub async fn check_in_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ScanCheckInPayload>,
) -> Result<Json<Ticket>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let ticket = check_in_commands::check_in_by_payload(
        &state,
        payload.qr_payload,
        payload.operator_id,
        payload.notes,
    )
    .await?;
    Ok(Json(ticket))
}

pub async fn check_in_manual(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ManualCheckInPayload>,
) -> Result<Json<Ticket>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let ticket = check_in_commands::check_in_by_number(
        &state,
        payload.ticket_number,
        payload.operator_id,
        payload.notes,
    )
    .await?;
    Ok(Json(ticket))
}
