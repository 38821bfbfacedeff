use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::issuance_commands;
use backend_application::queries::ticket_queries;
use backend_application::AppState;
use backend_domain::{IssueBatchRequest, Ticket};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn issue_tickets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<IssueBatchRequest>,
) -> Result<Json<Vec<Ticket>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let tickets = issuance_commands::issue_paid_batch(&state, payload).await?;
    Ok(Json(tickets))
}

pub async fn issue_free_tickets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<IssueBatchRequest>,
) -> Result<Json<Vec<Ticket>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let tickets = issuance_commands::issue_free_batch(&state, payload).await?;
    Ok(Json(tickets))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ticket_number): Path<String>,
) -> Result<Json<Ticket>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let ticket = ticket_queries::get_ticket(&state, &ticket_number).await?;
    Ok(Json(ticket))
}
