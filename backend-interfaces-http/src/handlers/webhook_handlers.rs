use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::error;

use backend_application::commands::webhook_commands;
use backend_application::AppState;

use crate::error::HttpError;

/// Gateway callback endpoint. Authenticated by the body signature, not the
/// bearer token; the body stays raw bytes because the signature is computed
/// over them. A 2xx acknowledges the delivery; a 5xx makes the gateway
/// retry.
pub async fn gateway_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<StatusCode, HttpError> {
    let signature = headers
        .get(webhook_commands::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    webhook_commands::process_webhook(&state, signature, &body)
        .await
        .map_err(|err| {
            if let backend_application::AppError::Internal(ref inner) = err {
                error!("webhook processing failed, gateway will retry: {}", inner);
            }
            HttpError::from(err)
        })?;
    Ok(StatusCode::OK)
}
