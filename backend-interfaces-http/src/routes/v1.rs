use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    checkin_handlers, ops_handlers, ticket_handlers, wallet_handlers, webhook_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/tickets/issue",
            axum::routing::post(ticket_handlers::issue_tickets),
        )
        .route(
            "/v1/tickets/issue-free",
            axum::routing::post(ticket_handlers::issue_free_tickets),
        )
        .route(
            "/v1/tickets/:ticket_number",
            axum::routing::get(ticket_handlers::get_ticket),
        )
        .route(
            "/v1/check-ins/scan",
            axum::routing::post(checkin_handlers::check_in_scan),
        )
        .route(
            "/v1/check-ins/manual",
            axum::routing::post(checkin_handlers::check_in_manual),
        )
        .route(
            "/v1/wallets/:organizer_id/:event_id",
            axum::routing::get(wallet_handlers::get_wallet),
        )
        .route(
            "/v1/withdrawals",
            axum::routing::post(wallet_handlers::initiate_withdrawal),
        )
        .route(
            "/v1/withdrawals/:id",
            axum::routing::get(wallet_handlers::get_withdrawal),
        )
        .route(
            "/v1/webhooks/gateway",
            axum::routing::post(webhook_handlers::gateway_webhook),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
