use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    AdminWallet,
    CheckInOutcome,
    CheckInRequest,
    IssueBatch,
    IssueOutcome,
    NewWithdrawal,
    ReserveOutcome,
    Ticket,
    TicketLookup,
    WebhookOutcome,
    WithdrawalRequest,
};

/// Each method is one datastore transaction: it either commits the whole
/// operation or leaves no trace.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn issue_batch(&self, batch: &IssueBatch) -> anyhow::Result<IssueOutcome>;
    async fn check_in(
        &self,
        lookup: &TicketLookup,
        request: &CheckInRequest,
    ) -> anyhow::Result<CheckInOutcome>;
    async fn find_by_number(&self, ticket_number: &str) -> anyhow::Result<Option<Ticket>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn find(&self, organizer_id: Uuid, event_id: Uuid)
        -> anyhow::Result<Option<AdminWallet>>;
    /// Conditional decrement of the spendable balance; the funds become
    /// non-double-spendable by a second concurrent request.
    async fn reserve(&self, wallet_id: Uuid, amount_minor: i64) -> anyhow::Result<ReserveOutcome>;
    async fn refund_reservation(
        &self,
        wallet_id: Uuid,
        amount_minor: i64,
    ) -> anyhow::Result<AdminWallet>;
}

#[async_trait]
pub trait WithdrawalRepository: Send + Sync {
    async fn create(&self, withdrawal: &NewWithdrawal) -> anyhow::Result<WithdrawalRequest>;
    async fn mark_processing(&self, id: Uuid, transfer_code: &str) -> anyhow::Result<()>;
    /// Synchronous gateway rejection only; asynchronous failures arrive via
    /// webhook and go through `SettlementRepository`.
    async fn mark_failed(&self, id: Uuid, reason: &str) -> anyhow::Result<()>;
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<WithdrawalRequest>>;
}

/// Webhook state changes. Every method records the delivery in the
/// idempotency ledger and applies the payment/wallet/withdrawal change in
/// the same transaction, so replays and crashes cannot double-apply.
#[async_trait]
pub trait SettlementRepository: Send + Sync {
    async fn apply_charge_success(
        &self,
        reference: &str,
        reported_amount_minor: Option<i64>,
        payload: &serde_json::Value,
    ) -> anyhow::Result<WebhookOutcome>;
    async fn apply_transfer_success(
        &self,
        transfer_code: &str,
        payload: &serde_json::Value,
    ) -> anyhow::Result<WebhookOutcome>;
    async fn apply_transfer_failure(
        &self,
        transfer_code: &str,
        reason: Option<&str>,
        payload: &serde_json::Value,
    ) -> anyhow::Result<WebhookOutcome>;
}
