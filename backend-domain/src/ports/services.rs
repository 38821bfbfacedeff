use async_trait::async_trait;

use crate::entities::BankDestination;

#[derive(Debug, Clone)]
pub struct ResolvedAccount {
    pub account_number: String,
    pub account_name: String,
}

#[derive(Debug, Clone)]
pub struct TransferAccepted {
    pub transfer_code: String,
}

/// External payment gateway capability. Account resolution and recipient
/// creation are pure validation steps; only `initiate_transfer` has a
/// settlement side on the gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn resolve_account(
        &self,
        bank_code: &str,
        account_number: &str,
    ) -> anyhow::Result<ResolvedAccount>;
    async fn create_transfer_recipient(
        &self,
        destination: &BankDestination,
    ) -> anyhow::Result<String>;
    async fn initiate_transfer(
        &self,
        recipient_code: &str,
        amount_minor: i64,
        reference: &str,
        reason: &str,
    ) -> anyhow::Result<TransferAccepted>;
}
