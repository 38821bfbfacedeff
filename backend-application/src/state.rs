use std::sync::Arc;

use backend_domain::ports::{
    PaymentGateway, SettlementRepository, TicketRepository, WalletRepository,
    WithdrawalRepository,
};
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub wallet_repo: Arc<dyn WalletRepository>,
    pub withdrawal_repo: Arc<dyn WithdrawalRepository>,
    pub settlement_repo: Arc<dyn SettlementRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub metrics: Arc<Metrics>,
}
