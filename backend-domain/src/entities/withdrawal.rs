// Withdrawal request entity
// pending -> processing -> completed | failed; terminal states come from
// webhook confirmation except for synchronous gateway rejections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WithdrawalRequest {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub amount_minor: i64,
    pub bank_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
    pub transfer_code: Option<String>,
    pub status: String,
    pub failure_reason: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDestination {
    pub bank_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub amount_minor: i64,
    pub destination: BankDestination,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitiateWithdrawalRequest {
    pub organizer_id: Uuid,
    pub event_id: Uuid,
    pub amount_minor: i64,
    pub bank_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
}
