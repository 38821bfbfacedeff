// Payment entity
// One row per gateway charge; the webhook handler flips it to successful

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::PaymentStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub reference: String,
    pub event_id: Uuid,
    pub organizer_id: Uuid,
    pub amount_minor: i64,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub id: Uuid,
    pub reference: String,
    pub event_id: Uuid,
    pub organizer_id: Uuid,
    pub amount_minor: i64,
    pub status: PaymentStatus,
}
