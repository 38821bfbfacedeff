// Ticket entity and issuance types
// A ticket's QR payload is a bearer credential: opaque, unique, never reused

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::payment::PaymentDraft;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub ticket_number: String,
    pub qr_payload: String,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub owner_user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub price_paid_minor: i64,
    pub payment_reference: Option<String>,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_in_by: Option<Uuid>,
    pub check_in_method: Option<String>,
    pub purchased_at: DateTime<Utc>,
}

/// One line of an issuance batch as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueLine {
    pub ticket_type_id: Uuid,
    pub owner_user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    #[serde(default)]
    pub price_minor: i64,
    #[serde(default)]
    pub form_responses: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueBatchRequest {
    pub event_id: Uuid,
    pub organizer_id: Uuid,
    pub payment_reference: Option<String>,
    pub lines: Vec<IssueLine>,
}

/// A fully prepared ticket row, codes already generated.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub id: Uuid,
    pub ticket_number: String,
    pub qr_payload: String,
    pub event_id: Uuid,
    pub ticket_type_id: Uuid,
    pub owner_user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub price_minor: i64,
    pub form_responses: Option<serde_json::Value>,
}

/// The unit of issuance: all tickets plus the payment row commit together
/// or not at all.
#[derive(Debug, Clone)]
pub struct IssueBatch {
    pub event_id: Uuid,
    pub payment: PaymentDraft,
    pub tickets: Vec<TicketDraft>,
}

#[derive(Debug)]
pub enum IssueOutcome {
    Issued(Vec<Ticket>),
    UnknownType(Uuid),
    InactiveType(Uuid),
    WrongEvent(Uuid),
    SoldOut {
        ticket_type_id: Uuid,
        requested: i32,
        available: i32,
    },
    PerUserLimitExceeded {
        ticket_type_id: Uuid,
        limit: i32,
    },
    DuplicateReference(String),
    /// A generated ticket number or QR payload collided with an existing
    /// row. The caller regenerates codes and retries.
    DuplicateCode,
}
