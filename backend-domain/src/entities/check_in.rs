// Check-in entity and operation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::ticket::Ticket;
use crate::value_objects::CheckInMethod;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CheckInRecord {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub operator_id: Uuid,
    pub method: String,
    pub notes: Option<String>,
    pub checked_in_at: DateTime<Utc>,
}

/// How a ticket is located at the entrance: scanned payload, or the
/// human-legible number typed in as a manual fallback.
#[derive(Debug, Clone)]
pub enum TicketLookup {
    ByPayload(String),
    ByNumber(String),
}

#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub operator_id: Uuid,
    pub method: CheckInMethod,
    pub notes: Option<String>,
}

/// Exactly one concurrent attempt per ticket observes `CheckedIn`; the rest
/// observe `AlreadyCheckedIn`.
#[derive(Debug)]
pub enum CheckInOutcome {
    CheckedIn(Ticket),
    AlreadyCheckedIn(Ticket),
    NotFound,
}
