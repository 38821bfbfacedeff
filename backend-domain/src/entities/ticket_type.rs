// Ticket type entity
// A purchasable category for an event with its own price and inventory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketType {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub price_minor: i64,
    pub total_quantity: i32,
    pub available_quantity: i32,
    pub per_user_limit: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TicketType {
    pub fn is_purchasable(&self, requested: i32) -> bool {
        self.is_active && self.available_quantity >= requested
    }
}
