use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Purchased,
    Cancelled,
}

/// A purchased ticket joined with its ticket type and event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub status: TicketStatus,
    pub purchaser_id: Uuid,
    pub ticket_type_id: Uuid,
    pub ticket_type_name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub event_id: Uuid,
    pub event_name: String,
    pub event_venue: String,
    pub event_start: Option<DateTime<Utc>>,
    pub event_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Result of a purchase attempt against a ticket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased(Uuid),
    TicketTypeNotFound,
    SoldOut,
}
