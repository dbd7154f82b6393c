use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of an event. Only `Published` events are visible to the public.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub name: String,
    #[sqlx(rename = "event_start")]
    pub start: Option<DateTime<Utc>>,
    #[sqlx(rename = "event_end")]
    pub end: Option<DateTime<Utc>>,
    pub venue: String,
    pub sales_start: Option<DateTime<Utc>>,
    pub sales_end: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Loaded separately from `ticket_types`; always the full owned set.
    #[sqlx(skip)]
    pub ticket_types: Vec<TicketType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TicketType {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    /// `None` means the ticket type has no quota.
    pub total_available: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_published(&self) -> bool {
        self.status == EventStatus::Published
    }
}

/// Ticket type rows touched by an event update, applied in one transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketTypeChanges {
    pub removed: Vec<Uuid>,
    pub updated: Vec<TicketType>,
    pub created: Vec<TicketType>,
}
