//! Service-level inputs, decoupled from the HTTP DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::event::EventStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateEventRequest {
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub venue: String,
    pub sales_start: Option<DateTime<Utc>>,
    pub sales_end: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub ticket_types: Vec<CreateTicketTypeRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTicketTypeRequest {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub total_available: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEventRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub venue: String,
    pub sales_start: Option<DateTime<Utc>>,
    pub sales_end: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub ticket_types: Vec<UpdateTicketTypeRequest>,
}

/// An entry without `id` creates a new ticket type; with `id` it updates
/// the persisted one.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTicketTypeRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub total_available: Option<i32>,
}
