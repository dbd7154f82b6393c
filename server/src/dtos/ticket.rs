use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Ticket, TicketStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListTicketTicketTypeResponseDto {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListTicketResponseDto {
    pub id: Uuid,
    pub status: TicketStatus,
    pub ticket_type: ListTicketTicketTypeResponseDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetTicketResponseDto {
    pub id: Uuid,
    pub status: TicketStatus,
    pub price: Decimal,
    pub description: Option<String>,
    pub event_name: String,
    pub event_venue: String,
    pub event_start: Option<DateTime<Utc>>,
    pub event_end: Option<DateTime<Utc>>,
}

impl From<Ticket> for ListTicketResponseDto {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            status: ticket.status,
            ticket_type: ListTicketTicketTypeResponseDto {
                id: ticket.ticket_type_id,
                name: ticket.ticket_type_name,
                price: ticket.price,
            },
        }
    }
}

impl From<Ticket> for GetTicketResponseDto {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            status: ticket.status,
            price: ticket.price,
            description: ticket.description,
            event_name: ticket.event_name,
            event_venue: ticket.event_venue,
            event_start: ticket.event_start,
            event_end: ticket.event_end,
        }
    }
}
