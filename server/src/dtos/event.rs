use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::requests::{
    CreateEventRequest, CreateTicketTypeRequest, UpdateEventRequest, UpdateTicketTypeRequest,
};
use crate::models::{Event, EventStatus, TicketType};

/// Largest price a `NUMERIC(12, 2)` column holds.
const MAX_PRICE_CENTS: i64 = 999_999_999_999;

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let message = if *price < Decimal::ZERO {
        "Price must be zero or greater"
    } else if price.normalize().scale() > 2 {
        "Price must have at most two decimal places"
    } else if *price > Decimal::new(MAX_PRICE_CENTS, 2) {
        "Price must not exceed 9999999999.99"
    } else {
        return Ok(());
    };

    let mut error = ValidationError::new("price");
    error.message = Some(message.into());
    Err(error)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

// Required fields are optional on the wire so that a missing field is
// reported as a field error rather than an unreadable body.

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTicketTypeRequestDto {
    #[validate(
        required(message = "Ticket type name is required"),
        length(min = 1, message = "Ticket type name is required")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Price is required"),
        custom(function = "validate_price")
    )]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Total available must be zero or greater"))]
    pub total_available: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequestDto {
    #[validate(
        required(message = "Event name is required"),
        length(min = 1, message = "Event name is required")
    )]
    pub name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[validate(
        required(message = "Venue information is required"),
        length(min = 1, message = "Venue information is required")
    )]
    pub venue: Option<String>,
    pub sales_start: Option<DateTime<Utc>>,
    pub sales_end: Option<DateTime<Utc>>,
    #[validate(required(message = "Event status must be provided"))]
    pub status: Option<EventStatus>,
    #[validate(
        required(message = "At least one ticket type is required"),
        length(min = 1, message = "At least one ticket type is required"),
        nested
    )]
    pub ticket_types: Option<Vec<CreateTicketTypeRequestDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTicketTypeRequestDto {
    pub id: Option<Uuid>,
    #[validate(
        required(message = "Ticket type name is required"),
        length(min = 1, message = "Ticket type name is required")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Price is required"),
        custom(function = "validate_price")
    )]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Total available must be zero or greater"))]
    pub total_available: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEventRequestDto {
    pub id: Option<Uuid>,
    #[validate(
        required(message = "Event name is required"),
        length(min = 1, message = "Event name is required")
    )]
    pub name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[validate(
        required(message = "Venue information is required"),
        length(min = 1, message = "Venue information is required")
    )]
    pub venue: Option<String>,
    pub sales_start: Option<DateTime<Utc>>,
    pub sales_end: Option<DateTime<Utc>>,
    #[validate(required(message = "Event status must be provided"))]
    pub status: Option<EventStatus>,
    #[validate(
        required(message = "At least one ticket type is required"),
        length(min = 1, message = "At least one ticket type is required"),
        nested
    )]
    pub ticket_types: Option<Vec<UpdateTicketTypeRequestDto>>,
}

// The conversions below run after validation, so the defaults are never
// observed for required fields.

impl From<CreateEventRequestDto> for CreateEventRequest {
    fn from(dto: CreateEventRequestDto) -> Self {
        Self {
            name: dto.name.unwrap_or_default(),
            start: dto.start,
            end: dto.end,
            venue: dto.venue.unwrap_or_default(),
            sales_start: dto.sales_start,
            sales_end: dto.sales_end,
            status: dto.status.unwrap_or_default(),
            ticket_types: dto
                .ticket_types
                .unwrap_or_default()
                .into_iter()
                .map(|tt| CreateTicketTypeRequest {
                    name: tt.name.unwrap_or_default(),
                    price: tt.price.unwrap_or_default(),
                    description: tt.description,
                    total_available: tt.total_available,
                })
                .collect(),
        }
    }
}

impl From<UpdateEventRequestDto> for UpdateEventRequest {
    fn from(dto: UpdateEventRequestDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name.unwrap_or_default(),
            start: dto.start,
            end: dto.end,
            venue: dto.venue.unwrap_or_default(),
            sales_start: dto.sales_start,
            sales_end: dto.sales_end,
            status: dto.status.unwrap_or_default(),
            ticket_types: dto
                .ticket_types
                .unwrap_or_default()
                .into_iter()
                .map(|tt| UpdateTicketTypeRequest {
                    id: tt.id,
                    name: tt.name.unwrap_or_default(),
                    price: tt.price.unwrap_or_default(),
                    description: tt.description,
                    total_available: tt.total_available,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Full ticket type view, returned to the owning organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTypeResponseDto {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub total_available: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returned from create, update and organizer-scoped get.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetailsResponseDto {
    pub id: Uuid,
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub venue: String,
    pub sales_start: Option<DateTime<Utc>>,
    pub sales_end: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub ticket_types: Vec<TicketTypeResponseDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEventTicketTypeResponseDto {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub total_available: Option<i32>,
}

/// Organizer listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEventResponseDto {
    pub id: Uuid,
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub venue: String,
    pub sales_start: Option<DateTime<Utc>>,
    pub sales_end: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub ticket_types: Vec<ListEventTicketTypeResponseDto>,
}

/// Public listing entry. Carries no sales or ticket data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPublishedEventResponseDto {
    pub id: Uuid,
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub venue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedTicketTypeResponseDto {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetPublishedEventDetailsResponseDto {
    pub id: Uuid,
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub venue: String,
    pub ticket_types: Vec<PublishedTicketTypeResponseDto>,
}

impl From<TicketType> for TicketTypeResponseDto {
    fn from(tt: TicketType) -> Self {
        Self {
            id: tt.id,
            name: tt.name,
            price: tt.price,
            description: tt.description,
            total_available: tt.total_available,
            created_at: tt.created_at,
            updated_at: tt.updated_at,
        }
    }
}

impl From<Event> for EventDetailsResponseDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            start: event.start,
            end: event.end,
            venue: event.venue,
            sales_start: event.sales_start,
            sales_end: event.sales_end,
            status: event.status,
            ticket_types: event.ticket_types.into_iter().map(Into::into).collect(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<Event> for ListEventResponseDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            start: event.start,
            end: event.end,
            venue: event.venue,
            sales_start: event.sales_start,
            sales_end: event.sales_end,
            status: event.status,
            ticket_types: event
                .ticket_types
                .into_iter()
                .map(|tt| ListEventTicketTypeResponseDto {
                    id: tt.id,
                    name: tt.name,
                    price: tt.price,
                    description: tt.description,
                    total_available: tt.total_available,
                })
                .collect(),
        }
    }
}

impl From<Event> for ListPublishedEventResponseDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            start: event.start,
            end: event.end,
            venue: event.venue,
        }
    }
}

impl From<Event> for GetPublishedEventDetailsResponseDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            start: event.start,
            end: event.end,
            venue: event.venue,
            ticket_types: event
                .ticket_types
                .into_iter()
                .map(|tt| PublishedTicketTypeResponseDto {
                    id: tt.id,
                    name: tt.name,
                    price: tt.price,
                    description: tt.description,
                })
                .collect(),
        }
    }
}
