//! Persistence seams. Services only see these traits; `postgres` backs the
//! server and `memory` backs tests and database-less local runs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Event, EventStatus, Page, PageRequest, PurchaseOutcome, Ticket, TicketTypeChanges, User,
};
use crate::utils::error::AppError;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PgEventRepository, PgTicketRepository, PgUserRepository};

/// Changes a locked event in place and reports the ticket type rows to write.
pub type EventEdit = Box<dyn FnOnce(&mut Event) -> Result<TicketTypeChanges, AppError> + Send>;

/// How an update of a locked event ended.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(Event),
    /// No event with that id for that organizer.
    NotFound,
    /// The edit refused the change; nothing was written.
    Rejected(AppError),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;

    /// Insert the user, or refresh name and email when it already exists.
    async fn upsert(&self, user: &User) -> Result<(), sqlx::Error>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert an event together with all of its ticket types.
    async fn insert(&self, event: &Event) -> Result<Event, sqlx::Error>;

    async fn find_by_organizer(
        &self,
        organizer_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error>;

    async fn find_by_id_and_organizer(
        &self,
        id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<Event>, sqlx::Error>;

    /// Load the organizer's event under a lock, apply `edit` to it and write
    /// the event row together with the reported ticket type changes. Reading,
    /// editing and writing happen in one transaction; concurrent updates of
    /// the same event are serialized.
    async fn update_with(
        &self,
        id: Uuid,
        organizer_id: Uuid,
        edit: EventEdit,
    ) -> Result<UpdateOutcome, sqlx::Error>;

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;

    async fn find_by_status(
        &self,
        status: EventStatus,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error>;

    /// Full text search restricted to published events.
    async fn search_published(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error>;

    async fn find_by_id_and_status(
        &self,
        id: Uuid,
        status: EventStatus,
    ) -> Result<Option<Event>, sqlx::Error>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_by_purchaser(
        &self,
        purchaser_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Ticket>, sqlx::Error>;

    async fn find_by_id_and_purchaser(
        &self,
        id: Uuid,
        purchaser_id: Uuid,
    ) -> Result<Option<Ticket>, sqlx::Error>;

    /// Sell one ticket of a published event's ticket type, honouring its quota.
    async fn purchase(
        &self,
        purchaser_id: Uuid,
        event_id: Uuid,
        ticket_type_id: Uuid,
    ) -> Result<PurchaseOutcome, sqlx::Error>;
}
