use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    EventRepository, InMemoryStore, PgEventRepository, PgTicketRepository, PgUserRepository,
    TicketRepository, UserRepository,
};
use crate::services::{EventService, TicketService, TicketTypeService};

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: services only hold `Arc`s to their repositories.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub event_service: EventService,
    pub ticket_service: TicketService,
    pub ticket_type_service: TicketTypeService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        tickets: Arc<dyn TicketRepository>,
    ) -> Self {
        Self {
            event_service: EventService::new(users.clone(), events),
            ticket_service: TicketService::new(tickets.clone()),
            ticket_type_service: TicketTypeService::new(users.clone(), tickets),
            users,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgEventRepository::new(pool.clone())),
            Arc::new(PgTicketRepository::new(pool)),
        )
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store.clone(), store)
    }
}
