//! Process-local store used by the test suite and by `DATABASE_URL`-less
//! development runs. Every operation holds one lock for its whole duration,
//! which gives the same all-or-nothing behaviour as a database transaction.
//! Referential constraints (such as sold tickets blocking ticket type
//! deletion) are not enforced.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Event, EventStatus, Page, PageRequest, PurchaseOutcome, Ticket, TicketStatus, User,
};
use crate::repositories::{
    EventEdit, EventRepository, TicketRepository, UpdateOutcome, UserRepository,
};

#[derive(Debug, Clone)]
struct StoredTicket {
    id: Uuid,
    status: TicketStatus,
    purchaser_id: Uuid,
    ticket_type_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    events: Vec<Event>,
    tickets: Vec<StoredTicket>,
}

impl State {
    fn sorted_events<P>(&self, predicate: P) -> Vec<Event>
    where
        P: Fn(&Event) -> bool,
    {
        let mut events: Vec<Event> = self.events.iter().filter(|e| predicate(e)).cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        events
    }

    fn ticket_view(&self, ticket: &StoredTicket) -> Option<Ticket> {
        self.events.iter().find_map(|event| {
            event
                .ticket_types
                .iter()
                .find(|tt| tt.id == ticket.ticket_type_id)
                .map(|tt| Ticket {
                    id: ticket.id,
                    status: ticket.status,
                    purchaser_id: ticket.purchaser_id,
                    ticket_type_id: tt.id,
                    ticket_type_name: tt.name.clone(),
                    price: tt.price,
                    description: tt.description.clone(),
                    event_id: event.id,
                    event_name: event.name.clone(),
                    event_venue: event.venue.clone(),
                    event_start: event.start,
                    event_end: event.end,
                    created_at: ticket.created_at,
                })
        })
    }
}

/// In-memory implementation of every repository trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn matches_search(event: &Event, words: &[String]) -> bool {
    let haystack = format!("{} {}", event.name, event.venue).to_lowercase();
    !words.is_empty() && words.iter().all(|word| haystack.contains(word.as_str()))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn upsert(&self, user: &User) -> Result<(), sqlx::Error> {
        let mut state = self.state();
        match state.users.get_mut(&user.id) {
            Some(existing) => {
                if existing.name != user.name || existing.email != user.email {
                    existing.name = user.name.clone();
                    existing.email = user.email.clone();
                    existing.updated_at = Utc::now();
                }
            }
            None => {
                state.users.insert(user.id, user.clone());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn insert(&self, event: &Event) -> Result<Event, sqlx::Error> {
        self.state().events.push(event.clone());
        Ok(event.clone())
    }

    async fn find_by_organizer(
        &self,
        organizer_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error> {
        let events = self.state().sorted_events(|e| e.organizer_id == organizer_id);
        Ok(Page::from_slice(&events, page))
    }

    async fn find_by_id_and_organizer(
        &self,
        id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<Event>, sqlx::Error> {
        Ok(self
            .state()
            .events
            .iter()
            .find(|e| e.id == id && e.organizer_id == organizer_id)
            .cloned())
    }

    async fn update_with(
        &self,
        id: Uuid,
        organizer_id: Uuid,
        edit: EventEdit,
    ) -> Result<UpdateOutcome, sqlx::Error> {
        let mut state = self.state();
        let Some(stored) = state
            .events
            .iter_mut()
            .find(|e| e.id == id && e.organizer_id == organizer_id)
        else {
            return Ok(UpdateOutcome::NotFound);
        };

        let mut draft = stored.clone();
        if let Err(error) = edit(&mut draft) {
            return Ok(UpdateOutcome::Rejected(error));
        }

        draft.updated_at = Utc::now();
        *stored = draft;
        Ok(UpdateOutcome::Updated(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        self.state().events.retain(|e| e.id != id);
        Ok(())
    }

    async fn find_by_status(
        &self,
        status: EventStatus,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error> {
        let events = self.state().sorted_events(|e| e.status == status);
        Ok(Page::from_slice(&events, page))
    }

    async fn search_published(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let events = self
            .state()
            .sorted_events(|e| e.is_published() && matches_search(e, &words));
        Ok(Page::from_slice(&events, page))
    }

    async fn find_by_id_and_status(
        &self,
        id: Uuid,
        status: EventStatus,
    ) -> Result<Option<Event>, sqlx::Error> {
        Ok(self
            .state()
            .events
            .iter()
            .find(|e| e.id == id && e.status == status)
            .cloned())
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn find_by_purchaser(
        &self,
        purchaser_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Ticket>, sqlx::Error> {
        let state = self.state();
        let mut tickets: Vec<Ticket> = state
            .tickets
            .iter()
            .filter(|t| t.purchaser_id == purchaser_id)
            .filter_map(|t| state.ticket_view(t))
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(Page::from_slice(&tickets, page))
    }

    async fn find_by_id_and_purchaser(
        &self,
        id: Uuid,
        purchaser_id: Uuid,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let state = self.state();
        Ok(state
            .tickets
            .iter()
            .find(|t| t.id == id && t.purchaser_id == purchaser_id)
            .and_then(|t| state.ticket_view(t)))
    }

    async fn purchase(
        &self,
        purchaser_id: Uuid,
        event_id: Uuid,
        ticket_type_id: Uuid,
    ) -> Result<PurchaseOutcome, sqlx::Error> {
        let mut state = self.state();

        let quota = state
            .events
            .iter()
            .filter(|e| e.id == event_id && e.is_published())
            .flat_map(|e| e.ticket_types.iter())
            .find(|tt| tt.id == ticket_type_id)
            .map(|tt| tt.total_available);

        let Some(total_available) = quota else {
            return Ok(PurchaseOutcome::TicketTypeNotFound);
        };

        if let Some(total_available) = total_available {
            let sold = state
                .tickets
                .iter()
                .filter(|t| t.ticket_type_id == ticket_type_id && t.status == TicketStatus::Purchased)
                .count() as i64;
            if sold + 1 > i64::from(total_available) {
                return Ok(PurchaseOutcome::SoldOut);
            }
        }

        let id = Uuid::new_v4();
        state.tickets.push(StoredTicket {
            id,
            status: TicketStatus::Purchased,
            purchaser_id,
            ticket_type_id,
            created_at: Utc::now(),
        });
        Ok(PurchaseOutcome::Purchased(id))
    }
}
