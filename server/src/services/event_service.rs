use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::requests::{CreateEventRequest, UpdateEventRequest};
use crate::models::{Event, EventStatus, Page, PageRequest, TicketType};
use crate::repositories::{EventEdit, EventRepository, UpdateOutcome, UserRepository};
use crate::services::reconcile::reconcile_ticket_types;
use crate::utils::error::{AppError, AppResult};

/// Organizer-facing event management and public event discovery.
#[derive(Clone)]
pub struct EventService {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(users: Arc<dyn UserRepository>, events: Arc<dyn EventRepository>) -> Self {
        Self { users, events }
    }

    /// Create an event and its ticket types for an existing organizer.
    pub async fn create_event(
        &self,
        organizer_id: Uuid,
        request: CreateEventRequest,
    ) -> AppResult<Event> {
        let organizer = self.users.find_by_id(organizer_id).await?.ok_or_else(|| {
            AppError::UserNotFound(format!("User with id {} not found", organizer_id))
        })?;

        let now = Utc::now();
        let event_id = Uuid::new_v4();

        let ticket_types = request
            .ticket_types
            .into_iter()
            .map(|tt| TicketType {
                id: Uuid::new_v4(),
                event_id,
                name: tt.name,
                price: tt.price,
                description: tt.description,
                total_available: tt.total_available,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let event = Event {
            id: event_id,
            organizer_id: organizer.id,
            name: request.name,
            start: request.start,
            end: request.end,
            venue: request.venue,
            sales_start: request.sales_start,
            sales_end: request.sales_end,
            status: request.status,
            created_at: now,
            updated_at: now,
            ticket_types,
        };

        let created = self.events.insert(&event).await?;
        info!(event_id = %created.id, organizer_id = %organizer_id, "Event created");
        Ok(created)
    }

    pub async fn list_events_for_organizer(
        &self,
        organizer_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<Event>> {
        Ok(self.events.find_by_organizer(organizer_id, page).await?)
    }

    pub async fn get_event_for_organizer(
        &self,
        organizer_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<Event>> {
        Ok(self.events.find_by_id_and_organizer(id, organizer_id).await?)
    }

    /// Overwrite an event's details and reconcile its ticket types with the
    /// request. The event is read, reconciled and written under one lock, and
    /// nothing is persisted unless every step succeeds.
    pub async fn update_event_for_organizer(
        &self,
        organizer_id: Uuid,
        event_id: Uuid,
        request: UpdateEventRequest,
    ) -> AppResult<Event> {
        let Some(request_id) = request.id else {
            return Err(AppError::EventUpdate("Event id must be present".to_string()));
        };

        if request_id != event_id {
            return Err(AppError::EventUpdate(
                "Event id must be the same as the one in the request".to_string(),
            ));
        }

        let edit: EventEdit = Box::new(move |event: &mut Event| {
            event.name = request.name;
            event.start = request.start;
            event.end = request.end;
            event.venue = request.venue;
            event.sales_start = request.sales_start;
            event.sales_end = request.sales_end;
            event.status = request.status;

            let changes = reconcile_ticket_types(
                event.id,
                &mut event.ticket_types,
                &request.ticket_types,
                Utc::now(),
            )?;

            debug!(
                event_id = %event.id,
                removed = changes.removed.len(),
                updated = changes.updated.len(),
                created = changes.created.len(),
                "Reconciled ticket types"
            );
            Ok(changes)
        });

        match self.events.update_with(event_id, organizer_id, edit).await? {
            UpdateOutcome::Updated(event) => {
                info!(event_id = %event_id, organizer_id = %organizer_id, "Event updated");
                Ok(event)
            }
            UpdateOutcome::NotFound => Err(AppError::EventNotFound(format!(
                "Event with Id {} not found",
                event_id
            ))),
            UpdateOutcome::Rejected(error) => Err(error),
        }
    }

    /// Silently does nothing when the event is missing or owned by someone else.
    pub async fn delete_event_for_organizer(&self, organizer_id: Uuid, id: Uuid) -> AppResult<()> {
        if let Some(event) = self.get_event_for_organizer(organizer_id, id).await? {
            self.events.delete(event.id).await?;
            info!(event_id = %id, organizer_id = %organizer_id, "Event deleted");
        }
        Ok(())
    }

    pub async fn list_published_events(&self, page: PageRequest) -> AppResult<Page<Event>> {
        Ok(self.events.find_by_status(EventStatus::Published, page).await?)
    }

    pub async fn search_published_events(
        &self,
        query: &str,
        page: PageRequest,
    ) -> AppResult<Page<Event>> {
        Ok(self.events.search_published(query, page).await?)
    }

    pub async fn get_published_event(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self
            .events
            .find_by_id_and_status(id, EventStatus::Published)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requests::{CreateTicketTypeRequest, UpdateTicketTypeRequest};
    use crate::models::User;
    use crate::repositories::InMemoryStore;
    use rust_decimal::Decimal;

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: EventService,
        organizer_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let organizer_id = Uuid::new_v4();
        store
            .upsert(&User::new(organizer_id, "Olivia", "olivia@example.com"))
            .await
            .unwrap();
        let service = EventService::new(store.clone(), store.clone());
        Fixture {
            store,
            service,
            organizer_id,
        }
    }

    fn ticket_type(name: &str, cents: i64) -> CreateTicketTypeRequest {
        CreateTicketTypeRequest {
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            description: None,
            total_available: Some(100),
        }
    }

    fn create_request(name: &str, status: EventStatus, ticket_types: &[&str]) -> CreateEventRequest {
        CreateEventRequest {
            name: name.to_string(),
            start: None,
            end: None,
            venue: "Main Hall".to_string(),
            sales_start: None,
            sales_end: None,
            status,
            ticket_types: ticket_types.iter().map(|n| ticket_type(n, 1500)).collect(),
        }
    }

    fn update_request(event: &Event, ticket_types: Vec<UpdateTicketTypeRequest>) -> UpdateEventRequest {
        UpdateEventRequest {
            id: Some(event.id),
            name: "Renamed".to_string(),
            start: event.start,
            end: event.end,
            venue: "Open Air Stage".to_string(),
            sales_start: event.sales_start,
            sales_end: event.sales_end,
            status: EventStatus::Published,
            ticket_types,
        }
    }

    fn keep(tt: &TicketType, name: &str) -> UpdateTicketTypeRequest {
        UpdateTicketTypeRequest {
            id: Some(tt.id),
            name: name.to_string(),
            price: Decimal::new(4200, 2),
            description: Some("updated".to_string()),
            total_available: Some(10),
        }
    }

    fn new_type(name: &str) -> UpdateTicketTypeRequest {
        UpdateTicketTypeRequest {
            id: None,
            name: name.to_string(),
            price: Decimal::ZERO,
            description: None,
            total_available: None,
        }
    }

    #[tokio::test]
    async fn test_create_event_requires_existing_organizer() {
        let f = fixture().await;

        let result = f
            .service
            .create_event(Uuid::new_v4(), create_request("Gig", EventStatus::Draft, &["GA"]))
            .await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_event_persists_ticket_types() {
        let f = fixture().await;

        let event = f
            .service
            .create_event(f.organizer_id, create_request("Gig", EventStatus::Draft, &["GA", "VIP"]))
            .await
            .unwrap();

        assert_eq!(event.organizer_id, f.organizer_id);
        assert_eq!(event.ticket_types.len(), 2);
        assert!(event.ticket_types.iter().all(|tt| tt.event_id == event.id));

        let stored = f
            .service
            .get_event_for_organizer(f.organizer_id, event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, event);
    }

    #[tokio::test]
    async fn test_update_without_id_fails_regardless_of_fields() {
        let f = fixture().await;
        let event = f
            .service
            .create_event(f.organizer_id, create_request("Gig", EventStatus::Draft, &["GA"]))
            .await
            .unwrap();

        let mut request = update_request(&event, vec![new_type("Ghost")]);
        request.id = None;

        let result = f
            .service
            .update_event_for_organizer(f.organizer_id, event.id, request)
            .await;

        assert!(matches!(result, Err(AppError::EventUpdate(msg)) if msg == "Event id must be present"));
    }

    #[tokio::test]
    async fn test_update_with_mismatched_id_fails() {
        let f = fixture().await;
        let event = f
            .service
            .create_event(f.organizer_id, create_request("Gig", EventStatus::Draft, &["GA"]))
            .await
            .unwrap();

        let result = f
            .service
            .update_event_for_organizer(f.organizer_id, Uuid::new_v4(), update_request(&event, vec![]))
            .await;

        assert!(matches!(
            result,
            Err(AppError::EventUpdate(msg)) if msg == "Event id must be the same as the one in the request"
        ));
    }

    #[tokio::test]
    async fn test_update_of_foreign_event_is_not_found() {
        let f = fixture().await;
        let event = f
            .service
            .create_event(f.organizer_id, create_request("Gig", EventStatus::Draft, &["GA"]))
            .await
            .unwrap();

        let result = f
            .service
            .update_event_for_organizer(Uuid::new_v4(), event.id, update_request(&event, vec![]))
            .await;

        assert!(matches!(result, Err(AppError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_reconciles_ticket_types() {
        let f = fixture().await;
        let event = f
            .service
            .create_event(f.organizer_id, create_request("Gig", EventStatus::Draft, &["A", "B", "C"]))
            .await
            .unwrap();
        let b = event.ticket_types[1].clone();

        let updated = f
            .service
            .update_event_for_organizer(
                f.organizer_id,
                event.id,
                update_request(&event, vec![keep(&b, "B updated"), new_type("Late entry")]),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.venue, "Open Air Stage");
        assert_eq!(updated.status, EventStatus::Published);

        let names: Vec<&str> = updated.ticket_types.iter().map(|tt| tt.name.as_str()).collect();
        assert_eq!(names, vec!["B updated", "Late entry"]);
        assert_eq!(updated.ticket_types[0].id, b.id);
        assert_eq!(updated.ticket_types[0].price, Decimal::new(4200, 2));
        assert_ne!(updated.ticket_types[1].id, b.id);

        let stored = f
            .service
            .get_event_for_organizer(f.organizer_id, event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.ticket_types.len(), 2);
    }

    #[tokio::test]
    async fn test_update_with_unknown_ticket_type_persists_nothing() {
        let f = fixture().await;
        let event = f
            .service
            .create_event(f.organizer_id, create_request("Gig", EventStatus::Draft, &["A", "B"]))
            .await
            .unwrap();
        let a = event.ticket_types[0].clone();

        let mut ghost = new_type("Ghost");
        ghost.id = Some(Uuid::new_v4());

        let result = f
            .service
            .update_event_for_organizer(
                f.organizer_id,
                event.id,
                update_request(&event, vec![keep(&a, "A updated"), new_type("New"), ghost]),
            )
            .await;

        assert!(matches!(result, Err(AppError::TicketTypeNotFound(_))));

        let stored = f
            .service
            .get_event_for_organizer(f.organizer_id, event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, event);
    }

    #[tokio::test]
    async fn test_removed_ticket_type_cannot_be_resurrected_by_id() {
        let f = fixture().await;
        let event = f
            .service
            .create_event(f.organizer_id, create_request("Gig", EventStatus::Draft, &["A", "B"]))
            .await
            .unwrap();
        let a = event.ticket_types[0].clone();

        f.service
            .update_event_for_organizer(f.organizer_id, event.id, update_request(&event, vec![new_type("C")]))
            .await
            .unwrap();

        let result = f
            .service
            .update_event_for_organizer(f.organizer_id, event.id, update_request(&event, vec![keep(&a, "A")]))
            .await;

        assert!(matches!(result, Err(AppError::TicketTypeNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_or_foreign_event_is_silent() {
        let f = fixture().await;
        let event = f
            .service
            .create_event(f.organizer_id, create_request("Gig", EventStatus::Draft, &["GA"]))
            .await
            .unwrap();

        f.service
            .delete_event_for_organizer(f.organizer_id, Uuid::new_v4())
            .await
            .unwrap();
        f.service
            .delete_event_for_organizer(Uuid::new_v4(), event.id)
            .await
            .unwrap();

        assert!(f
            .service
            .get_event_for_organizer(f.organizer_id, event.id)
            .await
            .unwrap()
            .is_some());

        f.service
            .delete_event_for_organizer(f.organizer_id, event.id)
            .await
            .unwrap();

        assert!(f
            .service
            .get_event_for_organizer(f.organizer_id, event.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_published_reads_skip_other_statuses() {
        let f = fixture().await;
        let draft = f
            .service
            .create_event(f.organizer_id, create_request("Jazz Draft", EventStatus::Draft, &["GA"]))
            .await
            .unwrap();
        let published = f
            .service
            .create_event(f.organizer_id, create_request("Jazz Night", EventStatus::Published, &["GA"]))
            .await
            .unwrap();
        f.service
            .create_event(f.organizer_id, create_request("Jazz Past", EventStatus::Completed, &["GA"]))
            .await
            .unwrap();

        let page = f
            .service
            .list_published_events(PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].id, published.id);

        let found = f
            .service
            .search_published_events("jazz", PageRequest::default())
            .await
            .unwrap();
        assert_eq!(found.total_elements, 1);
        assert_eq!(found.content[0].id, published.id);

        assert!(f.service.get_published_event(draft.id).await.unwrap().is_none());
        assert!(f.service.get_published_event(published.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_events_for_organizer_is_scoped() {
        let f = fixture().await;
        let other = Uuid::new_v4();
        f.store
            .upsert(&User::new(other, "Other", "other@example.com"))
            .await
            .unwrap();

        f.service
            .create_event(f.organizer_id, create_request("Mine", EventStatus::Draft, &["GA"]))
            .await
            .unwrap();
        f.service
            .create_event(other, create_request("Theirs", EventStatus::Draft, &["GA"]))
            .await
            .unwrap();

        let page = f
            .service
            .list_events_for_organizer(f.organizer_id, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].name, "Mine");
    }
}
