use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::{Event, EventStatus, Page, PageRequest, TicketType, TicketTypeChanges};
use crate::repositories::{EventEdit, EventRepository, UpdateOutcome};
use crate::utils::error::AppError;

/// Column list for `events` queries.
const EVENT_COLUMNS: &str = "id, organizer_id, name, event_start, event_end, venue, \
    sales_start, sales_end, status, created_at, updated_at";

/// Column list for `ticket_types` queries.
const TICKET_TYPE_COLUMNS: &str =
    "id, event_id, name, price, description, total_available, created_at, updated_at";

/// Text search document over an event row. Must match `idx_events_search`.
const SEARCH_DOCUMENT: &str = "to_tsvector('english', name || ' ' || venue)";

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach ticket types to a batch of events with a single query.
    async fn with_ticket_types(&self, mut events: Vec<Event>) -> Result<Vec<Event>, sqlx::Error> {
        if events.is_empty() {
            return Ok(events);
        }

        let ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let query = format!(
            "SELECT {TICKET_TYPE_COLUMNS} FROM ticket_types \
             WHERE event_id = ANY($1) ORDER BY seq"
        );
        let ticket_types = sqlx::query_as::<_, TicketType>(&query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_event: HashMap<Uuid, Vec<TicketType>> = HashMap::new();
        for ticket_type in ticket_types {
            by_event
                .entry(ticket_type.event_id)
                .or_default()
                .push(ticket_type);
        }

        for event in &mut events {
            event.ticket_types = by_event.remove(&event.id).unwrap_or_default();
        }

        Ok(events)
    }

    async fn with_ticket_types_one(&self, event: Option<Event>) -> Result<Option<Event>, sqlx::Error> {
        match event {
            Some(event) => Ok(self.with_ticket_types(vec![event]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Page through events matching `filter`, whose only parameter is `$1`.
    async fn fetch_page<T>(
        &self,
        filter: &str,
        value: T,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error>
    where
        T: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + Copy,
    {
        let count_query = format!("SELECT COUNT(*) FROM events WHERE {filter}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(value)
            .fetch_one(&self.pool)
            .await?;

        let list_query = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE {filter} \
             ORDER BY created_at DESC, id LIMIT $2 OFFSET $3"
        );
        let events = sqlx::query_as::<_, Event>(&list_query)
            .bind(value)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let events = self.with_ticket_types(events).await?;
        Ok(Page::new(events, page, total))
    }
}

async fn insert_ticket_type(
    tx: &mut Transaction<'_, Postgres>,
    ticket_type: &TicketType,
) -> Result<TicketType, sqlx::Error> {
    let query = format!(
        "INSERT INTO ticket_types \
            (id, event_id, name, price, description, total_available, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {TICKET_TYPE_COLUMNS}"
    );
    sqlx::query_as::<_, TicketType>(&query)
        .bind(ticket_type.id)
        .bind(ticket_type.event_id)
        .bind(&ticket_type.name)
        .bind(ticket_type.price)
        .bind(&ticket_type.description)
        .bind(ticket_type.total_available)
        .bind(ticket_type.created_at)
        .bind(ticket_type.updated_at)
        .fetch_one(&mut **tx)
        .await
}

/// Apply a reconciled change set. Returns the id of a kept ticket type that
/// no longer exists, in which case the caller must roll back.
async fn apply_ticket_type_changes(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
    changes: &TicketTypeChanges,
) -> Result<Option<Uuid>, sqlx::Error> {
    if !changes.removed.is_empty() {
        sqlx::query("DELETE FROM ticket_types WHERE event_id = $1 AND id = ANY($2)")
            .bind(event_id)
            .bind(&changes.removed)
            .execute(&mut **tx)
            .await?;
    }

    for ticket_type in &changes.updated {
        let result = sqlx::query(
            "UPDATE ticket_types SET \
                name = $3, price = $4, description = $5, total_available = $6, \
                updated_at = $7 \
             WHERE id = $1 AND event_id = $2",
        )
        .bind(ticket_type.id)
        .bind(event_id)
        .bind(&ticket_type.name)
        .bind(ticket_type.price)
        .bind(&ticket_type.description)
        .bind(ticket_type.total_available)
        .bind(ticket_type.updated_at)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(Some(ticket_type.id));
        }
    }

    for ticket_type in &changes.created {
        insert_ticket_type(tx, ticket_type).await?;
    }

    Ok(None)
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert(&self, event: &Event) -> Result<Event, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO events \
                (id, organizer_id, name, event_start, event_end, venue, \
                 sales_start, sales_end, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {EVENT_COLUMNS}"
        );
        let mut created = sqlx::query_as::<_, Event>(&query)
            .bind(event.id)
            .bind(event.organizer_id)
            .bind(&event.name)
            .bind(event.start)
            .bind(event.end)
            .bind(&event.venue)
            .bind(event.sales_start)
            .bind(event.sales_end)
            .bind(event.status)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        for ticket_type in &event.ticket_types {
            let stored = insert_ticket_type(&mut tx, ticket_type).await?;
            created.ticket_types.push(stored);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_organizer(
        &self,
        organizer_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error> {
        self.fetch_page("organizer_id = $1", organizer_id, page)
            .await
    }

    async fn find_by_id_and_organizer(
        &self,
        id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND organizer_id = $2");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(organizer_id)
            .fetch_optional(&self.pool)
            .await?;
        self.with_ticket_types_one(event).await
    }

    async fn update_with(
        &self,
        id: Uuid,
        organizer_id: Uuid,
        edit: EventEdit,
    ) -> Result<UpdateOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE id = $1 AND organizer_id = $2 FOR UPDATE"
        );
        let Some(mut event) = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(organizer_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(UpdateOutcome::NotFound);
        };

        let ticket_types_query = format!(
            "SELECT {TICKET_TYPE_COLUMNS} FROM ticket_types \
             WHERE event_id = $1 ORDER BY seq"
        );
        event.ticket_types = sqlx::query_as::<_, TicketType>(&ticket_types_query)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        let changes = match edit(&mut event) {
            Ok(changes) => changes,
            Err(error) => {
                tx.rollback().await?;
                return Ok(UpdateOutcome::Rejected(error));
            }
        };

        let query = format!(
            "UPDATE events SET \
                name = $2, event_start = $3, event_end = $4, venue = $5, \
                sales_start = $6, sales_end = $7, status = $8, updated_at = now() \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        let mut updated = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&event.name)
            .bind(event.start)
            .bind(event.end)
            .bind(&event.venue)
            .bind(event.sales_start)
            .bind(event.sales_end)
            .bind(event.status)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(missing) = apply_ticket_type_changes(&mut tx, id, &changes).await? {
            tx.rollback().await?;
            return Ok(UpdateOutcome::Rejected(AppError::TicketTypeNotFound(format!(
                "Ticket type with id {} not found",
                missing
            ))));
        }

        updated.ticket_types = sqlx::query_as::<_, TicketType>(&ticket_types_query)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(UpdateOutcome::Updated(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_status(
        &self,
        status: EventStatus,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error> {
        self.fetch_page("status = $1", status, page)
            .await
    }

    async fn search_published(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<Event>, sqlx::Error> {
        let filter = format!(
            "status = 'PUBLISHED' AND {SEARCH_DOCUMENT} @@ plainto_tsquery('english', $1)"
        );
        self.fetch_page(&filter, query, page).await
    }

    async fn find_by_id_and_status(
        &self,
        id: Uuid,
        status: EventStatus,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND status = $2");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        self.with_ticket_types_one(event).await
    }
}
