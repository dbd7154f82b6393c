use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    EventStatus, Page, PageRequest, PurchaseOutcome, Ticket, TicketStatus,
};
use crate::repositories::TicketRepository;

/// Ticket read model: ticket joined with its ticket type and event.
const TICKET_SELECT: &str = "SELECT \
        t.id, t.status, t.purchaser_id, t.ticket_type_id, \
        tt.name AS ticket_type_name, tt.price, tt.description, \
        e.id AS event_id, e.name AS event_name, e.venue AS event_venue, \
        e.event_start, e.event_end, t.created_at \
    FROM tickets t \
    JOIN ticket_types tt ON tt.id = t.ticket_type_id \
    JOIN events e ON e.id = tt.event_id";

#[derive(Clone)]
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn find_by_purchaser(
        &self,
        purchaser_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Ticket>, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE purchaser_id = $1")
            .bind(purchaser_id)
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            "{TICKET_SELECT} WHERE t.purchaser_id = $1 \
             ORDER BY t.created_at DESC, t.id LIMIT $2 OFFSET $3"
        );
        let tickets = sqlx::query_as::<_, Ticket>(&query)
            .bind(purchaser_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(tickets, page, total))
    }

    async fn find_by_id_and_purchaser(
        &self,
        id: Uuid,
        purchaser_id: Uuid,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("{TICKET_SELECT} WHERE t.id = $1 AND t.purchaser_id = $2");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(purchaser_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn purchase(
        &self,
        purchaser_id: Uuid,
        event_id: Uuid,
        ticket_type_id: Uuid,
    ) -> Result<PurchaseOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // The row lock serialises concurrent purchases of the same ticket type.
        let quota: Option<(Option<i32>,)> = sqlx::query_as(
            "SELECT tt.total_available FROM ticket_types tt \
             JOIN events e ON e.id = tt.event_id \
             WHERE tt.id = $1 AND tt.event_id = $2 AND e.status = $3 \
             FOR UPDATE OF tt",
        )
        .bind(ticket_type_id)
        .bind(event_id)
        .bind(EventStatus::Published)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((total_available,)) = quota else {
            tx.rollback().await?;
            return Ok(PurchaseOutcome::TicketTypeNotFound);
        };

        if let Some(total_available) = total_available {
            let sold: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM tickets WHERE ticket_type_id = $1 AND status = $2",
            )
            .bind(ticket_type_id)
            .bind(TicketStatus::Purchased)
            .fetch_one(&mut *tx)
            .await?;

            if sold + 1 > i64::from(total_available) {
                tx.rollback().await?;
                return Ok(PurchaseOutcome::SoldOut);
            }
        }

        let ticket_id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO tickets (id, status, ticket_type_id, purchaser_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5)",
        )
        .bind(ticket_id)
        .bind(TicketStatus::Purchased)
        .bind(ticket_type_id)
        .bind(purchaser_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(PurchaseOutcome::Purchased(ticket_id))
    }
}
