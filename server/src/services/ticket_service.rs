use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Page, PageRequest, Ticket};
use crate::repositories::TicketRepository;
use crate::utils::error::AppResult;

/// Read access to the tickets a user holds.
#[derive(Clone)]
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
}

impl TicketService {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    pub async fn list_tickets_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<Ticket>> {
        Ok(self.tickets.find_by_purchaser(user_id, page).await?)
    }

    pub async fn get_ticket_for_user(
        &self,
        user_id: Uuid,
        ticket_id: Uuid,
    ) -> AppResult<Option<Ticket>> {
        Ok(self
            .tickets
            .find_by_id_and_purchaser(ticket_id, user_id)
            .await?)
    }
}
