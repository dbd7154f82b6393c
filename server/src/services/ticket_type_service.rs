use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::PurchaseOutcome;
use crate::repositories::{TicketRepository, UserRepository};
use crate::utils::error::{AppError, AppResult};

/// Ticket sales against a ticket type's quota.
#[derive(Clone)]
pub struct TicketTypeService {
    users: Arc<dyn UserRepository>,
    tickets: Arc<dyn TicketRepository>,
}

impl TicketTypeService {
    pub fn new(users: Arc<dyn UserRepository>, tickets: Arc<dyn TicketRepository>) -> Self {
        Self { users, tickets }
    }

    /// Sell one ticket to `user_id`, returning the new ticket's id.
    pub async fn purchase_ticket(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        ticket_type_id: Uuid,
    ) -> AppResult<Uuid> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::UserNotFound(format!(
                "User with id {} not found",
                user_id
            )));
        }

        match self
            .tickets
            .purchase(user_id, event_id, ticket_type_id)
            .await?
        {
            PurchaseOutcome::Purchased(ticket_id) => {
                info!(ticket_id = %ticket_id, ticket_type_id = %ticket_type_id, user_id = %user_id, "Ticket purchased");
                Ok(ticket_id)
            }
            PurchaseOutcome::TicketTypeNotFound => Err(AppError::TicketTypeNotFound(format!(
                "Ticket type with id {} not found for event {}",
                ticket_type_id, event_id
            ))),
            PurchaseOutcome::SoldOut => {
                warn!(ticket_type_id = %ticket_type_id, "Purchase rejected, ticket type sold out");
                Err(AppError::TicketSoldOut(format!(
                    "Ticket type with id {} is sold out",
                    ticket_type_id
                )))
            }
        }
    }
}
