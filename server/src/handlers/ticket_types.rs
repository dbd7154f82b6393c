use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::extractors::{CurrentUser, PathParams};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::no_content;

/// POST /api/v1/events/:event_id/ticket-types/:ticket_type_id/tickets
pub async fn purchase_ticket(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((event_id, ticket_type_id)): PathParams<(Uuid, Uuid)>,
) -> AppResult<Response> {
    state
        .ticket_type_service
        .purchase_ticket(user_id, event_id, ticket_type_id)
        .await?;
    Ok(no_content())
}
