//! Handlers for the caller's own `/tickets`.

use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::dtos::page::PageParams;
use crate::dtos::ticket::{GetTicketResponseDto, ListTicketResponseDto};
use crate::extractors::{CurrentUser, PathParams, ValidatedQuery};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{not_found, success};

/// GET /api/v1/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> AppResult<Response> {
    let page = state
        .ticket_service
        .list_tickets_for_user(user_id, params.to_request())
        .await?;
    Ok(success(page.map(ListTicketResponseDto::from)))
}

/// GET /api/v1/tickets/:ticket_id
pub async fn get_ticket(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(ticket_id): PathParams<Uuid>,
) -> AppResult<Response> {
    Ok(
        match state.ticket_service.get_ticket_for_user(user_id, ticket_id).await? {
            Some(ticket) => success(GetTicketResponseDto::from(ticket)),
            None => not_found(),
        },
    )
}
