//! Organizer-scoped handlers for the `/events` resource.

use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::dtos::event::{
    CreateEventRequestDto, EventDetailsResponseDto, ListEventResponseDto, UpdateEventRequestDto,
};
use crate::dtos::page::PageParams;
use crate::extractors::{CurrentUser, PathParams, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, no_content, not_found, success};

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(organizer_id): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateEventRequestDto>,
) -> AppResult<Response> {
    let event = state
        .event_service
        .create_event(organizer_id, dto.into())
        .await?;
    Ok(created(EventDetailsResponseDto::from(event)))
}

/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    CurrentUser(organizer_id): CurrentUser,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> AppResult<Response> {
    let page = state
        .event_service
        .list_events_for_organizer(organizer_id, params.to_request())
        .await?;
    Ok(success(page.map(ListEventResponseDto::from)))
}

/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    CurrentUser(organizer_id): CurrentUser,
    PathParams(event_id): PathParams<Uuid>,
) -> AppResult<Response> {
    let event = state
        .event_service
        .get_event_for_organizer(organizer_id, event_id)
        .await?;
    Ok(match event {
        Some(event) => success(EventDetailsResponseDto::from(event)),
        None => not_found(),
    })
}

/// PUT /api/v1/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(organizer_id): CurrentUser,
    PathParams(event_id): PathParams<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateEventRequestDto>,
) -> AppResult<Response> {
    let event = state
        .event_service
        .update_event_for_organizer(organizer_id, event_id, dto.into())
        .await?;
    Ok(success(EventDetailsResponseDto::from(event)))
}

/// DELETE /api/v1/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(organizer_id): CurrentUser,
    PathParams(event_id): PathParams<Uuid>,
) -> AppResult<Response> {
    state
        .event_service
        .delete_event_for_organizer(organizer_id, event_id)
        .await?;
    Ok(no_content())
}
