//! Public, read-only handlers for `/published-events`.

use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::dtos::event::{GetPublishedEventDetailsResponseDto, ListPublishedEventResponseDto};
use crate::dtos::page::SearchParams;
use crate::extractors::{PathParams, ValidatedQuery};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{not_found, success};

/// GET /api/v1/published-events?q=
pub async fn list_published_events(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> AppResult<Response> {
    let page = params.to_request();
    let events = match params.query() {
        Some(query) => {
            state
                .event_service
                .search_published_events(query, page)
                .await?
        }
        None => state.event_service.list_published_events(page).await?,
    };
    Ok(success(events.map(ListPublishedEventResponseDto::from)))
}

/// GET /api/v1/published-events/:event_id
pub async fn get_published_event(
    State(state): State<AppState>,
    PathParams(event_id): PathParams<Uuid>,
) -> AppResult<Response> {
    Ok(match state.event_service.get_published_event(event_id).await? {
        Some(event) => success(GetPublishedEventDetailsResponseDto::from(event)),
        None => not_found(),
    })
}
