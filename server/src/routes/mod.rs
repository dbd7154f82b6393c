use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{events, health_check, published_events, ticket_types, tickets};
use crate::middleware::provision_user;
use crate::state::AppState;

/// Routes under `/api/v1`, all of which see the user provisioning layer.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            post(events::create_event).get(events::list_events),
        )
        .route(
            "/events/:event_id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/events/:event_id/ticket-types/:ticket_type_id/tickets",
            post(ticket_types::purchase_ticket),
        )
        .route(
            "/published-events",
            get(published_events::list_published_events),
        )
        .route(
            "/published-events/:event_id",
            get(published_events::get_published_event),
        )
        .route("/tickets", get(tickets::list_tickets))
        .route("/tickets/:ticket_id", get(tickets::get_ticket))
        .layer(middleware::from_fn_with_state(state, provision_user))
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
