//! Shared helpers for driving the router in integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use tickets_server::routes::create_routes;
use tickets_server::state::AppState;

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(state: AppState) -> Self {
        Self {
            router: create_routes(state),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(AppState::in_memory())
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send_raw(method, uri, user, body.map(|b| b.to_string()))
            .await
    }

    /// Like `send`, but with the body passed through untouched.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder
                .header("x-user-id", user.to_string())
                .header("x-user-name", "Test User")
                .header("x-user-email", "test@example.com");
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn create_event(&self, organizer: Uuid, body: Value) -> Value {
        let (status, json) = self
            .send(Method::POST, "/api/v1/events", Some(organizer), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {json}");
        json
    }
}

pub fn event_body(name: &str, status: &str) -> Value {
    json!({
        "name": name,
        "start": "2026-12-01T19:00:00Z",
        "end": "2026-12-01T23:00:00Z",
        "venue": "Riverside Arena",
        "sales_start": "2026-11-01T09:00:00Z",
        "sales_end": "2026-12-01T18:00:00Z",
        "status": status,
        "ticket_types": [
            { "name": "General", "price": "25.00", "description": "Standing", "total_available": 2 },
            { "name": "VIP", "price": 99.5, "total_available": 10 },
            { "name": "Crew", "price": "0", "description": null }
        ]
    })
}
