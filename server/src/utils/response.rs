use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub message: String,
}

pub fn success<T>(data: T) -> Response
where
    T: Serialize,
{
    (StatusCode::OK, Json(data)).into_response()
}

pub fn created<T>(data: T) -> Response
where
    T: Serialize,
{
    (StatusCode::CREATED, Json(data)).into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Lookups that miss answer with an empty 404.
pub fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

pub fn error(message: impl Into<String>, status: StatusCode) -> Response {
    let body = ErrorDto {
        message: message.into(),
    };

    (status, Json(body)).into_response()
}
