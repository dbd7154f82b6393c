//! Tests for `AppError` → HTTP response mapping.
//!
//! They call `IntoResponse` directly; no router or database is involved.

use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use tickets_server::utils::error::{AppError, ConstraintViolation};
use validator::{ValidationError, ValidationErrors};

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

#[tokio::test]
async fn domain_errors_map_to_fixed_status_and_message() {
    let cases = vec![
        (AppError::TicketNotFound("t1".into()), StatusCode::BAD_REQUEST, "Ticket not found"),
        (
            AppError::TicketSoldOut("tt1".into()),
            StatusCode::BAD_REQUEST,
            "Tickets are sold out for this ticket type",
        ),
        (
            AppError::QrCodeNotFound("q1".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "QR Code not found",
        ),
        (
            AppError::QrCodeGeneration("encoder failed".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to generate QR Code",
        ),
        (
            AppError::EventUpdate("Event id must be present".into()),
            StatusCode::BAD_REQUEST,
            "Unable to update event",
        ),
        (
            AppError::TicketTypeNotFound("tt2".into()),
            StatusCode::BAD_REQUEST,
            "Ticket type not found",
        ),
        (AppError::EventNotFound("e1".into()), StatusCode::BAD_REQUEST, "Event not found"),
        (AppError::UserNotFound("u1".into()), StatusCode::BAD_REQUEST, "User not found"),
    ];

    for (err, expected_status, expected_message) in cases {
        let (status, json) = error_to_response(err).await;
        assert_eq!(status, expected_status);
        assert_eq!(json, serde_json::json!({ "message": expected_message }));
    }
}

#[tokio::test]
async fn validation_error_reports_first_field_by_name() {
    let mut errors = ValidationErrors::new();
    errors.add("venue", field_error("length", "Venue information is required"));
    errors.add("name", field_error("length", "Event name is required"));

    let (status, json) = error_to_response(AppError::Validation(errors)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "name: Event name is required");
}

#[tokio::test]
async fn validation_error_without_fields_uses_generic_message() {
    let (status, json) = error_to_response(AppError::Validation(ValidationErrors::new())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Validation error occurred");
}

#[tokio::test]
async fn validation_error_without_message_falls_back_to_code() {
    let mut errors = ValidationErrors::new();
    errors.add("name", ValidationError::new("length"));

    let (_, json) = error_to_response(AppError::Validation(errors)).await;

    assert_eq!(json["message"], "name: length");
}

#[tokio::test]
async fn constraint_violation_reports_first_violation() {
    let err = AppError::ConstraintViolation(vec![
        ConstraintViolation::new("size", "must be between 1 and 100"),
        ConstraintViolation::new("page", "must not be negative"),
    ]);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "size: must be between 1 and 100");
}

#[tokio::test]
async fn constraint_violation_without_entries_uses_generic_message() {
    let (status, json) = error_to_response(AppError::ConstraintViolation(vec![])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Constraint violation occurred");
}

#[tokio::test]
async fn internal_errors_never_leak_details() {
    let (status, json) = error_to_response(AppError::InternalServerError(
        "password=hunter2 leaked in stack".into(),
    ))
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "message": "An unknown error occurred" }));

    let (status, json) =
        error_to_response(AppError::DatabaseError(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "message": "An unknown error occurred" }));
}
