use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::utils::response::error as error_response;

const GENERIC_VALIDATION_MESSAGE: &str = "Validation error occurred";
const GENERIC_CONSTRAINT_MESSAGE: &str = "Constraint violation occurred";
const GENERIC_INTERNAL_MESSAGE: &str = "An unknown error occurred";

/// A single violated constraint on a query or path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub property_path: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }
}

// `TicketNotFound` and the QR code kinds have no producer in this service:
// ticket reads answer an empty 404 and QR codes are rendered elsewhere. They
// stay so that every error the API can document has one status and message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Ticket sold out: {0}")]
    TicketSoldOut(String),

    #[error("QR code not found: {0}")]
    QrCodeNotFound(String),

    #[error("QR code generation failed: {0}")]
    QrCodeGeneration(String),

    #[error("Event update error: {0}")]
    EventUpdate(String),

    #[error("Ticket type not found: {0}")]
    TicketTypeNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Constraint violation: {0:?}")]
    ConstraintViolation(Vec<ConstraintViolation>),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::TicketNotFound(_)
            | AppError::TicketSoldOut(_)
            | AppError::EventUpdate(_)
            | AppError::TicketTypeNotFound(_)
            | AppError::EventNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::Validation(_)
            | AppError::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
            AppError::QrCodeNotFound(_)
            | AppError::QrCodeGeneration(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message exposed to the caller. Never carries internal detail.
    pub fn public_message(&self) -> String {
        match self {
            AppError::TicketNotFound(_) => "Ticket not found".to_string(),
            AppError::TicketSoldOut(_) => "Tickets are sold out for this ticket type".to_string(),
            AppError::QrCodeNotFound(_) => "QR Code not found".to_string(),
            AppError::QrCodeGeneration(_) => "Unable to generate QR Code".to_string(),
            AppError::EventUpdate(_) => "Unable to update event".to_string(),
            AppError::TicketTypeNotFound(_) => "Ticket type not found".to_string(),
            AppError::EventNotFound(_) => "Event not found".to_string(),
            AppError::UserNotFound(_) => "User not found".to_string(),
            AppError::Validation(errors) => first_field_error(errors)
                .map(|(field, message)| format!("{}: {}", field, message))
                .unwrap_or_else(|| GENERIC_VALIDATION_MESSAGE.to_string()),
            AppError::ConstraintViolation(violations) => violations
                .first()
                .map(|v| format!("{}: {}", v.property_path, v.message))
                .unwrap_or_else(|| GENERIC_CONSTRAINT_MESSAGE.to_string()),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                GENERIC_INTERNAL_MESSAGE.to_string()
            }
        }
    }

    fn log(&self) {
        match self {
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::Validation(errors) => {
                error!(errors = ?errors, "Request validation failed");
            }
            AppError::ConstraintViolation(violations) => {
                error!(violations = ?violations, "Constraint violation");
            }
            other => {
                error!(error = ?other, message = %other, "Application error");
            }
        }
    }
}

/// Turn a set of validation errors into constraint violations, ordered the
/// same way the first body field error is chosen.
pub fn constraint_violations(errors: &ValidationErrors) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();
    collect_field_errors(errors, "", &mut violations);
    violations
}

/// Deterministically pick the first field error: fields in lexicographic
/// order, nested paths expanded depth first, first error per field.
pub fn first_field_error(errors: &ValidationErrors) -> Option<(String, String)> {
    let mut violations = Vec::new();
    collect_field_errors(errors, "", &mut violations);
    violations
        .into_iter()
        .next()
        .map(|v| (v.property_path, v.message))
}

fn collect_field_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<ConstraintViolation>) {
    let mut fields: Vec<(String, &ValidationErrorsKind)> = errors
        .errors()
        .iter()
        .map(|(field, kind)| (field.to_string(), kind))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    for (field, kind) in fields {
        let path = if prefix.is_empty() {
            field
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(first) = field_errors.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    out.push(ConstraintViolation::new(path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected JSON body");
        AppError::Validation(ValidationErrors::new())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected query string");
        AppError::ConstraintViolation(Vec::new())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected path parameters");
        AppError::ConstraintViolation(Vec::new())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal details
        self.log();

        error_response(self.public_message(), status)
    }
}
