//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a request can hit, from a bad bearer token to a storage outage, ends up
//! as one of its variants so handlers and services can propagate with `?`.
//!
//! `AppError` implements `actix_web::error::ResponseError`. Authentication failures all
//! render the same generic 401 body so callers cannot tell a bad signature from an
//! expired token, and storage failures render a generic 500 while the detail goes to the log.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned for every authentication failure.
pub const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// The request carries no usable bearer credentials (HTTP 401).
    /// The message is kept for logs only; the response body is always generic.
    Unauthorized(String),
    /// The token codec rejected a token: malformed, wrong signature, wrong algorithm
    /// or expired (HTTP 401). Carries the underlying reason for logging.
    InvalidToken(String),
    /// The subject is authenticated but does not own the resource (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Input failed field constraints (HTTP 422).
    ValidationError(String),
    /// Storage failure (HTTP 500). Wraps errors from `sqlx`.
    DatabaseError(String),
    /// Any other unexpected server-side failure (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(_) | AppError::InvalidToken(_) => {
                HttpResponse::Unauthorized()
                    .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                    .json(json!({ "detail": CREDENTIALS_ERROR }))
            }
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => {
                HttpResponse::build(self.status_code()).json(json!({ "detail": msg }))
            }
            // Storage and internal failures never leak their detail to the client.
            AppError::DatabaseError(msg) | AppError::InternalServerError(msg) => {
                log::error!("{}: {}", self.status_code(), msg);
                HttpResponse::InternalServerError().json(json!({
                    "detail": "Internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Task not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}
