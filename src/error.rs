//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management so that every failure a
//! caller can observe is rendered as the same JSON payload shape:
//! `{"errorTitle": "...", "error": "..."}`.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly
//! convert application errors into HTTP responses. `From` implementations for
//! `sqlx::Error`, `validator::ValidationErrors`, `jsonwebtoken::errors::Error`
//! and `bcrypt::BcryptError` allow propagation with the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all caller-visible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or invalid request payload (HTTP 400).
    ValidationError(String),
    /// Bad search criteria: unknown sort field or direction (HTTP 400).
    InvalidCriteria(String),
    /// A private endpoint was reached without an authenticated identity (HTTP 401).
    Unauthorized(String),
    /// The bearer token is malformed, expired, forged, or names an unknown
    /// subject (HTTP 401). All token failures share this variant so callers
    /// cannot distinguish the failure mode.
    TokenInvalid(String),
    /// The requester is authenticated but does not own the resource (HTTP 403).
    NotPermitted(String),
    /// The requested card does not exist (HTTP 404).
    CardNotFound(String),
    /// Identity lookup failed during login: unknown email or wrong password,
    /// surfaced uniformly as not-found (HTTP 404).
    CredentialsNotFound(String),
    /// Registration attempted with an email that is already taken (HTTP 409).
    EmailAlreadyExists(String),
    /// Error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
}

impl AppError {
    /// The `errorTitle` field of the wire payload for this error.
    fn error_title(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "Error in fields",
            AppError::InvalidCriteria(_) => "Invalid criteria",
            AppError::Unauthorized(_) => "Authentication error",
            AppError::TokenInvalid(_) => "Error with token",
            AppError::NotPermitted(_) => "Authorization error",
            AppError::CardNotFound(_) => "Card error",
            AppError::CredentialsNotFound(_) => "Credentials error",
            AppError::EmailAlreadyExists(_) => "Email error",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "Internal error",
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::InvalidCriteria(msg)
            | AppError::Unauthorized(msg)
            | AppError::TokenInvalid(msg)
            | AppError::NotPermitted(msg)
            | AppError::CardNotFound(msg)
            | AppError::CredentialsNotFound(msg)
            | AppError::EmailAlreadyExists(msg)
            | AppError::DatabaseError(msg)
            | AppError::InternalServerError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.error_title(), self.message())
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Database and internal errors are presented to the client with a generic
/// body; the detail stays in the server log.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidCriteria(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
            AppError::NotPermitted(_) => StatusCode::FORBIDDEN,
            AppError::CardNotFound(_) | AppError::CredentialsNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::DatabaseError(msg) | AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                json!({
                    "errorTitle": self.error_title(),
                    "error": "Unexpected server error"
                })
            }
            _ => json!({
                "errorTitle": self.error_title(),
                "error": self.message()
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `CardNotFound` (cards are the only entity fetched
/// by id after an existence check); everything else is a database error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::CardNotFound("Card with given id not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`,
/// preserving the per-field messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::TokenInvalid`.
///
/// Malformed, expired and forged tokens all collapse into the same message,
/// so the rejection leaks nothing about which check failed.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::TokenInvalid("Your token is not valid, regenerate token".into())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
