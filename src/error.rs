//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the tagged error kind returned by every service
//! operation. Callers dispatch on the variant, never on the message text.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can return it
//! directly and the HTTP boundary maps each kind to its status code. Internal failures
//! are logged here and answered with a fixed message so no driver or hashing detail
//! reaches the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed or invalid input the client can fix (HTTP 400).
    Validation(String),
    /// A unique key is already taken, e.g. a registered email (HTTP 409).
    Conflict(String),
    /// Bad credentials or a missing, malformed, forged or expired token (HTTP 401).
    /// The message never says which check failed.
    Unauthorized(String),
    /// The caller is authenticated but not allowed to perform the action (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist or is not visible to the caller (HTTP 404).
    NotFound(String),
    /// Hashing, signing or persistence failure (HTTP 500).
    /// The payload is for the server log only.
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// The text sent to the client. Internal detail is replaced by a fixed message.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg,
            AppError::Internal(_) => INTERNAL_MESSAGE,
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            log::error!("{}", detail);
        }
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            code: status.as_u16(),
            message: self.public_message().to_string(),
        })
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique-constraint violation only happens on `users.email`, so it becomes the same
/// `Conflict` the registration pre-check produces.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("email already registered".into())
            }
            _ => AppError::Internal(format!("database error: {}", error)),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Error handler for `web::JsonConfig`, so undecodable bodies answer with the JSON error shape.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::Validation(format!("invalid request body: {}", err)).into()
}

/// Error handler for `web::QueryConfig`, e.g. an unknown `status` filter value.
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::Validation(format!("invalid query string: {}", err)).into()
}

/// Error handler for `web::PathConfig`. An id that does not parse can never name a task.
pub fn path_error_handler(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("unparseable path segment: {}", err);
    AppError::NotFound("task not found".into()).into()
}
