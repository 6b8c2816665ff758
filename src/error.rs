//!
//! # Error Handling
//!
//! Central error type for the application. Every fallible path, from
//! database access and input validation to credential checks and token
//! handling, funnels into [`AppError`], which implements
//! `actix_web::error::ResponseError` so that handlers and middleware can
//! bubble errors with `?` and still produce the right HTTP status and a
//! JSON body.
//!
//! Status mapping:
//! - `ValidationError`, `BadRequest` → 400
//! - `Unauthorized` → 401
//! - `Forbidden` → 403
//! - `NotFound` → 404
//! - `Conflict` → 409
//! - `DatabaseError`, `InternalServerError` → 500
//!
//! 5xx responses never echo the underlying error outside debug builds; the
//! detail goes to the log and the client sees a generic message.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Application-level error taxonomy.
#[derive(Debug)]
pub enum AppError {
    /// Input failed validation (missing or malformed fields).
    ValidationError(String),
    /// The request is well-formed but cannot be satisfied as asked.
    BadRequest(String),
    /// Authentication is missing or no longer honored.
    Unauthorized(String),
    /// Authenticated, but lacking the role or ownership the operation needs.
    Forbidden(String),
    /// The referenced entity does not exist.
    NotFound(String),
    /// A storage-level uniqueness constraint rejected the write.
    Conflict(String),
    /// The database reported a failure that is not the caller's fault.
    DatabaseError(String),
    /// Anything else that should never happen.
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ValidationError(msg) | AppError::BadRequest(msg) => {
                HttpResponse::BadRequest().json(json!({ "error": msg }))
            }
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::DatabaseError(msg) | AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                if cfg!(debug_assertions) {
                    HttpResponse::InternalServerError().json(json!({ "error": msg }))
                } else {
                    HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
                }
            }
        }
    }
}

/// Maps database failures onto the taxonomy.
///
/// `RowNotFound` becomes 404. Unique-constraint violations (SQLSTATE 23505)
/// become `Conflict`; this is the path a concurrent duplicate registration
/// takes when it loses the race past the handler's pre-check.
/// Foreign-key violations (23503) become `BadRequest`, since they mean the
/// caller referenced a user that does not exist.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => AppError::Conflict("Resource already exists".into()),
                Some("23503") => AppError::BadRequest("Referenced record does not exist".into()),
                _ => AppError::DatabaseError(error.to_string()),
            },
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
