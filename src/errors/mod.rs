use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    DatabaseError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// Maps a store failure to a 500 carrying `message` as the client-facing category.
    /// The underlying cause is logged here and never sent to the client.
    pub fn store(message: &str, err: StoreError) -> Self {
        log::error!("{}: {}", message, err);
        AppError::DatabaseError(message.to_string())
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::DatabaseError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse { error: self.message().to_string() };
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            AppError::DatabaseError(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}
