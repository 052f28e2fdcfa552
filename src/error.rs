// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses. Every failure
/// from the external stores is converted into one of these kinds at the
/// boundary; raw sqlx errors never reach the presentation layer.
#[derive(Debug)]
pub enum AppError {
    // 503: the question pool fetch failed or returned zero rows
    PoolUnavailable(String),

    // 500: the pool has fewer questions than a version needs
    PoolExhausted { needed: usize, available: usize },

    // 400: requested exam version outside 1..=4
    InvalidVariant(u32),

    // 400: malformed request payload
    BadRequest(String),

    // 409: a response record already exists for this student id
    DuplicateSubmission(String),

    // 500: inserting the exam response failed
    StoreWriteFailed(String),

    // 503: score table missing or inaccessible
    StoreUnreachable(String),

    // 500: a lookup query failed for a non-structural reason
    TransientQueryFailure(String),

    // 404: no score record matched any lookup strategy
    NotFound(String),

    // 500: everything else caught at the boundary
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PoolUnavailable(msg) => write!(f, "question pool unavailable: {msg}"),
            AppError::PoolExhausted { needed, available } => {
                write!(f, "question pool exhausted: need {needed}, have {available}")
            }
            AppError::InvalidVariant(version) => {
                write!(f, "invalid test version: {version}. Must be 1-4.")
            }
            AppError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            AppError::DuplicateSubmission(student_id) => {
                write!(f, "a response already exists for student {student_id}")
            }
            AppError::StoreWriteFailed(msg) => write!(f, "failed to save exam response: {msg}"),
            AppError::StoreUnreachable(msg) => write!(f, "score table not accessible: {msg}"),
            AppError::TransientQueryFailure(msg) => write!(f, "lookup query failed: {msg}"),
            AppError::NotFound(msg) => write!(f, "not found: {msg}"),
            AppError::InternalServerError(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::PoolUnavailable(msg) => {
                tracing::error!("Question pool unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Question pool unavailable".to_string(),
                )
            }
            AppError::PoolExhausted { needed, available } => {
                tracing::error!(
                    "Question pool exhausted: need {}, have {}",
                    needed,
                    available
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Not enough questions to build the exam".to_string(),
                )
            }
            AppError::InvalidVariant(version) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid test version: {version}. Must be 1-4."),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DuplicateSubmission(student_id) => (
                StatusCode::CONFLICT,
                format!("Student {student_id} has already completed the exam"),
            ),
            AppError::StoreWriteFailed(msg) => {
                tracing::error!("Failed to save exam response: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save exam response".to_string(),
                )
            }
            AppError::StoreUnreachable(msg) => {
                tracing::error!("Score table not accessible: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Score table not accessible. Please contact administrator.".to_string(),
                )
            }
            AppError::TransientQueryFailure(msg) => {
                tracing::error!("Lookup query failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Search failed. Please try again.".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries that have no more specific
/// domain mapping.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
