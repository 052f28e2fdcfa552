// src/handlers/lookup.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    lookup::{ScoreTables, lookup},
    models::score::LookupRequest,
};

/// Looks up a previously recorded midterm score for a student.
pub async fn lookup_score(
    State(scores): State<Arc<dyn ScoreTables>>,
    Json(payload): Json<LookupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let record = lookup(
        scores.as_ref(),
        &payload.class_name,
        &payload.student_name,
        &payload.student_id,
    )
    .await?;

    Ok(Json(record))
}
