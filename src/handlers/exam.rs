// src/handlers/exam.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    generator::ExamGenerator,
    models::{
        response::{StartExamRequest, SubmitExamRequest},
        variant::PublicTestVersion,
    },
    scoring::{ResponseStore, has_existing_response, record_submission},
};

/// Returns one of the four fixed exam versions as a form-ready DTO.
///
/// Correct letters are stripped; grading happens server side at submit.
pub async fn get_test_version(
    State(generator): State<Arc<ExamGenerator>>,
    Path(version): Path<u32>,
) -> Result<impl IntoResponse, AppError> {
    let version = generator.test_version(version).await?;
    Ok(Json(PublicTestVersion::from(version.as_ref())))
}

/// Gate for starting an exam attempt.
///
/// Refuses when a response record already exists for the student id. The
/// check is best-effort: a failing store lets the attempt proceed rather
/// than locking the student out.
pub async fn start_exam(
    State(responses): State<Arc<dyn ResponseStore>>,
    Json(payload): Json<StartExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let student_id = payload.student_id.trim();
    if has_existing_response(responses.as_ref(), student_id).await {
        return Err(AppError::DuplicateSubmission(student_id.to_string()));
    }

    Ok(Json(json!({ "ok": true })))
}

/// Grades a completed exam against the cached version and records the
/// response.
pub async fn submit_exam(
    State(generator): State<Arc<ExamGenerator>>,
    State(responses): State<Arc<dyn ResponseStore>>,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let version = generator.test_version(payload.test_version).await?;

    let (outcomes, total_score) = record_submission(
        responses.as_ref(),
        payload.student_name.trim(),
        payload.student_id.trim(),
        &version,
        &payload.answers,
    )
    .await?;

    let correct_count = outcomes.iter().filter(|o| o.score > 0.0).count();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "total_score": total_score,
            "correct_count": correct_count,
            "total_questions": outcomes.len(),
        })),
    ))
}
