// src/scoring.rs

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::response::{AnswerMap, ExamResponse, NewExamResponse, QuestionOutcome};
use crate::models::variant::TestVersion;

/// Weight of one correct answer: 40 questions sum to a 10.0 maximum.
pub const POINTS_PER_QUESTION: f64 = 0.25;

/// Append-only store of exam response records.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Insert one record. Atomic from the caller's point of view: either
    /// the whole record lands or nothing does.
    async fn insert(&self, record: &NewExamResponse) -> Result<(), AppError>;

    /// Most recent record for a student id, if any.
    async fn latest_for_student(&self, student_id: &str) -> Result<Option<ExamResponse>, AppError>;
}

/// Grade an answer map against one exam version.
///
/// Walks the 40 questions in display order; the student's letter for each
/// display number (empty string when unanswered) is compared with the
/// question's correct letter. Pure function of its inputs.
pub fn grade(version: &TestVersion, answers: &AnswerMap) -> (Vec<QuestionOutcome>, f64) {
    let mut outcomes = Vec::with_capacity(version.questions.len());
    let mut total_score = 0.0;

    for question in &version.questions {
        let student_answer = answers
            .get(&question.number)
            .cloned()
            .unwrap_or_default();
        let score = if student_answer == question.correct {
            POINTS_PER_QUESTION
        } else {
            0.0
        };
        total_score += score;

        outcomes.push(QuestionOutcome {
            text: question.prompt.clone(),
            // Stored as a nested JSON string, the format of the existing
            // records.
            choices: serde_json::to_string(&question.choices).unwrap_or_default(),
            student_answer,
            correct_answer: question.correct.clone(),
            score,
        });
    }

    (outcomes, total_score)
}

/// Grade a submission and persist a single response record.
pub async fn record_submission(
    store: &dyn ResponseStore,
    student_name: &str,
    student_id: &str,
    version: &TestVersion,
    answers: &AnswerMap,
) -> Result<(Vec<QuestionOutcome>, f64), AppError> {
    let (outcomes, total_score) = grade(version, answers);

    let record = NewExamResponse {
        student_name: student_name.to_string(),
        student_id: student_id.to_string(),
        test_version: version.version as i32,
        responses: serde_json::to_string(&outcomes)?,
        total_score,
    };

    store.insert(&record).await?;

    tracing::info!(
        student_id,
        test_version = version.version,
        total_score,
        "exam response recorded"
    );

    Ok((outcomes, total_score))
}

/// Best-effort duplicate check before an exam starts. A store failure must
/// not lock a student out of the exam, so it is logged and treated as "no
/// prior record"; the small double-submission window this leaves open is
/// accepted.
pub async fn has_existing_response(store: &dyn ResponseStore, student_id: &str) -> bool {
    match store.latest_for_student(student_id).await {
        Ok(existing) => existing.is_some(),
        Err(e) => {
            tracing::warn!(
                student_id,
                error = %e,
                "existing-response check failed, allowing the attempt"
            );
            false
        }
    }
}
