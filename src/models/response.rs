// src/models/response.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Mapping from display question number (1..=40) to the selected slot
/// letter. Unanswered questions are simply absent.
pub type AnswerMap = HashMap<u8, String>;

/// Represents the 'exam_responses' table: one row per submitted exam,
/// insert-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamResponse {
    pub id: i64,
    pub student_name: String,
    pub student_id: String,
    pub test_version: i32,

    /// JSON-encoded `Vec<QuestionOutcome>`, stored as text.
    pub responses: String,

    pub total_score: f64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Per-question outcome serialized into `ExamResponse::responses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// Prompt text of the graded question.
    pub text: String,

    /// The display choices, JSON-encoded as a string of its own so the
    /// stored record matches the historical format.
    pub choices: String,

    /// The student's selected letter, or empty string when unanswered.
    pub student_answer: String,

    /// The correct slot letter the answer was compared against.
    pub correct_answer: String,

    pub score: f64,
}

/// Values for one insert into 'exam_responses'.
#[derive(Debug, Clone)]
pub struct NewExamResponse {
    pub student_name: String,
    pub student_id: String,
    pub test_version: i32,
    pub responses: String,
    pub total_score: f64,
}

/// DTO for starting an exam attempt (runs the duplicate check).
#[derive(Debug, Deserialize, Validate)]
pub struct StartExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub student_name: String,
    #[validate(length(min = 1, max = 50))]
    pub student_id: String,
}

/// DTO for submitting a completed exam.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub student_name: String,

    #[validate(length(min = 1, max = 50))]
    pub student_id: String,

    #[validate(range(min = 1, max = 4))]
    pub test_version: u32,

    /// Key: display question number (1..=40).
    /// Value: selected slot letter (A-D).
    #[validate(custom(function = validate_answers))]
    pub answers: AnswerMap,
}

fn validate_answers(answers: &AnswerMap) -> Result<(), validator::ValidationError> {
    for (number, letter) in answers {
        if !(1..=40).contains(number) {
            return Err(validator::ValidationError::new("question_number_out_of_range"));
        }
        if !matches!(letter.as_str(), "A" | "B" | "C" | "D") {
            return Err(validator::ValidationError::new("invalid_choice_letter"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(answers: AnswerMap) -> SubmitExamRequest {
        SubmitExamRequest {
            student_name: "Nguyen Van A".to_string(),
            student_id: "123".to_string(),
            test_version: 1,
            answers,
        }
    }

    #[test]
    fn accepts_partial_answer_map() {
        let mut answers = AnswerMap::new();
        answers.insert(1, "A".to_string());
        answers.insert(40, "D".to_string());
        assert!(request(answers).validate().is_ok());
        assert!(request(AnswerMap::new()).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_question_number() {
        let mut answers = AnswerMap::new();
        answers.insert(41, "A".to_string());
        assert!(request(answers).validate().is_err());

        let mut answers = AnswerMap::new();
        answers.insert(0, "A".to_string());
        assert!(request(answers).validate().is_err());
    }

    #[test]
    fn rejects_invalid_letter() {
        let mut answers = AnswerMap::new();
        answers.insert(3, "E".to_string());
        assert!(request(answers).validate().is_err());

        let mut answers = AnswerMap::new();
        answers.insert(3, "a".to_string());
        assert!(request(answers).validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_version() {
        let mut req = request(AnswerMap::new());
        req.test_version = 5;
        assert!(req.validate().is_err());
        req.test_version = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn answer_map_deserializes_from_string_keys() {
        // JSON object keys are strings; serde maps them onto u8.
        let req: SubmitExamRequest = serde_json::from_str(
            r#"{
                "student_name": "Nguyen Van A",
                "student_id": "123",
                "test_version": 2,
                "answers": {"1": "A", "17": "C"}
            }"#,
        )
        .unwrap();
        assert_eq!(req.answers.get(&1), Some(&"A".to_string()));
        assert_eq!(req.answers.get(&17), Some(&"C".to_string()));
    }
}
