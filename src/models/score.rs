// src/models/score.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// One row of a per-class score table. These tables are produced by the
/// grading pipeline and imported per class section; this crate only reads
/// them. Column names are the import's Vietnamese headers, mapped here.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Student name ('Tên').
    #[sqlx(rename = "Tên")]
    pub student_name: String,

    /// Numeric student identifier ('MSV').
    #[sqlx(rename = "MSV")]
    pub msv: i64,

    /// Count of correct answers ('Số câu đúng'), kept as imported text.
    #[sqlx(rename = "Số câu đúng")]
    pub correct_count: String,

    /// Final grade ('Điểm'), kept as imported text.
    #[sqlx(rename = "Điểm")]
    pub grade: String,
}

/// DTO for the score lookup form.
#[derive(Debug, Deserialize, Validate)]
pub struct LookupRequest {
    #[validate(length(min = 1, max = 100))]
    pub class_name: String,
    #[validate(length(min = 1, max = 200))]
    pub student_name: String,
    #[validate(length(min = 1, max = 50))]
    pub student_id: String,
}
