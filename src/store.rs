// src/store.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::generator::QuestionSource;
use crate::lookup::{LookupFailure, MatchStrategy, ScoreTables};
use crate::models::question::PoolQuestion;
use crate::models::response::{ExamResponse, NewExamResponse};
use crate::models::score::ScoreRecord;
use crate::scoring::ResponseStore;

/// Imported question bank table.
const POOL_TABLE: &str = "test_library_lec1_lec6.csv";

/// Question pool backed by the imported bank table. Rows are mapped into
/// `PoolQuestion` here; untyped rows never leave this module.
pub struct PgQuestionSource {
    pool: PgPool,
}

impl PgQuestionSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionSource for PgQuestionSource {
    async fn fetch_all(&self) -> Result<Vec<PoolQuestion>, AppError> {
        let sql = format!(
            r#"
            SELECT
                "Text đáp án",
                "Lựa chọn A",
                "Lựa chọn B",
                "Lựa chọn C",
                "Lựa chọn D",
                "Đáp án đúng",
                "Điểm"
            FROM "{POOL_TABLE}"
            ORDER BY "Text đáp án" ASC
            "#
        );

        sqlx::query_as::<_, PoolQuestion>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch question pool: {:?}", e);
                AppError::PoolUnavailable(e.to_string())
            })
    }
}

/// Append-only 'exam_responses' store.
pub struct PgResponseStore {
    pool: PgPool,
}

impl PgResponseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseStore for PgResponseStore {
    async fn insert(&self, record: &NewExamResponse) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO exam_responses
                (student_name, student_id, test_version, responses, total_score)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&record.student_name)
        .bind(&record.student_id)
        .bind(record.test_version)
        .bind(&record.responses)
        .bind(record.total_score)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert exam response: {:?}", e);
            AppError::StoreWriteFailed(e.to_string())
        })?;

        Ok(())
    }

    async fn latest_for_student(&self, student_id: &str) -> Result<Option<ExamResponse>, AppError> {
        let record = sqlx::query_as::<_, ExamResponse>(
            r#"
            SELECT id, student_name, student_id, test_version, responses, total_score, created_at
            FROM exam_responses
            WHERE student_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

/// Per-class score tables imported from the grading pipeline.
pub struct PgScoreTables {
    pool: PgPool,
}

impl PgScoreTables {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Postgres error code for "relation does not exist".
const UNDEFINED_TABLE: &str = "42P01";

fn classify(e: sqlx::Error) -> LookupFailure {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some(UNDEFINED_TABLE) {
            return LookupFailure::TableMissing(db.message().to_string());
        }
    }
    LookupFailure::Query(e.to_string())
}

#[async_trait]
impl ScoreTables for PgScoreTables {
    async fn find(
        &self,
        table: &str,
        strategy: &MatchStrategy,
    ) -> Result<Option<ScoreRecord>, LookupFailure> {
        // `table` comes from the fixed class mapping, never from user
        // input, so interpolating the quoted identifier is safe.
        let columns = r#""Tên", "MSV", "Số câu đúng", "Điểm""#;

        let result = match strategy {
            MatchStrategy::ExactNumeric { name, msv } => {
                let sql = format!(
                    r#"SELECT {columns} FROM "{table}" WHERE "Tên" = $1 AND "MSV" = $2 LIMIT 1"#
                );
                sqlx::query_as::<_, ScoreRecord>(&sql)
                    .bind(name)
                    .bind(msv)
                    .fetch_optional(&self.pool)
                    .await
            }
            MatchStrategy::ExactText { name, msv } => {
                let sql = format!(
                    r#"SELECT {columns} FROM "{table}" WHERE "Tên" = $1 AND "MSV"::TEXT = $2 LIMIT 1"#
                );
                sqlx::query_as::<_, ScoreRecord>(&sql)
                    .bind(name)
                    .bind(msv)
                    .fetch_optional(&self.pool)
                    .await
            }
            MatchStrategy::FuzzyNameNumeric { name_fragment, msv } => {
                let sql = format!(
                    r#"SELECT {columns} FROM "{table}" WHERE "Tên" ILIKE $1 AND "MSV" = $2 LIMIT 1"#
                );
                sqlx::query_as::<_, ScoreRecord>(&sql)
                    .bind(format!("%{name_fragment}%"))
                    .bind(msv)
                    .fetch_optional(&self.pool)
                    .await
            }
        };

        result.map_err(classify)
    }
}
