// src/lookup.rs

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::score::ScoreRecord;

/// Class section → imported score table. Unknown sections fall back to the
/// Thursday table, matching the lookup form's default selection.
pub fn class_table(class_name: &str) -> &'static str {
    match class_name {
        "Thứ 5, tiết 7-8" => "DS_Thurs _7_8_Midterm.csv",
        "Thứ 4, tiết 5-6" => "DS_Wed _5_6_Midterm.csv",
        "Thứ 6, tiết 1-2" => "DS_Fri_1_2_Midterm.csv",
        _ => "DS_Thurs _7_8_Midterm.csv",
    }
}

/// One way of matching a student row, tried in the fixed order produced by
/// [`plan_strategies`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Exact name, identifier compared numerically.
    ExactNumeric { name: String, msv: i64 },
    /// Exact name, identifier compared as text.
    ExactText { name: String, msv: String },
    /// Case-insensitive substring on the name, numeric identifier.
    FuzzyNameNumeric { name_fragment: String, msv: i64 },
}

/// Failure modes of a single strategy query, classified at the store
/// boundary.
#[derive(Debug)]
pub enum LookupFailure {
    /// The class table does not exist or cannot be reached.
    TableMissing(String),
    /// The query failed for a non-structural reason.
    Query(String),
}

/// Per-class score table access. One implementation per backing store;
/// `table` is the name resolved by [`class_table`].
#[async_trait]
pub trait ScoreTables: Send + Sync {
    async fn find(
        &self,
        table: &str,
        strategy: &MatchStrategy,
    ) -> Result<Option<ScoreRecord>, LookupFailure>;
}

/// Build the strategy sequence for one lookup. Inputs are trimmed first.
/// Strategies that compare the identifier numerically are planned only when
/// it parses as an integer; a non-numeric id can never match them.
pub fn plan_strategies(student_name: &str, student_id: &str) -> Vec<MatchStrategy> {
    let name = student_name.trim().to_string();
    let id_text = student_id.trim().to_string();
    let id_num: Option<i64> = id_text.parse().ok();

    let mut strategies = Vec::with_capacity(3);
    if let Some(msv) = id_num {
        strategies.push(MatchStrategy::ExactNumeric {
            name: name.clone(),
            msv,
        });
    }
    strategies.push(MatchStrategy::ExactText {
        name: name.clone(),
        msv: id_text,
    });
    if let Some(msv) = id_num {
        strategies.push(MatchStrategy::FuzzyNameNumeric {
            name_fragment: name,
            msv,
        });
    }
    strategies
}

/// Search the class's score table for a student, trying progressively
/// looser strategies until one yields a row. Each strategy runs at most
/// once. A strategy failure does not stop the attempt; if every strategy
/// comes up empty, the first failure (if any) is reported, otherwise the
/// result is `NotFound`.
pub async fn lookup(
    tables: &dyn ScoreTables,
    class_name: &str,
    student_name: &str,
    student_id: &str,
) -> Result<ScoreRecord, AppError> {
    let table = class_table(class_name);
    let mut first_failure: Option<LookupFailure> = None;

    for strategy in plan_strategies(student_name, student_id) {
        match tables.find(table, &strategy).await {
            Ok(Some(record)) => return Ok(record),
            Ok(None) => {}
            Err(failure) => {
                tracing::warn!(table, ?strategy, ?failure, "lookup strategy failed");
                first_failure.get_or_insert(failure);
            }
        }
    }

    match first_failure {
        Some(LookupFailure::TableMissing(msg)) => Err(AppError::StoreUnreachable(msg)),
        Some(LookupFailure::Query(msg)) => Err(AppError::TransientQueryFailure(msg)),
        None => Err(AppError::NotFound(
            "No record found. Please check your name or student ID.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn record(name: &str, msv: i64) -> ScoreRecord {
        ScoreRecord {
            student_name: name.to_string(),
            msv,
            correct_count: "32".to_string(),
            grade: "8.0".to_string(),
        }
    }

    /// Emulates a per-class table with the three matching modes, recording
    /// which strategies were attempted.
    struct MemoryTables {
        table: &'static str,
        rows: Vec<ScoreRecord>,
        seen: Mutex<Vec<MatchStrategy>>,
    }

    impl MemoryTables {
        fn new(table: &'static str, rows: Vec<ScoreRecord>) -> Self {
            Self {
                table,
                rows,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ScoreTables for MemoryTables {
        async fn find(
            &self,
            table: &str,
            strategy: &MatchStrategy,
        ) -> Result<Option<ScoreRecord>, LookupFailure> {
            assert_eq!(table, self.table, "wrong table for this class");
            self.seen.lock().unwrap().push(strategy.clone());

            let hit = match strategy {
                MatchStrategy::ExactNumeric { name, msv } => self
                    .rows
                    .iter()
                    .find(|r| &r.student_name == name && r.msv == *msv),
                MatchStrategy::ExactText { name, msv } => self
                    .rows
                    .iter()
                    .find(|r| &r.student_name == name && r.msv.to_string() == *msv),
                MatchStrategy::FuzzyNameNumeric { name_fragment, msv } => {
                    let fragment = name_fragment.to_lowercase();
                    self.rows.iter().find(|r| {
                        r.student_name.to_lowercase().contains(&fragment) && r.msv == *msv
                    })
                }
            };
            Ok(hit.cloned())
        }
    }

    /// Fails selected strategies, succeeds (empty) otherwise.
    struct FailingTables {
        failure_on_exact: fn() -> LookupFailure,
    }

    #[async_trait]
    impl ScoreTables for FailingTables {
        async fn find(
            &self,
            _table: &str,
            strategy: &MatchStrategy,
        ) -> Result<Option<ScoreRecord>, LookupFailure> {
            match strategy {
                MatchStrategy::ExactNumeric { .. } => Err((self.failure_on_exact)()),
                MatchStrategy::ExactText { .. } => Err(LookupFailure::Query("later".to_string())),
                MatchStrategy::FuzzyNameNumeric { .. } => Ok(None),
            }
        }
    }

    #[test]
    fn class_mapping_with_default() {
        assert_eq!(class_table("Thứ 5, tiết 7-8"), "DS_Thurs _7_8_Midterm.csv");
        assert_eq!(class_table("Thứ 4, tiết 5-6"), "DS_Wed _5_6_Midterm.csv");
        assert_eq!(class_table("Thứ 6, tiết 1-2"), "DS_Fri_1_2_Midterm.csv");
        assert_eq!(class_table("unknown"), "DS_Thurs _7_8_Midterm.csv");
    }

    #[test]
    fn numeric_id_plans_three_strategies_in_order() {
        let plan = plan_strategies(" Nguyen Van A ", " 123 ");
        assert_eq!(
            plan,
            vec![
                MatchStrategy::ExactNumeric {
                    name: "Nguyen Van A".to_string(),
                    msv: 123
                },
                MatchStrategy::ExactText {
                    name: "Nguyen Van A".to_string(),
                    msv: "123".to_string()
                },
                MatchStrategy::FuzzyNameNumeric {
                    name_fragment: "Nguyen Van A".to_string(),
                    msv: 123
                },
            ]
        );
    }

    #[test]
    fn non_numeric_id_keeps_only_text_strategy() {
        let plan = plan_strategies("Nguyen Van A", "SV-123");
        assert_eq!(
            plan,
            vec![MatchStrategy::ExactText {
                name: "Nguyen Van A".to_string(),
                msv: "SV-123".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn exact_match_short_circuits() {
        let tables = MemoryTables::new(
            "DS_Thurs _7_8_Midterm.csv",
            vec![record("Nguyen Van A", 123)],
        );
        let found = lookup(&tables, "Thứ 5, tiết 7-8", "Nguyen Van A", "123")
            .await
            .unwrap();
        assert_eq!(found, record("Nguyen Van A", 123));
        assert_eq!(tables.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn wrong_case_substring_falls_through_to_fuzzy() {
        let tables = MemoryTables::new(
            "DS_Thurs _7_8_Midterm.csv",
            vec![record("Nguyen Van A", 123)],
        );
        let found = lookup(&tables, "Thứ 5, tiết 7-8", "nguyen van", "123")
            .await
            .unwrap();
        assert_eq!(found.msv, 123);
        // Both exact strategies miss before the fuzzy one hits.
        assert_eq!(tables.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unknown_student_is_not_found_not_an_error() {
        let tables = MemoryTables::new(
            "DS_Thurs _7_8_Midterm.csv",
            vec![record("Nguyen Van A", 123)],
        );
        let result = lookup(&tables, "Thứ 5, tiết 7-8", "Nguyen Van A", "999").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(tables.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn lookup_routes_to_the_selected_class_table() {
        let tables = MemoryTables::new("DS_Wed _5_6_Midterm.csv", vec![record("Tran Thi B", 7)]);
        let found = lookup(&tables, "Thứ 4, tiết 5-6", "Tran Thi B", "7")
            .await
            .unwrap();
        assert_eq!(found.student_name, "Tran Thi B");
    }

    #[tokio::test]
    async fn missing_table_reports_store_unreachable() {
        let tables = FailingTables {
            failure_on_exact: || LookupFailure::TableMissing("relation does not exist".to_string()),
        };
        let result = lookup(&tables, "Thứ 5, tiết 7-8", "Nguyen Van A", "123").await;
        assert!(matches!(result, Err(AppError::StoreUnreachable(_))));
    }

    #[tokio::test]
    async fn first_failure_wins_over_later_ones() {
        // Exact fails transiently, text fails too, fuzzy is empty: the
        // reported error is the first one encountered.
        let tables = FailingTables {
            failure_on_exact: || LookupFailure::Query("first".to_string()),
        };
        let result = lookup(&tables, "Thứ 5, tiết 7-8", "Nguyen Van A", "123").await;
        match result {
            Err(AppError::TransientQueryFailure(msg)) => assert_eq!(msg, "first"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
