use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::Config;
use crate::generator::ExamGenerator;
use crate::lookup::ScoreTables;
use crate::scoring::ResponseStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub generator: Arc<ExamGenerator>,
    pub responses: Arc<dyn ResponseStore>,
    pub scores: Arc<dyn ScoreTables>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<ExamGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ResponseStore> {
    fn from_ref(state: &AppState) -> Self {
        state.responses.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ScoreTables> {
    fn from_ref(state: &AppState) -> Self {
        state.scores.clone()
    }
}
