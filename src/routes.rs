// src/routes.rs

use std::sync::Arc;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{exam, lookup};
use crate::state::AppState;

/// Assembles the main application router.
///
/// * Exam routes: fetch a version, duplicate-check before starting, submit.
/// * Score routes: rate-limited lookup (students hammer this one around
///   grade release).
/// * Global middleware (Trace, CORS) and shared state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(5)
        .finish()
        .unwrap();
    let governor_conf = Arc::new(governor_conf);

    let exam_routes = Router::new()
        .route("/version/{n}", get(exam::get_test_version))
        .route("/start", post(exam::start_exam))
        .route("/submit", post(exam::submit_exam));

    let score_routes = Router::new()
        .route("/lookup", post(lookup::lookup_score))
        .layer(GovernorLayer::new(governor_conf));

    Router::new()
        .nest("/api/exam", exam_routes)
        .nest("/api/scores", score_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
