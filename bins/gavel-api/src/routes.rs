use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::handlers;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/judge", post(handlers::judge_submission))
        .route("/api/execute", post(handlers::execute_source))
        .route("/api/problems/:problem_id", get(handlers::get_problem))
        .route("/api/languages", get(handlers::list_languages))
}
