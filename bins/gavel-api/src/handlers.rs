// HTTP route handlers for the Gavel API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use gavel_common::types::{
    ExecutionRequest, JudgeOutcome, Language, Problem, Submission,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct JudgeRequest {
    pub language: Language,
    pub source_code: String,
    /// Either a catalog problem id or an inline problem definition.
    #[serde(default)]
    pub problem_id: Option<String>,
    #[serde(default)]
    pub problem: Option<Problem>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JudgeResponse {
    #[serde(flatten)]
    pub outcome: JudgeOutcome,
}

fn error_body(message: impl Into<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": message.into() }))
}

/// POST /api/judge - Judge a submission against a problem
pub async fn judge_submission(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<JudgeRequest>,
) -> impl IntoResponse {
    // Resolve the problem: catalog id wins, inline definition second.
    let problem = match (&payload.problem_id, payload.problem) {
        (Some(id), _) => match state.problems.get(id) {
            Some(problem) => problem.clone(),
            None => {
                return (
                    StatusCode::NOT_FOUND,
                    error_body(format!("unknown problem id: {}", id)),
                )
                    .into_response();
            }
        },
        (None, Some(problem)) => problem,
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                error_body("either problem_id or an inline problem is required"),
            )
                .into_response();
        }
    };

    if problem.test_cases.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_body("problem has no test cases"),
        )
            .into_response();
    }

    let mut submission = Submission::new(payload.language, payload.source_code);
    submission.user_id = payload.user_id;

    info!(
        submission_id = %submission.id,
        language = %submission.language,
        problem = %problem.title,
        test_cases = problem.test_cases.len(),
        "Submission received"
    );

    match state.judge.judge(&problem, &submission).await {
        Ok(mut outcome) => {
            // Hidden test payloads never leave the server.
            outcome.results = outcome
                .results
                .into_iter()
                .map(|result| result.redacted())
                .collect();
            info!(
                submission_id = %submission.id,
                verdict = ?outcome.verdict,
                passed = outcome.passed_count,
                total = outcome.total_tests,
                "Submission judged"
            );
            (StatusCode::OK, Json(JudgeResponse { outcome })).into_response()
        }
        Err(e) => {
            error!(submission_id = %submission.id, error = %e, "Judging failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                error_body(format!("judging failed: {}", e)),
            )
                .into_response()
        }
    }
}

/// POST /api/execute - Run raw source once with optional stdin
pub async fn execute_source(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExecutionRequest>,
) -> impl IntoResponse {
    info!(language = %payload.language, "Execution request received");

    match state.sandbox.execute(&payload).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(e) => {
            error!(language = %payload.language, error = %e, "Execution failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                error_body(format!("execution failed: {}", e)),
            )
                .into_response()
        }
    }
}

/// GET /api/problems/{problem_id} - Fetch a catalog problem with
/// hidden test cases redacted
pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<String>,
) -> impl IntoResponse {
    match state.problems.get(&problem_id) {
        Some(problem) => {
            let mut public = problem.clone();
            for case in &mut public.test_cases {
                if case.hidden {
                    case.input = "[hidden]".to_string();
                    case.expected = "[hidden]".to_string();
                }
            }
            (StatusCode::OK, Json(public)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            error_body(format!("unknown problem id: {}", problem_id)),
        )
            .into_response(),
    }
}

/// GET /api/languages - List enabled languages and their toolchains
pub async fn list_languages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let languages: Vec<_> = state
        .sandbox
        .config()
        .list_languages()
        .into_iter()
        .map(|config| {
            serde_json::json!({
                "name": &config.name,
                "version": &config.version,
                "file_extension": &config.file_extension,
                "default_timeout_ms": config.default_timeout_ms,
            })
        })
        .collect();
    (StatusCode::OK, Json(serde_json::json!({ "languages": languages })))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
