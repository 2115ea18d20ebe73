mod handlers;
mod problems;
mod routes;

use axum::Router;
use gavel_common::config::LanguageConfigManager;
use gavel_common::types::Problem;
use gavel_judge::{Judge, Sandbox};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub judge: Arc<Judge>,
    pub sandbox: Sandbox,
    pub problems: Arc<HashMap<String, Problem>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .with_target(false)
        .init();

    info!("Gavel API booting...");

    let config = LanguageConfigManager::load_default()?;
    info!(languages = config.list_languages().len(), "Language config loaded");

    let problems_path = std::env::var("GAVEL_PROBLEMS_PATH")
        .unwrap_or_else(|_| "config/problems.json".to_string());
    let problems = problems::load(&problems_path)?;
    info!(problems = problems.len(), path = %problems_path, "Problem catalog loaded");

    let state = Arc::new(AppState {
        judge: Arc::new(Judge::new(config.clone())),
        sandbox: Sandbox::new(config),
        problems: Arc::new(problems),
    });

    // Build router
    let app = Router::new()
        .merge(routes::routes())
        .with_state(state);

    // Start server
    let addr = std::env::var("GAVEL_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;

    info!("HTTP server listening on {}", addr);
    info!("Ready to accept submissions");

    axum::serve(listener, app).await?;
    Ok(())
}
