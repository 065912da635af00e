use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/monitor", get(monitor))
}

async fn health() -> &'static str {
    info!("GET /health - Health check");
    "OK"
}

/// Plain-text status written by the data generator.
async fn monitor(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    info!("GET /monitor - Reading monitor file");
    let content = tokio::fs::read(&state.config.monitor_file).await.map_err(|e| {
        error!("Error reading monitor file {}: {}", state.config.monitor_file.display(), e);
        AppError::from(e)
    })?;
    Ok(([(header::CONTENT_TYPE, "text/plain")], content))
}
