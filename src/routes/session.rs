use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::middleware::AuthUser;
use crate::models::{SessionView, TrendId};
use crate::services::catalog_service::{item_series, load_catalog};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current))
        .route("/select", post(select_item))
        .route("/toggle/:id", post(toggle))
        .route("/reset", post(reset_all))
        .route("/custom", put(set_custom))
}

#[derive(Debug, Deserialize)]
pub struct SelectItem {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct CustomParams {
    pub intercept: f64,
    pub slope: f64,
}

async fn current(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionView>, AppError> {
    info!("GET /api/session - {}", user.email);
    let view = state.sessions.get_or_spawn(&user.email).view().await?;
    Ok(Json(view))
}

async fn select_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SelectItem>,
) -> Result<Json<SessionView>, AppError> {
    info!("POST /api/session/select - {} selects {}", user.email, body.key);
    let catalog = load_catalog(&state.config.data_file).await?;
    let series = item_series(&catalog, &body.key);

    let view = state
        .sessions
        .get_or_spawn(&user.email)
        .select_item(body.key.clone(), series)
        .await
        .map_err(|e| {
            error!("Failed to select {}: {}", body.key, e);
            e
        })?;
    Ok(Json(view))
}

async fn toggle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    info!("POST /api/session/toggle/{} - {}", id, user.email);
    let id: TrendId = id.parse()?;
    let view = state.sessions.get_or_spawn(&user.email).toggle(id).await?;
    Ok(Json(view))
}

async fn reset_all(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionView>, AppError> {
    info!("POST /api/session/reset - {}", user.email);
    let view = state.sessions.get_or_spawn(&user.email).reset_all().await?;
    Ok(Json(view))
}

async fn set_custom(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CustomParams>,
) -> Result<Json<SessionView>, AppError> {
    info!(
        "PUT /api/session/custom - {} sets y = {} + {}x",
        user.email, body.intercept, body.slope
    );
    let view = state
        .sessions
        .get_or_spawn(&user.email)
        .set_custom_params(body.intercept, body.slope)
        .await?;
    Ok(Json(view))
}
