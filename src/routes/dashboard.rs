use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::{AppError, TrendError};
use crate::models::{CustomLineParams, DashboardSnapshot, TrendId, VisibilityState};
use crate::services::catalog_service::{item_keys, item_series, load_catalog};
use crate::services::dashboard_controller::compute_snapshot;
use crate::services::projection_service::css_color;
use crate::services::slider_service::mean_sales;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_page))
        .route("/api/dashboard_data", get(dashboard_data))
        .route("/api/items", get(list_items))
        .route("/api/items/:key/trends", get(item_trends))
}

async fn dashboard_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    info!("GET /dashboard - Rendering dashboard");
    let page = tokio::fs::read_to_string(&state.config.dashboard_template)
        .await
        .map_err(|e| {
            error!("Error rendering dashboard: {}", e);
            AppError::from(e)
        })?;
    Ok(Html(page))
}

/// The raw catalog file, for clients that chart on their own.
async fn dashboard_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    info!("GET /api/dashboard_data - Serving catalog");
    let bytes = tokio::fs::read(&state.config.data_file).await.map_err(|e| {
        error!("Failed to read {}: {}", state.config.data_file.display(), e);
        AppError::from(e)
    })?;
    Ok(([(header::CONTENT_TYPE, "application/json")], bytes))
}

async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    info!("GET /api/items - Listing items");
    let catalog = load_catalog(&state.config.data_file).await?;
    Ok(Json(item_keys(&catalog).into_iter().map(str::to_string).collect()))
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub intercept: Option<f64>,
    pub slope: Option<f64>,
    pub months: Option<i64>,
    /// Comma-separated trend ids to draw, e.g. `24-month,custom`.
    pub visible: Option<String>,
}

impl TrendQuery {
    fn visibility(&self) -> Result<VisibilityState, TrendError> {
        match self.visible.as_deref() {
            None => Ok(VisibilityState::default()),
            Some(list) => {
                let ids = list
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::parse::<TrendId>)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(VisibilityState::from_ids(ids))
            }
        }
    }
}

/// Stateless snapshot for one item. The custom line defaults to the series mean with no slope.
pub async fn item_trends(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    info!("GET /api/items/{}/trends - Computing trends", key);

    let catalog = load_catalog(&state.config.data_file).await?;
    let series = item_series(&catalog, &key)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TrendError::NoData(key.clone()))?;

    let visibility = query.visibility()?;
    let custom = CustomLineParams {
        intercept: query
            .intercept
            .unwrap_or_else(|| mean_sales(&series).unwrap_or(0.0).round()),
        slope: query.slope.unwrap_or(0.0),
    };
    let months = query.months.unwrap_or(state.config.forecast_months);

    Ok(Json(compute_snapshot(&key, &series, &visibility, &custom, months, css_color)))
}
