use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::errors::TrendError;
use crate::models::{
    CustomLineParams, DashboardSnapshot, ItemCatalog, SalesPoint, SliderRange, SliderRanges,
    TrendId, VisibilityState,
};
use crate::services::catalog_service::item_series;
use crate::services::forecast_service::{forecast_projection, DEFAULT_FORECAST_MONTHS};
use crate::services::projection_service::{build_projections, css_color};
use crate::services::slider_service::{mean_sales, slider_ranges};
use crate::services::stats_service::trend_stats;
use crate::services::trend_line_service::build_trend_lines;

/// Recompute projections, forecasts, statistics and drawable lines for one series.
///
/// Everything is passed in explicitly; nothing here reads controller state.
pub fn compute_snapshot<F>(
    item_key: &str,
    series: &[SalesPoint],
    visibility: &VisibilityState,
    custom: &CustomLineParams,
    forecast_months: i64,
    color: F,
) -> DashboardSnapshot
where
    F: Fn(TrendId) -> String,
{
    let projections = build_projections(series, custom, color);

    let forecasts: BTreeMap<TrendId, _> = projections
        .iter()
        .map(|p| (p.id, forecast_projection(p, forecast_months)))
        .collect();

    let stats = projections
        .fixed
        .iter()
        .map(|p| trend_stats(p, &forecasts[&p.id], visibility))
        .collect();
    let custom_stats = trend_stats(&projections.custom, &forecasts[&TrendId::Custom], visibility);

    let trend_lines = build_trend_lines(series, projections.iter(), visibility);

    let slider_ranges = slider_ranges(series).unwrap_or(SliderRanges {
        intercept: SliderRange { min: 0.0, max: 0.0, step: 1.0 },
        slope: SliderRange { min: 0.0, max: 0.0, step: 0.1 },
        default_intercept: 0.0,
        default_slope: 0.0,
    });

    DashboardSnapshot {
        item_key: item_key.to_string(),
        series: series.to_vec(),
        projections,
        forecasts,
        stats,
        custom_stats,
        trend_lines,
        visibility: *visibility,
        custom_params: *custom,
        slider_ranges,
    }
}

#[derive(Debug, Clone)]
struct LoadedSeries {
    key: String,
    series: Vec<SalesPoint>,
}

/// Owns the per-session display state: which lines are shown, the custom line's coefficients
/// and the series currently being viewed. All mutation goes through these methods.
#[derive(Debug, Clone)]
pub struct DashboardController {
    visibility: VisibilityState,
    custom: CustomLineParams,
    loaded: Option<LoadedSeries>,
    forecast_months: i64,
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new(DEFAULT_FORECAST_MONTHS as i64)
    }
}

impl DashboardController {
    pub fn new(forecast_months: i64) -> Self {
        Self {
            visibility: VisibilityState::default(),
            custom: CustomLineParams::default(),
            loaded: None,
            forecast_months,
        }
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn custom_params(&self) -> &CustomLineParams {
        &self.custom
    }

    pub fn item_key(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.key.as_str())
    }

    pub fn series(&self) -> &[SalesPoint] {
        self.loaded.as_ref().map(|l| l.series.as_slice()).unwrap_or(&[])
    }

    /// Make `series` the active series and reset the custom line to `{round(mean), 0}`.
    /// Visibility is a display preference and is left alone.
    pub fn load_series(&mut self, key: impl Into<String>, series: Vec<SalesPoint>) -> Result<(), TrendError> {
        let key = key.into();
        let Some(avg) = mean_sales(&series) else {
            warn!("Refusing to load empty series for {}", key);
            return Err(TrendError::NoData(key));
        };

        self.custom = CustomLineParams {
            intercept: avg.round(),
            slope: 0.0,
        };
        info!("Loaded {} ({} points), custom intercept reset to {}", key, series.len(), self.custom.intercept);
        self.loaded = Some(LoadedSeries { key, series });
        Ok(())
    }

    /// Load `key` from the catalog. Returns `false` and leaves state untouched when the item has
    /// no data.
    pub fn select_item(&mut self, catalog: &ItemCatalog, key: &str) -> bool {
        match item_series(catalog, key) {
            Some(series) => self.load_series(key, series).is_ok(),
            None => {
                info!("No data for item {}", key);
                false
            }
        }
    }

    pub fn toggle(&mut self, id: TrendId) -> bool {
        self.visibility.toggle(id)
    }

    pub fn reset_all(&mut self) {
        self.visibility.show_all();
    }

    /// Replace both coefficients, or neither if either is not finite.
    pub fn set_custom_params(&mut self, intercept: f64, slope: f64) -> Result<(), TrendError> {
        if !intercept.is_finite() || !slope.is_finite() {
            return Err(TrendError::InvalidParameters { intercept, slope });
        }
        self.custom = CustomLineParams { intercept, slope };
        Ok(())
    }

    /// Full recomputation for the loaded series, `None` before anything is loaded.
    pub fn snapshot(&self) -> Option<DashboardSnapshot> {
        self.snapshot_with(css_color)
    }

    pub fn snapshot_with<F>(&self, color: F) -> Option<DashboardSnapshot>
    where
        F: Fn(TrendId) -> String,
    {
        let loaded = self.loaded.as_ref()?;
        Some(compute_snapshot(
            &loaded.key,
            &loaded.series,
            &self.visibility,
            &self.custom,
            self.forecast_months,
            color,
        ))
    }
}
