use tracing::{debug, warn};

use crate::errors::TrendError;
use crate::models::{
    CustomLineParams, Projection, ProjectionSet, SalesPoint, TrendId, TrendWindow, UnavailableTrend,
};
use crate::services::regression::fit_regression;
use crate::services::window_selector::{window_len, window_start, window_values};

/// Default color lookup: the stylesheet variable for each line.
pub fn css_color(id: TrendId) -> String {
    format!("var({})", id.css_variable())
}

/// Clamp an anchor into `[0, series_len - 1]`.
fn clamp_anchor(index: usize, series_len: usize) -> usize {
    index.min(series_len.saturating_sub(1))
}

/// Fit one of the three fixed trends over its window.
pub fn build_fixed_projection<F>(
    series: &[SalesPoint],
    id: TrendId,
    color: &F,
) -> Result<Projection, TrendError>
where
    F: Fn(TrendId) -> String,
{
    let window = id.window();
    let values = window_values(series, window);
    let regression = fit_regression(&values)?;

    Ok(Projection {
        id,
        window,
        regression,
        anchor_index: clamp_anchor(values.len().saturating_sub(1), series.len()),
        window_start: window_start(window, series.len()),
        label: id.label().to_string(),
        color: color(id),
    })
}

/// The custom line is taken straight from the user's parameters and anchored at the series end.
pub fn build_custom_projection<F>(series_len: usize, params: &CustomLineParams, color: &F) -> Projection
where
    F: Fn(TrendId) -> String,
{
    let end = series_len.saturating_sub(1);
    Projection {
        id: TrendId::Custom,
        window: TrendWindow::None,
        regression: params.regression(),
        anchor_index: clamp_anchor(end, series_len),
        window_start: end,
        label: TrendId::Custom.label().to_string(),
        color: color(TrendId::Custom),
    }
}

/// Build all four trend lines. A fixed trend whose window cannot be fitted is left out of
/// `fixed` and listed in `unavailable`; the other lines are unaffected.
pub fn build_projections<F>(series: &[SalesPoint], params: &CustomLineParams, color: F) -> ProjectionSet
where
    F: Fn(TrendId) -> String,
{
    let mut fixed = Vec::with_capacity(TrendId::FIXED.len());
    let mut unavailable = Vec::new();

    for id in TrendId::FIXED {
        match build_fixed_projection(series, id, &color) {
            Ok(projection) => {
                debug!(
                    "{} fitted over {} points: intercept={:.4} slope={:.4}",
                    id,
                    window_len(id.window(), series.len()),
                    projection.regression.intercept,
                    projection.regression.slope
                );
                fixed.push(projection);
            }
            Err(e) => {
                warn!("Omitting {} trend: {}", id, e);
                unavailable.push(UnavailableTrend {
                    id,
                    label: id.label().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    ProjectionSet {
        fixed,
        custom: build_custom_projection(series.len(), params, &color),
        unavailable,
    }
}
