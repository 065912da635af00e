use chrono::Months;

use crate::models::{Projection, SalesPoint, TrendLine, TrendLinePoint, VisibilityState};

/// How far past the last recorded month the lines are drawn.
pub const PROJECTION_MONTHS: usize = 12;

/// Points of one trend line from its window start to `PROJECTION_MONTHS` past the series end.
/// The regression's x = 0 sits at the (clamped) window start.
pub fn trend_line_points(series: &[SalesPoint], projection: &Projection) -> Vec<TrendLinePoint> {
    let Some(last) = series.last() else {
        return Vec::new();
    };

    let total = series.len();
    let start = projection.window_start.min(total - 1);
    let end = total + PROJECTION_MONTHS;

    (start..end)
        .filter_map(|i| {
            let predicted = projection.regression.value_at((i - start) as f64);

            let (date, is_projected) = if i < total {
                (series[i].date, false)
            } else {
                let ahead = (i - total + 1) as u32;
                (last.date.checked_add_months(Months::new(ahead))?, true)
            };

            Some(TrendLinePoint {
                date,
                sales: predicted.max(0.0),
                is_projected,
            })
        })
        .collect()
}

/// Lines for every visible projection, in projection order.
pub fn build_trend_lines<'a>(
    series: &[SalesPoint],
    projections: impl IntoIterator<Item = &'a Projection>,
    visibility: &VisibilityState,
) -> Vec<TrendLine> {
    projections
        .into_iter()
        .filter(|p| visibility.is_visible(p.id))
        .map(|p| TrendLine {
            id: p.id,
            label: p.label.clone(),
            color: p.color.clone(),
            points: trend_line_points(series, p),
        })
        .collect()
}
