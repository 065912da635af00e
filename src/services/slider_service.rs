use tracing::debug;

use crate::models::{SalesPoint, SliderRange, SliderRanges};

/// Mean sales of the series, `None` when it is empty.
pub fn mean_sales(series: &[SalesPoint]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    Some(series.iter().map(|p| p.sales).sum::<f64>() / series.len() as f64)
}

/// Bounds for the custom-line inputs: the intercept spans the observed sales range, the slope
/// spans half the average monthly change across the series.
pub fn slider_ranges(series: &[SalesPoint]) -> Option<SliderRanges> {
    let avg = mean_sales(series)?;

    let (min_sales, max_sales) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.sales), hi.max(p.sales))
        });
    let data_range = max_sales - min_sales;

    let intercept = SliderRange {
        min: min_sales,
        max: max_sales,
        step: (data_range / 100.0).floor().max(1.0),
    };

    let monthly_change = data_range / series.len() as f64 / 2.0;
    let slope = SliderRange {
        min: (-monthly_change).floor(),
        max: monthly_change.ceil(),
        step: (monthly_change / 20.0).floor().max(0.1),
    };

    debug!(
        "Slider ranges: intercept [{}, {}] step {}, slope [{}, {}] step {}",
        intercept.min, intercept.max, intercept.step, slope.min, slope.max, slope.step
    );

    Some(SliderRanges {
        intercept,
        slope,
        default_intercept: avg.round(),
        default_slope: 0.0,
    })
}
