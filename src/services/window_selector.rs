use crate::models::{SalesPoint, TrendWindow};

/// Number of points a window covers in a series of `series_len` points.
/// Short series clamp the window instead of failing.
pub fn window_len(window: TrendWindow, series_len: usize) -> usize {
    match window {
        TrendWindow::Full => series_len,
        TrendWindow::Last12 => series_len.min(12),
        TrendWindow::Last6 => series_len.min(6),
        TrendWindow::None => 0,
    }
}

/// Index of the first series point inside the window.
pub fn window_start(window: TrendWindow, series_len: usize) -> usize {
    series_len - window_len(window, series_len)
}

/// The trailing sub-series a trend line is fitted over.
pub fn select_window(series: &[SalesPoint], window: TrendWindow) -> &[SalesPoint] {
    &series[window_start(window, series.len())..]
}

/// Sales values of the window, in chronological order.
pub fn window_values(series: &[SalesPoint], window: TrendWindow) -> Vec<f64> {
    select_window(series, window).iter().map(|p| p.sales).collect()
}
