//! End-to-end checks of the trend engine through the public library API:
//! fitting, window selection, projection building, forecasting and the
//! per-session controller.

use chrono::{Months, NaiveDate};

use sales_trends::errors::TrendError;
use sales_trends::models::{
    CustomLineParams, ForecastStatus, Regression, SalesPoint, TrendId, TrendWindow,
};
use sales_trends::services::dashboard_controller::DashboardController;
use sales_trends::services::forecast_service::{forecast, forecast_custom, MAX_PROJECTED_VALUE};
use sales_trends::services::projection_service::{build_projections, css_color};
use sales_trends::services::regression::fit_regression;
use sales_trends::services::window_selector::window_len;

fn series_from(values: &[f64]) -> Vec<SalesPoint> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| SalesPoint::new(start.checked_add_months(Months::new(i as u32)).unwrap(), *v))
        .collect()
}

fn arithmetic_series() -> Vec<SalesPoint> {
    let values: Vec<f64> = (0..24).map(|i| 100.0 + 2.0 * i as f64).collect();
    series_from(&values)
}

fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

// ---------------------------------------------------------------------------
// Fitting and windows
// ---------------------------------------------------------------------------

#[test]
fn test_ols_recovers_exact_line() {
    let values: Vec<f64> = (0..17).map(|i| -3.5 + 0.25 * i as f64).collect();
    let fit = fit_regression(&values).unwrap();

    assert_close(fit.intercept, -3.5);
    assert_close(fit.slope, 0.25);
}

#[test]
fn test_window_lengths_for_full_series() {
    assert_eq!(window_len(TrendWindow::Full, 24), 24);
    assert_eq!(window_len(TrendWindow::Last12, 24), 12);
    assert_eq!(window_len(TrendWindow::Last6, 24), 6);
}

#[test]
fn test_single_point_window_is_degenerate() {
    assert_eq!(fit_regression(&[42.0]), Err(TrendError::DegenerateRegression));
    assert_eq!(fit_regression(&[]), Err(TrendError::InsufficientData));
}

// ---------------------------------------------------------------------------
// Forecasting
// ---------------------------------------------------------------------------

#[test]
fn test_arithmetic_series_full_window_forecast() {
    let series = arithmetic_series();
    let set = build_projections(&series, &CustomLineParams::default(), css_color);
    let full = set.get(TrendId::TwentyFourMonth).unwrap();

    assert_close(full.regression.slope, 2.0);
    assert_close(full.regression.intercept, 100.0);
    assert_eq!(full.anchor_index, 23);

    let result = forecast(&full.regression, full.anchor_index, 12);
    assert_eq!(result.status, ForecastStatus::Ok);
    assert_close(result.total_quantity, 1908.0);
    assert_close(result.average_monthly, 159.0);
}

#[test]
fn test_custom_line_forecast() {
    let result = forecast_custom(&CustomLineParams { intercept: 150.0, slope: 5.0 }, 12);

    assert_close(result.total_quantity, 2190.0);
    assert_close(result.average_monthly, 182.5);
    assert_eq!(result.formula.as_deref(), Some("y = 150.00 + 5.00x"));
}

#[test]
fn test_overflowing_slope_is_capped_per_month() {
    let result = forecast(&Regression::new(0.0, 1e10), 23, 12);

    assert_close(result.total_quantity, 12.0 * MAX_PROJECTED_VALUE);
    assert_close(result.average_monthly, MAX_PROJECTED_VALUE);
}

#[test]
fn test_average_identity_and_clamp_law() {
    let cases = [
        (Regression::new(500.0, -80.0), 23, 12),
        (Regression::new(10.0, 3.0), 5, 36),
        (Regression::new(900_000.0, 50_000.0), 11, 7),
    ];

    for (regression, anchor, months) in cases {
        let result = forecast(&regression, anchor, months);
        assert_close(result.average_monthly, result.total_quantity / result.months as f64);
        assert!(result.total_quantity >= 0.0);
        assert!(result.total_quantity <= MAX_PROJECTED_VALUE * result.months as f64);
    }
}

// ---------------------------------------------------------------------------
// Controller behaviour
// ---------------------------------------------------------------------------

#[test]
fn test_custom_changes_leave_fixed_forecasts_alone() {
    let mut controller = DashboardController::default();
    controller.load_series("widget", arithmetic_series()).unwrap();
    let before = controller.snapshot().unwrap();

    controller.set_custom_params(999.0, -7.0).unwrap();
    let after = controller.snapshot().unwrap();

    for id in TrendId::FIXED {
        assert_eq!(before.forecast(id), after.forecast(id));
    }
    assert_ne!(before.forecast(TrendId::Custom), after.forecast(TrendId::Custom));
}

#[test]
fn test_visibility_survives_series_change() {
    let mut controller = DashboardController::default();
    controller.load_series("widget", arithmetic_series()).unwrap();
    controller.toggle(TrendId::SixMonth);
    controller.toggle(TrendId::TwentyFourMonth);
    let visibility = *controller.visibility();

    controller
        .load_series("gadget", series_from(&[5.0, 9.0, 4.0, 12.0]))
        .unwrap();

    assert_eq!(*controller.visibility(), visibility);
    assert_eq!(controller.custom_params().intercept, 8.0);
}

#[test]
fn test_short_series_omits_failing_trends() {
    let mut controller = DashboardController::default();
    controller.load_series("sparse", series_from(&[40.0])).unwrap();
    let snapshot = controller.snapshot().unwrap();

    assert!(snapshot.projections.fixed.is_empty());
    assert_eq!(snapshot.projections.unavailable.len(), 3);
    assert!(snapshot.forecast(TrendId::Custom).is_some());
}
