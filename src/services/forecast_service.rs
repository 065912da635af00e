use tracing::{debug, error, warn};

use crate::models::{CustomLineParams, ForecastResult, ForecastStatus, Projection, Regression, TrendId};

/// Upper bound for any single projected month.
pub const MAX_PROJECTED_VALUE: f64 = 1_000_000.0;
pub const DEFAULT_FORECAST_MONTHS: u32 = 12;
/// Ten years.
pub const MAX_FORECAST_MONTHS: u32 = 120;

const INVALID_CUSTOM_FORMULA: &str = "y = 0 + 0x (Invalid input)";

/// Horizons outside `[1, 120]` fall back to the 12-month default rather than being rejected.
pub fn normalize_months(months: i64) -> u32 {
    if months <= 0 || months > MAX_FORECAST_MONTHS as i64 {
        warn!("Invalid months parameter {}, using default of {}", months, DEFAULT_FORECAST_MONTHS);
        DEFAULT_FORECAST_MONTHS
    } else {
        months as u32
    }
}

/// Sum the clamped monthly projections `starting_value + slope * month` for `month = 1..=months`.
/// Non-finite months are skipped and counted.
fn accumulate(starting_value: f64, slope: f64, months: u32) -> (f64, u32) {
    let mut total_quantity = 0.0;
    let mut skipped = 0;

    for month in 1..=months {
        let projected = starting_value + slope * month as f64;

        if !projected.is_finite() {
            warn!("Invalid projected value at month {}: {}", month, projected);
            skipped += 1;
            continue;
        }

        let clamped = projected.min(MAX_PROJECTED_VALUE).max(0.0);
        total_quantity += clamped;

        if month <= 3 {
            debug!("Future month {}: projected={:.2}, clamped={:.2}", month, projected, clamped);
        }
    }

    (total_quantity, skipped)
}

fn finish(total_quantity: f64, months: u32, skipped_months: u32) -> ForecastResult {
    ForecastResult {
        total_quantity,
        average_monthly: total_quantity / months as f64,
        months,
        status: ForecastStatus::Ok,
        skipped_months,
        formula: None,
    }
}

/// Extrapolate a fitted regression `months` months beyond `anchor_index`, the last index of the
/// window it was fitted on.
pub fn forecast(regression: &Regression, anchor_index: usize, months: i64) -> ForecastResult {
    if !regression.is_finite() {
        error!("Invalid regression: {:?}", regression);
        return ForecastResult::zeroed(normalize_months(months), ForecastStatus::InvalidRegression);
    }

    let months = normalize_months(months);

    let starting_value = regression.value_at(anchor_index as f64);
    if !starting_value.is_finite() {
        error!("Invalid starting value {} at anchor {}", starting_value, anchor_index);
        return ForecastResult::zeroed(months, ForecastStatus::NumericOverflow);
    }

    debug!(
        "Projecting {} months from anchor {} (starting value {:.2})",
        months, anchor_index, starting_value
    );

    let (total_quantity, skipped) = accumulate(starting_value, regression.slope, months);
    finish(total_quantity, months, skipped)
}

/// The custom line is defined as "current value, future slope", so the intercept is the
/// starting value and no anchor offset applies.
pub fn forecast_custom(params: &CustomLineParams, months: i64) -> ForecastResult {
    let regression = params.regression();
    let months = normalize_months(months);

    if !regression.is_finite() {
        error!("Non-finite custom line parameters: {:?}", params);
        let mut result = ForecastResult::zeroed(months, ForecastStatus::InvalidRegression);
        result.formula = Some(INVALID_CUSTOM_FORMULA.to_string());
        return result;
    }

    debug!("Custom line starting from intercept {:.2}", params.intercept);

    let (total_quantity, skipped) = accumulate(params.intercept, params.slope, months);
    let mut result = finish(total_quantity, months, skipped);
    result.formula = Some(regression.formula());
    result
}

/// Forecast whichever kind of line `projection` is.
pub fn forecast_projection(projection: &Projection, months: i64) -> ForecastResult {
    match projection.id {
        TrendId::Custom => forecast_custom(
            &CustomLineParams {
                intercept: projection.regression.intercept,
                slope: projection.regression.slope,
            },
            months,
        ),
        _ => forecast(&projection.regression, projection.anchor_index, months),
    }
}
