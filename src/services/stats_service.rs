use crate::models::{ForecastResult, Projection, TrendStats, VisibilityState};

/// Round to a whole number and group thousands with commas: `1234567.6` → `"1,234,568"`.
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}

/// Statistics panel entry for one projection and its forecast.
pub fn trend_stats(
    projection: &Projection,
    forecast: &ForecastResult,
    visibility: &VisibilityState,
) -> TrendStats {
    let regression = &projection.regression;

    TrendStats {
        id: projection.id,
        label: projection.label.clone(),
        color: projection.color.clone(),
        visible: visibility.is_visible(projection.id),
        forecast: forecast.clone(),
        formatted_total: format_thousands(forecast.total_quantity),
        formatted_average: format_thousands(forecast.average_monthly),
        intercept: format!("{:.2}", regression.intercept),
        slope: format!("{:.2}", regression.slope),
        formula: forecast
            .formula
            .clone()
            .unwrap_or_else(|| regression.formula()),
    }
}
