use serde::{Deserialize, Serialize};

/// Outcome of a forward extrapolation; anything other than `Ok` means the totals were zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    Ok,
    InvalidRegression,
    NumericOverflow,
}

/// Projected quantity over the next `months` months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub total_quantity: f64,
    pub average_monthly: f64,
    pub months: u32,
    pub status: ForecastStatus,
    /// Months whose projected value was not finite and did not contribute.
    pub skipped_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl ForecastResult {
    pub fn zeroed(months: u32, status: ForecastStatus) -> Self {
        Self {
            total_quantity: 0.0,
            average_monthly: 0.0,
            months,
            status,
            skipped_months: 0,
            formula: None,
        }
    }
}
