use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{ForecastResult, ProjectionSet, Regression, SalesPoint, TrendId};

/// Which trend lines the renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    #[serde(rename = "24-month")]
    pub twenty_four_month: bool,
    #[serde(rename = "12-month")]
    pub twelve_month: bool,
    #[serde(rename = "6-month")]
    pub six_month: bool,
    pub custom: bool,
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self {
            twenty_four_month: true,
            twelve_month: false,
            six_month: false,
            custom: false,
        }
    }
}

impl VisibilityState {
    pub fn is_visible(&self, id: TrendId) -> bool {
        match id {
            TrendId::TwentyFourMonth => self.twenty_four_month,
            TrendId::TwelveMonth => self.twelve_month,
            TrendId::SixMonth => self.six_month,
            TrendId::Custom => self.custom,
        }
    }

    fn flag_mut(&mut self, id: TrendId) -> &mut bool {
        match id {
            TrendId::TwentyFourMonth => &mut self.twenty_four_month,
            TrendId::TwelveMonth => &mut self.twelve_month,
            TrendId::SixMonth => &mut self.six_month,
            TrendId::Custom => &mut self.custom,
        }
    }

    /// Flips one flag and returns its new value.
    pub fn toggle(&mut self, id: TrendId) -> bool {
        let flag = self.flag_mut(id);
        *flag = !*flag;
        *flag
    }

    /// Only the listed lines visible.
    pub fn from_ids(ids: impl IntoIterator<Item = TrendId>) -> Self {
        let mut state = Self {
            twenty_four_month: false,
            twelve_month: false,
            six_month: false,
            custom: false,
        };
        for id in ids {
            *state.flag_mut(id) = true;
        }
        state
    }

    pub fn show_all(&mut self) {
        for id in TrendId::ALL {
            *self.flag_mut(id) = true;
        }
    }
}

/// User-set coefficients of the custom trend line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomLineParams {
    pub intercept: f64,
    pub slope: f64,
}

impl CustomLineParams {
    pub fn regression(&self) -> Regression {
        Regression::new(self.intercept, self.slope)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Input bounds for the custom-line controls, derived from the loaded series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRanges {
    pub intercept: SliderRange,
    pub slope: SliderRange,
    pub default_intercept: f64,
    pub default_slope: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLinePoint {
    pub date: NaiveDateTime,
    pub sales: f64,
    pub is_projected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub id: TrendId,
    pub label: String,
    pub color: String,
    pub points: Vec<TrendLinePoint>,
}

/// One entry of the statistics panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    pub id: TrendId,
    pub label: String,
    pub color: String,
    pub visible: bool,
    pub forecast: ForecastResult,
    pub formatted_total: String,
    pub formatted_average: String,
    pub intercept: String,
    pub slope: String,
    pub formula: String,
}

/// Everything the renderer needs after a recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub item_key: String,
    pub series: Vec<SalesPoint>,
    pub projections: ProjectionSet,
    pub forecasts: BTreeMap<TrendId, ForecastResult>,
    pub stats: Vec<TrendStats>,
    pub custom_stats: TrendStats,
    pub trend_lines: Vec<TrendLine>,
    pub visibility: VisibilityState,
    pub custom_params: CustomLineParams,
    pub slider_ranges: SliderRanges,
}

impl DashboardSnapshot {
    pub fn forecast(&self, id: TrendId) -> Option<&ForecastResult> {
        self.forecasts.get(&id)
    }
}

/// What a session hands back after every user action: the read models the renderer needs
/// even before an item has been selected, plus the full snapshot once one has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub visibility: VisibilityState,
    pub custom_params: CustomLineParams,
    pub snapshot: Option<DashboardSnapshot>,
}
