use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TrendError;

/// The four trend lines drawn over a sales series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrendId {
    #[serde(rename = "24-month")]
    TwentyFourMonth,
    #[serde(rename = "12-month")]
    TwelveMonth,
    #[serde(rename = "6-month")]
    SixMonth,
    #[serde(rename = "custom")]
    Custom,
}

impl TrendId {
    pub const ALL: [TrendId; 4] = [
        TrendId::TwentyFourMonth,
        TrendId::TwelveMonth,
        TrendId::SixMonth,
        TrendId::Custom,
    ];

    pub const FIXED: [TrendId; 3] = [
        TrendId::TwentyFourMonth,
        TrendId::TwelveMonth,
        TrendId::SixMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendId::TwentyFourMonth => "24-month",
            TrendId::TwelveMonth => "12-month",
            TrendId::SixMonth => "6-month",
            TrendId::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendId::TwentyFourMonth => "2-year trend",
            TrendId::TwelveMonth => "1-year trend",
            TrendId::SixMonth => "6-month trend",
            TrendId::Custom => "Custom trend",
        }
    }

    pub fn window(&self) -> TrendWindow {
        match self {
            TrendId::TwentyFourMonth => TrendWindow::Full,
            TrendId::TwelveMonth => TrendWindow::Last12,
            TrendId::SixMonth => TrendWindow::Last6,
            TrendId::Custom => TrendWindow::None,
        }
    }

    /// CSS variable the stylesheet defines for this line's color.
    pub fn css_variable(&self) -> &'static str {
        match self {
            TrendId::TwentyFourMonth => "--trend-24month",
            TrendId::TwelveMonth => "--trend-12month",
            TrendId::SixMonth => "--trend-6month",
            TrendId::Custom => "--trend-custom",
        }
    }
}

impl fmt::Display for TrendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendId {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24-month" => Ok(TrendId::TwentyFourMonth),
            "12-month" => Ok(TrendId::TwelveMonth),
            "6-month" => Ok(TrendId::SixMonth),
            "custom" => Ok(TrendId::Custom),
            other => Err(TrendError::UnknownTrend(other.to_string())),
        }
    }
}

/// Historical sub-range of the active series a regression is fitted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendWindow {
    Full,
    Last12,
    Last6,
    /// Parameter-driven line, no historical window.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub intercept: f64,
    pub slope: f64,
}

impl Regression {
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.slope.is_finite()
    }

    /// `y = a + bx` with both coefficients at two decimals.
    pub fn formula(&self) -> String {
        format!("y = {:.2} + {:.2}x", self.intercept, self.slope)
    }
}

/// One trend line ready for the renderer and the statistics panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub id: TrendId,
    pub window: TrendWindow,
    pub regression: Regression,
    /// Series index from which forward extrapolation starts.
    pub anchor_index: usize,
    /// Series index where the fitted window begins; where the line is drawn from.
    pub window_start: usize,
    pub label: String,
    pub color: String,
}

/// A fixed trend whose window could not be fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnavailableTrend {
    pub id: TrendId,
    pub label: String,
    pub reason: String,
}

/// Result of one projection pass: the fitted fixed trends, the custom line, and the fixed trends
/// that had to be left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSet {
    pub fixed: Vec<Projection>,
    pub custom: Projection,
    pub unavailable: Vec<UnavailableTrend>,
}

impl ProjectionSet {
    /// Every drawable projection, fixed trends first.
    pub fn iter(&self) -> impl Iterator<Item = &Projection> {
        self.fixed.iter().chain(std::iter::once(&self.custom))
    }

    pub fn get(&self, id: TrendId) -> Option<&Projection> {
        self.iter().find(|p| p.id == id)
    }
}
