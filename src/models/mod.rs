mod sales;
mod trend;
mod forecast;
mod dashboard;

pub use sales::{ItemCatalog, SalesPoint};
pub use trend::{Projection, ProjectionSet, Regression, TrendId, TrendWindow, UnavailableTrend};
pub use forecast::{ForecastResult, ForecastStatus};
pub use dashboard::{
    CustomLineParams, DashboardSnapshot, SessionView, SliderRange, SliderRanges, TrendLine, TrendLinePoint,
    TrendStats, VisibilityState,
};
