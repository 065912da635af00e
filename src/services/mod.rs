pub mod regression;
pub mod window_selector;
pub mod projection_service;
pub mod forecast_service;
pub mod slider_service;
pub mod trend_line_service;
pub mod stats_service;
pub mod catalog_service;
pub mod dashboard_controller;
pub mod session_service;
pub mod rate_limiter;
pub mod auth_service;
