use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};
use thiserror::Error;

use crate::services::auth_service::AuthError;
use crate::services::session_service::SessionError;

/// Failures of the trend engine. The forecast aggregator never returns these; it degrades to a
/// zeroed, tagged result instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendError {
    #[error("insufficient data: the window has no points")]
    InsufficientData,
    #[error("degenerate regression: slope is undefined for a single-point window")]
    DegenerateRegression,
    #[error("invalid custom line parameters: intercept={intercept}, slope={slope}")]
    InvalidParameters { intercept: f64, slope: f64 },
    #[error("no sales data for item {0}")]
    NoData(String),
    #[error("unknown trend id: {0}")]
    UnknownTrend(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Token expired")]
    TokenExpired,
    #[error("Forbidden")]
    Forbidden,
    #[error("Too many requests")]
    RateLimited,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Data error: {0}")]
    Data(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication failed: Invalid credentials").into_response()
            }
            AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "Authentication failed: Token expired").into_response()
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Access denied.").into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("900"));
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    headers,
                    "Too many login attempts. Please try again later.",
                )
                    .into_response()
            }
            AppError::Io(_) | AppError::Data(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<TrendError> for AppError {
    fn from(value: TrendError) -> Self {
        match value {
            TrendError::NoData(_) => AppError::NotFound,
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidDomain(_) => AppError::Forbidden,
            AuthError::Expired => AppError::TokenExpired,
            AuthError::Jwt(msg) => AppError::Internal(msg),
            _ => AppError::Unauthorized,
        }
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::Trend(e) => e.into(),
            SessionError::Closed => AppError::Internal("session task has stopped".to_string()),
        }
    }
}
