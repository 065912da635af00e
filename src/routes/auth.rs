use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::middleware::AuthUser;
use crate::services::auth_service::{
    check_token_info, cookie_value, session_cookie, AuthError, SESSION_COOKIE, SESSION_TTL_HOURS,
};
use crate::state::AppState;

/// Routes reachable without a session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", get(logout))
        .route("/htmx/login", get(login_fragment))
}

/// Routes that need a session; the caller layers authentication on top.
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/api/user", get(user_info))
}

/// Fields posted by Google Sign-In.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub credential: String,
    #[serde(default)]
    pub g_csrf_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let client = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    info!("POST /api/login - Login attempt from {}", client);

    if !state.login_limiter.check(&client) {
        warn!("Login rate limit exceeded for {}", client);
        return Err(AppError::RateLimited);
    }

    // Logged only: Google's double-submit cookie is advisory here.
    match cookie_value(&headers, "g_csrf_token") {
        Some(cookie) if cookie == form.g_csrf_token => {}
        _ => warn!("CSRF token mismatch on login from {}", client),
    }

    if form.credential.is_empty() {
        warn!("Login without credential from {}", client);
    }

    let token_info = state
        .token_verifier
        .token_info(&form.credential)
        .await
        .map_err(|e| AuthError::Verification(e.to_string()))
        .map_err(|e| {
            error!("Token verification failed: {}", e);
            e
        })?;

    let email = check_token_info(&token_info, &state.config.google_client_id, &state.config.company_domain)
        .map_err(|e| {
            error!("Token rejected: {}", e);
            e
        })?;

    let token = state.jwt.issue(&email).map_err(|e| {
        error!("JWT generation failed: {}", e);
        e
    })?;

    info!("Login successful for user: {}", email);
    let cookie = session_cookie(&token, SESSION_TTL_HOURS * 3600, state.config.production);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/dashboard")))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(claims) = cookie_value(&headers, SESSION_COOKIE).and_then(|t| state.jwt.validate(&t).ok()) {
        state.sessions.remove(&claims.email);
        info!("User logged out: {}", claims.email);
    }

    let cookie = session_cookie("", -1, state.config.production);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/"))
}

async fn user_info(Extension(user): Extension<AuthUser>) -> String {
    format!("Authenticated user: {}", user.email)
}

async fn login_fragment(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let template = tokio::fs::read_to_string(&state.config.login_template)
        .await
        .map_err(|e| {
            error!("Failed to read login template: {}", e);
            AppError::from(e)
        })?;

    Ok(Html(
        template
            .replace("{{.ClientID}}", &state.config.google_client_id)
            .replace("{{.URI}}", &state.config.login_uri),
    ))
}
