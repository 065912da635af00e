use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::services::ServeDir;

use crate::middleware::{require_auth, security_headers, SecurityHeaders, STATIC_CACHE_MAX_AGE};
use crate::routes::{auth, dashboard, health, session};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let production = state.config.production;

    let protected = Router::<AppState>::new()
        .merge(dashboard::router())
        .merge(auth::protected_router())
        .nest("/api/session", session::router())
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let api = Router::<AppState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(protected)
        .layer(from_fn_with_state(SecurityHeaders::no_store(production), security_headers));

    let static_files = Router::<AppState>::new()
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .layer(from_fn_with_state(
            SecurityHeaders::cached(production, STATIC_CACHE_MAX_AGE),
            security_headers,
        ));

    api.merge(static_files).with_state(state)
}
