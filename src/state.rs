use std::sync::Arc;

use crate::config::AppConfig;
use crate::external::google_auth::TokenVerifier;
use crate::services::auth_service::JwtKeys;
use crate::services::rate_limiter::LoginRateLimiter;
use crate::services::session_service::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub sessions: SessionRegistry,
    pub login_limiter: LoginRateLimiter,
    pub token_verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig, jwt_secret: &[u8], token_verifier: Arc<dyn TokenVerifier>) -> Self {
        let sessions = SessionRegistry::new(config.forecast_months);
        Self {
            config: Arc::new(config),
            jwt: JwtKeys::from_secret(jwt_secret),
            sessions,
            login_limiter: LoginRateLimiter::default(),
            token_verifier,
        }
    }
}
