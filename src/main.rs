use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use sales_trends::app;
use sales_trends::config::AppConfig;
use sales_trends::external::google_auth::GoogleTokenVerifier;
use sales_trends::logging::{init_logging, LoggingConfig};
use sales_trends::services::auth_service::{load_or_generate_secret, SESSION_TTL_HOURS};
use sales_trends::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env();
    config.validate()?;
    let addr = config.socket_addr()?;

    if config.company_domain.is_empty() {
        tracing::warn!("COMPANY_DOMAIN is not set, every login will be rejected");
    }

    let secret = load_or_generate_secret(config.jwt_secret.as_deref(), &config.jwt_secret_file).await?;
    let verifier = Arc::new(GoogleTokenVerifier::new()?);
    let state = AppState::new(config, &secret, verifier);

    let limiter = state.login_limiter.clone();
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        // No request can reach a session once its cookie has expired.
        let max_idle = Duration::from_secs(SESSION_TTL_HOURS as u64 * 3600);
        let mut interval = tokio::time::interval(Duration::from_secs(5 * 60));
        loop {
            interval.tick().await;
            limiter.cleanup_expired();
            let swept = sessions.sweep_idle(max_idle);
            if swept > 0 {
                tracing::info!("Dropped {} idle sessions, {} active", swept, sessions.session_count());
            }
        }
    });

    let app = app::create_app(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Sales trends backend running at http://{}/", addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
