use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

/// Engine and session services log at debug so degraded forecasts and session churn are
/// visible without `RUST_LOG`.
pub const DEFAULT_FILTER: &str =
    "info,sales_trends::services::forecast_service=debug,sales_trends::services::session_service=debug";

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            loki_enabled: lookup("LOKI_ENABLED")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            loki_url: lookup("LOKI_URL").filter(|url| !url.is_empty()),
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "sales-trends".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_enabled && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        Ok(())
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    #[cfg(feature = "loki")]
    {
        if config.loki_enabled {
            if let Some(loki_url) = config.loki_url.clone() {
                return init_with_loki(config, &loki_url);
            }
        }
    }

    let service_name = config.service_name.clone();
    init_console_only(config)?;
    tracing::info!("Console logging initialized for {}", service_name);
    Ok(())
}

/// A malformed `RUST_LOG` falls back to [`DEFAULT_FILTER`] instead of silencing everything.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("Invalid RUST_LOG '{}': {}, using default filter", level, e);
        EnvFilter::new(DEFAULT_FILTER)
    })
}

fn init_console_only(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: LoggingConfig, loki_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = url::Url::parse(loki_url)?;

    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url)?;

    // Ships buffered events to Loki for the life of the process.
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    tracing::info!("Loki logging initialized at {}", loki_url);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> LoggingConfig {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        LoggingConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults_enable_engine_debug() {
        let config = config(&[]);

        assert_eq!(config.service_name, "sales-trends");
        assert_eq!(config.log_level, DEFAULT_FILTER);
        assert!(config.log_level.contains("sales_trends::services::forecast_service=debug"));
        assert!(!config.loki_enabled);
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_rust_log_overrides_default() {
        let config = config(&[("RUST_LOG", "warn"), ("LOKI_ENABLED", "yes")]);

        assert_eq!(config.log_level, "warn");
        assert!(!config.loki_enabled);
    }

    #[test]
    fn test_loki_requires_url() {
        let config = LoggingConfig {
            loki_enabled: true,
            loki_url: None,
            service_name: "sales-trends".to_string(),
            environment: "test".to_string(),
            log_level: "info".to_string(),
        };
        assert!(config.validate().is_err());

        let config = LoggingConfig { loki_enabled: false, ..config };
        assert!(config.validate().is_ok());
    }
}
