use std::net::SocketAddr;
use std::path::PathBuf;

use crate::services::forecast_service::DEFAULT_FORECAST_MONTHS;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub production: bool,
    pub data_file: PathBuf,
    pub monitor_file: PathBuf,
    pub public_dir: PathBuf,
    pub dashboard_template: PathBuf,
    pub login_template: PathBuf,
    pub google_client_id: String,
    pub login_uri: String,
    pub company_domain: String,
    pub jwt_secret: Option<String>,
    pub jwt_secret_file: PathBuf,
    pub forecast_months: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            production: false,
            data_file: PathBuf::from("data/item_data.json"),
            monitor_file: PathBuf::from("volume/monitor.txt"),
            public_dir: PathBuf::from("./public"),
            dashboard_template: PathBuf::from("templates/dashboard.html"),
            login_template: PathBuf::from("templates/htmxLogin.html"),
            google_client_id: String::new(),
            login_uri: "http://localhost:8080/api/login".to_string(),
            company_domain: String::new(),
            jwt_secret: None,
            jwt_secret_file: PathBuf::from(".jwt_secret"),
            forecast_months: DEFAULT_FORECAST_MONTHS as i64,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let production = lookup("ENV").as_deref() == Some("PRODUCTION")
            || lookup("HTTPS").as_deref() == Some("true");

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            production,
            data_file: lookup("DATA_FILE").map(PathBuf::from).unwrap_or(defaults.data_file),
            monitor_file: lookup("MONITOR_FILE").map(PathBuf::from).unwrap_or(defaults.monitor_file),
            public_dir: lookup("PUBLIC_DIR").map(PathBuf::from).unwrap_or(defaults.public_dir),
            dashboard_template: lookup("DASHBOARD_TEMPLATE")
                .map(PathBuf::from)
                .unwrap_or(defaults.dashboard_template),
            login_template: lookup("LOGIN_TEMPLATE")
                .map(PathBuf::from)
                .unwrap_or(defaults.login_template),
            google_client_id: lookup("GOOGLE_CLIENT_ID").unwrap_or_default(),
            login_uri: lookup("LOGIN_URI").unwrap_or(defaults.login_uri),
            company_domain: lookup("COMPANY_DOMAIN").unwrap_or_default(),
            jwt_secret: lookup("JWT_SECRET").filter(|s| !s.is_empty()),
            jwt_secret_file: lookup("JWT_SECRET_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.jwt_secret_file),
            // Out-of-range values are coerced later by the forecast aggregator.
            forecast_months: lookup("FORECAST_MONTHS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.forecast_months),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.bind_addr
            .parse()
            .map_err(|e| format!("BIND_ADDR '{}' is not a socket address: {}", self.bind_addr, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(!config.production);
        assert_eq!(config.forecast_months, 12);
        assert!(config.jwt_secret.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_flags() {
        assert!(config(&[("ENV", "PRODUCTION")]).production);
        assert!(config(&[("HTTPS", "true")]).production);
        assert!(!config(&[("ENV", "staging")]).production);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATA_FILE", "/srv/items.json"),
            ("COMPANY_DOMAIN", "@example.com"),
            ("FORECAST_MONTHS", "200"),
            ("JWT_SECRET", ""),
        ]);

        assert_eq!(config.data_file, PathBuf::from("/srv/items.json"));
        assert_eq!(config.company_domain, "@example.com");
        assert_eq!(config.forecast_months, 200);
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn test_bad_bind_addr_fails_validation() {
        assert!(config(&[("BIND_ADDR", "localhost")]).validate().is_err());
    }
}
