use std::path::Path;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{ItemCatalog, SalesPoint};

/// Months in the active series.
pub const ACTIVE_SERIES_LEN: usize = 24;

pub fn parse_catalog(bytes: &[u8]) -> Result<ItemCatalog, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Read the item catalog from disk. The file is re-read on every call so a regenerated data
/// file is picked up without a restart.
pub async fn load_catalog(path: &Path) -> Result<ItemCatalog, AppError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        warn!("Failed to read catalog {}: {}", path.display(), e);
        AppError::from(e)
    })?;

    let catalog = parse_catalog(&bytes)?;
    info!("Loaded catalog with {} items from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// The 24 months ending one before the last recorded point; the newest month is still
/// accumulating and is left out. Shorter histories give a shorter series.
pub fn active_series(history: &[SalesPoint]) -> Vec<SalesPoint> {
    let end = history.len().saturating_sub(1);
    let start = history.len().saturating_sub(ACTIVE_SERIES_LEN + 1);
    history[start..end].to_vec()
}

/// Active series for `key`; a missing key is "no data", not an error.
pub fn item_series(catalog: &ItemCatalog, key: &str) -> Option<Vec<SalesPoint>> {
    catalog.get(key).map(|history| active_series(history))
}

pub fn item_keys(catalog: &ItemCatalog) -> Vec<&str> {
    catalog.keys().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, NaiveDate};

    fn history(len: usize) -> Vec<SalesPoint> {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        (0..len)
            .map(|i| SalesPoint::new(start.checked_add_months(Months::new(i as u32)).unwrap(), i as f64))
            .collect()
    }

    #[test]
    fn test_active_series_drops_the_latest_point() {
        let series = active_series(&history(30));

        assert_eq!(series.len(), 24);
        assert_eq!(series.first().unwrap().sales, 5.0);
        assert_eq!(series.last().unwrap().sales, 28.0);
    }

    #[test]
    fn test_short_history_uses_what_exists() {
        let series = active_series(&history(10));
        assert_eq!(series.len(), 9);
        assert_eq!(series.last().unwrap().sales, 8.0);

        assert!(active_series(&history(1)).is_empty());
        assert!(active_series(&[]).is_empty());
    }

    #[test]
    fn test_parse_catalog_and_lookup() {
        let json = br#"{
            "widget": [
                {"date": "2023-06-01T09:00:00", "sales": 120},
                {"date": "2023-07-01T09:00:00", "sales": 130.5},
                {"date": "2023-08-01T09:00:00", "sales": 90}
            ],
            "gadget": []
        }"#;
        let catalog = parse_catalog(json).unwrap();

        assert_eq!(item_keys(&catalog), vec!["gadget", "widget"]);
        let series = item_series(&catalog, "widget").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].sales, 130.5);
        assert!(item_series(&catalog, "missing").is_none());
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        assert!(parse_catalog(br#"{"widget": [{"date": "June", "sales": 1}]}"#).is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = load_catalog(Path::new("/nonexistent/item_data.json")).await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
