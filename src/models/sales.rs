use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// A single month of recorded sales for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: NaiveDateTime,
    pub sales: f64,
}

impl SalesPoint {
    pub fn new(date: NaiveDateTime, sales: f64) -> Self {
        Self { date, sales }
    }
}

/// Full history of every item, keyed by item key, as served by `/api/dashboard_data`.
pub type ItemCatalog = BTreeMap<String, Vec<SalesPoint>>;
