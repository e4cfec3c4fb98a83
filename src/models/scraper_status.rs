use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Primary key of the single status row.
pub const SCRAPER_STATUS_ID: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ScraperStatus {
    pub id: i64,
    pub last_updated: DateTime<Utc>,
}

impl ScraperStatus {
    pub fn new(last_updated: DateTime<Utc>) -> Self {
        Self {
            id: SCRAPER_STATUS_ID,
            last_updated,
        }
    }
}
