use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::models::ScraperStatus;
use crate::store::StatusStore;
use crate::utils::error::Result;

/// Reads and writes the timestamp of the last completed scrape run.
#[derive(Clone)]
pub struct StatusTracker {
    store: Arc<dyn StatusStore>,
}

impl StatusTracker {
    pub fn new(store: Arc<dyn StatusStore>) -> Self {
        Self { store }
    }

    /// Last completed run, or `DateTime::<Utc>::MIN_UTC` when there has never been one.
    pub async fn get_last_update_time(&self) -> Result<DateTime<Utc>> {
        let status = self.store.get_status().await?;
        Ok(status.map_or(DateTime::<Utc>::MIN_UTC, |s| s.last_updated))
    }

    /// Stamps the status row with the current time, creating it on first use.
    pub async fn update_last_update_time(&self) -> Result<DateTime<Utc>> {
        let now = Utc::now();
        let status = ScraperStatus::new(now);

        if self.store.get_status().await?.is_some() {
            self.store.update_status(status).await?;
        } else {
            self.store.insert_status(status).await?;
        }

        tracing::debug!(last_updated = %now, "scraper status updated");
        Ok(now)
    }
}
