//! Narrow persistence seams the scraper talks to.
//!
//! The wider application owns the catalogue and its schema; the scraper only
//! reads vendors and listings and writes prices, flags and run status back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Listing, ScraperStatus, Vendor};
use crate::utils::error::Result;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Vendors flagged for automatic updates, in storage order.
    async fn auto_update_vendors(&self) -> Result<Vec<Vendor>>;

    async fn set_vendor_auto_update(&self, vendor_id: &str, enabled: bool) -> Result<()>;

    /// A vendor's listings, in storage order.
    async fn listings_for_vendor(&self, vendor_id: &str) -> Result<Vec<Listing>>;

    async fn get_listing(&self, listing_id: &str) -> Result<Option<Listing>>;

    async fn update_listing_prices(
        &self,
        listing_id: &str,
        price: Decimal,
        discounted_price: Decimal,
        listed_at: DateTime<Utc>,
    ) -> Result<()>;

    async fn listings_for_product(&self, product_id: &str) -> Result<Vec<Listing>>;

    async fn set_product_cheapest_price(&self, product_id: &str, price: Option<Decimal>) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn get_status(&self) -> Result<Option<ScraperStatus>>;

    async fn insert_status(&self, status: ScraperStatus) -> Result<()>;

    async fn update_status(&self, status: ScraperStatus) -> Result<()>;
}
