//! SQLite-backed catalogue and status store.
//!
//! The schema belongs to the wider application. Prices are stored as TEXT so
//! decimals survive the round trip exactly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::str::FromStr;

use super::{CatalogStore, StatusStore};
use crate::config::DatabaseConfig;
use crate::models::{Listing, SCRAPER_STATUS_ID, ScraperStatus, Vendor};
use crate::utils::error::{AppError, Result};

const LISTING_COLUMNS: &str =
    "id, product_id, vendor_id, purchase_url, price, discounted_price, last_listed";

/// A row from the `listings` table, with prices still as stored text.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ListingRow {
    id: String,
    product_id: String,
    vendor_id: String,
    purchase_url: String,
    price: String,
    discounted_price: String,
    last_listed: Option<DateTime<Utc>>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = AppError;

    fn try_from(row: ListingRow) -> Result<Self> {
        Ok(Listing {
            price: parse_decimal(&row.price, &row.id)?,
            discounted_price: parse_decimal(&row.discounted_price, &row.id)?,
            id: row.id,
            product_id: row.product_id,
            vendor_id: row.vendor_id,
            purchase_url: row.purchase_url,
            last_listed: row.last_listed,
        })
    }
}

fn parse_decimal(raw: &str, listing_id: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| AppError::Parse {
        message: format!("listing {} has a malformed price {:?}: {}", listing_id, raw, e),
    })
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn query_listings(&self, column: &str, value: &str) -> Result<Vec<Listing>> {
        let sql = format!(
            "SELECT {} FROM listings WHERE {} = ? ORDER BY rowid",
            LISTING_COLUMNS, column
        );
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Listing::try_from).collect()
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn auto_update_vendors(&self) -> Result<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(
            "SELECT id, name, base_url, supports_automatic_updates FROM vendors \
             WHERE supports_automatic_updates = 1 ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(vendors)
    }

    async fn set_vendor_auto_update(&self, vendor_id: &str, enabled: bool) -> Result<()> {
        let result = sqlx::query("UPDATE vendors SET supports_automatic_updates = ? WHERE id = ?")
            .bind(enabled)
            .bind(vendor_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                resource: format!("vendor {}", vendor_id),
            });
        }
        Ok(())
    }

    async fn listings_for_vendor(&self, vendor_id: &str) -> Result<Vec<Listing>> {
        self.query_listings("vendor_id", vendor_id).await
    }

    async fn get_listing(&self, listing_id: &str) -> Result<Option<Listing>> {
        let sql = format!("SELECT {} FROM listings WHERE id = ?", LISTING_COLUMNS);
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Listing::try_from).transpose()
    }

    async fn update_listing_prices(
        &self,
        listing_id: &str,
        price: Decimal,
        discounted_price: Decimal,
        listed_at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE listings SET price = ?, discounted_price = ?, last_listed = ? WHERE id = ?",
        )
        .bind(price.to_string())
        .bind(discounted_price.to_string())
        .bind(listed_at)
        .bind(listing_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                resource: format!("listing {}", listing_id),
            });
        }
        Ok(())
    }

    async fn listings_for_product(&self, product_id: &str) -> Result<Vec<Listing>> {
        self.query_listings("product_id", product_id).await
    }

    async fn set_product_cheapest_price(&self, product_id: &str, price: Option<Decimal>) -> Result<()> {
        let result = sqlx::query("UPDATE products SET cheapest_price = ? WHERE id = ?")
            .bind(price.map(|p| p.to_string()))
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                resource: format!("product {}", product_id),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StatusStore for SqliteStore {
    async fn get_status(&self) -> Result<Option<ScraperStatus>> {
        let status = sqlx::query_as::<_, ScraperStatus>(
            "SELECT id, last_updated FROM scraper_status WHERE id = ?",
        )
        .bind(SCRAPER_STATUS_ID)
        .fetch_optional(&self.pool)
        .await?;
        Ok(status)
    }

    async fn insert_status(&self, status: ScraperStatus) -> Result<()> {
        sqlx::query("INSERT INTO scraper_status (id, last_updated) VALUES (?, ?)")
            .bind(status.id)
            .bind(status.last_updated)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_status(&self, status: ScraperStatus) -> Result<()> {
        let result = sqlx::query("UPDATE scraper_status SET last_updated = ? WHERE id = ?")
            .bind(status.last_updated)
            .bind(status.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                resource: "scraper status".to_string(),
            });
        }
        Ok(())
    }
}
