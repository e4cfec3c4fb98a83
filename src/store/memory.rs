use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{CatalogStore, StatusStore};
use crate::models::{Listing, Product, ScraperStatus, Vendor};
use crate::utils::error::{AppError, Result};

/// In-process store used by tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    vendors: RwLock<Vec<Vendor>>,
    products: RwLock<HashMap<String, Product>>,
    listings: RwLock<Vec<Listing>>,
    status: RwLock<Option<ScraperStatus>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_vendor(&self, vendor: Vendor) {
        self.vendors.write().await.push(vendor);
    }

    pub async fn add_product(&self, product: Product) {
        self.products.write().await.insert(product.id.clone(), product);
    }

    pub async fn add_listing(&self, listing: Listing) {
        self.listings.write().await.push(listing);
    }

    pub async fn vendor(&self, vendor_id: &str) -> Option<Vendor> {
        self.vendors.read().await.iter().find(|v| v.id == vendor_id).cloned()
    }

    pub async fn product(&self, product_id: &str) -> Option<Product> {
        self.products.read().await.get(product_id).cloned()
    }

    pub async fn listing(&self, listing_id: &str) -> Option<Listing> {
        self.listings.read().await.iter().find(|l| l.id == listing_id).cloned()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn auto_update_vendors(&self) -> Result<Vec<Vendor>> {
        let vendors = self.vendors.read().await;
        Ok(vendors.iter().filter(|v| v.supports_automatic_updates).cloned().collect())
    }

    async fn set_vendor_auto_update(&self, vendor_id: &str, enabled: bool) -> Result<()> {
        let mut vendors = self.vendors.write().await;
        let vendor = vendors
            .iter_mut()
            .find(|v| v.id == vendor_id)
            .ok_or_else(|| AppError::NotFound {
                resource: format!("vendor {}", vendor_id),
            })?;
        vendor.supports_automatic_updates = enabled;
        Ok(())
    }

    async fn listings_for_vendor(&self, vendor_id: &str) -> Result<Vec<Listing>> {
        let listings = self.listings.read().await;
        Ok(listings.iter().filter(|l| l.vendor_id == vendor_id).cloned().collect())
    }

    async fn get_listing(&self, listing_id: &str) -> Result<Option<Listing>> {
        Ok(self.listing(listing_id).await)
    }

    async fn update_listing_prices(
        &self,
        listing_id: &str,
        price: Decimal,
        discounted_price: Decimal,
        listed_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut listings = self.listings.write().await;
        let listing = listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .ok_or_else(|| AppError::NotFound {
                resource: format!("listing {}", listing_id),
            })?;
        listing.apply_prices(price, discounted_price, listed_at);
        Ok(())
    }

    async fn listings_for_product(&self, product_id: &str) -> Result<Vec<Listing>> {
        let listings = self.listings.read().await;
        Ok(listings.iter().filter(|l| l.product_id == product_id).cloned().collect())
    }

    async fn set_product_cheapest_price(&self, product_id: &str, price: Option<Decimal>) -> Result<()> {
        let mut products = self.products.write().await;
        let product = products.get_mut(product_id).ok_or_else(|| AppError::NotFound {
            resource: format!("product {}", product_id),
        })?;
        product.cheapest_price = price;
        Ok(())
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn get_status(&self) -> Result<Option<ScraperStatus>> {
        Ok(self.status.read().await.clone())
    }

    async fn insert_status(&self, status: ScraperStatus) -> Result<()> {
        let mut current = self.status.write().await;
        if current.is_some() {
            return Err(AppError::Internal("scraper status row already exists".to_string()));
        }
        *current = Some(status);
        Ok(())
    }

    async fn update_status(&self, status: ScraperStatus) -> Result<()> {
        let mut current = self.status.write().await;
        if current.is_none() {
            return Err(AppError::NotFound {
                resource: "scraper status".to_string(),
            });
        }
        *current = Some(status);
        Ok(())
    }
}
