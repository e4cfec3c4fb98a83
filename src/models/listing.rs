use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::generate_id;

/// A vendor's offer for one product, refreshed by the scraper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub product_id: String,
    pub vendor_id: String,
    pub purchase_url: String,

    // Current prices; zero means the last scrape could not read them
    pub price: Decimal,
    pub discounted_price: Decimal,
    pub last_listed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub product_id: String,
    pub vendor_id: String,
    pub purchase_url: String,
}

impl Listing {
    pub fn new(new_listing: NewListing) -> Self {
        Self {
            id: generate_id(),
            product_id: new_listing.product_id,
            vendor_id: new_listing.vendor_id,
            purchase_url: new_listing.purchase_url,
            price: Decimal::ZERO,
            discounted_price: Decimal::ZERO,
            last_listed: None,
        }
    }

    /// The price a buyer pays today, or `None` when unknown.
    pub fn effective_price(&self) -> Option<Decimal> {
        if self.discounted_price > Decimal::ZERO {
            Some(self.discounted_price)
        } else if self.price > Decimal::ZERO {
            Some(self.price)
        } else {
            None
        }
    }

    pub fn has_discount(&self) -> bool {
        self.discounted_price > Decimal::ZERO && self.discounted_price < self.price
    }

    pub fn apply_prices(&mut self, price: Decimal, discounted_price: Decimal, at: DateTime<Utc>) {
        self.price = price;
        self.discounted_price = discounted_price;
        self.last_listed = Some(at);
    }
}

/// Cheapest known effective price across a product's listings.
pub fn cheapest_price<'a>(listings: impl IntoIterator<Item = &'a Listing>) -> Option<Decimal> {
    listings.into_iter().filter_map(Listing::effective_price).min()
}
