// Shared fixtures for the integration tests

pub mod pipeline_tests;
pub mod scheduler_tests;

use std::path::Path;
use std::sync::Arc;

use price_scraper::config::ScraperConfig;
use price_scraper::log_sink::BroadcastLogSink;
use price_scraper::models::{Listing, NewListing, Product, Vendor};
use price_scraper::plugins::{ParseResult, ParserRegistry, PriceParser};
use price_scraper::store::MemoryStore;
use price_scraper::utils::extract_price;
use price_scraper::ScrapeOrchestrator;

/// Reads the first price token from a plain page, keyed on a local host name.
pub struct LocalParser {
    domain: &'static str,
}

impl LocalParser {
    pub fn handle(domain: &'static str) -> Arc<dyn PriceParser> {
        Arc::new(Self { domain })
    }
}

impl PriceParser for LocalParser {
    fn name(&self) -> &str {
        "local"
    }

    fn supported_domain(&self) -> &str {
        self.domain
    }

    fn parse_price(&self, page: &[u8]) -> ParseResult {
        ParseResult::undiscounted(extract_price(&String::from_utf8_lossy(page)))
    }
}

pub fn test_config(cache_dir: &Path) -> ScraperConfig {
    ScraperConfig {
        user_agent: "PriceScraper-Test/1.0".to_string(),
        request_timeout_secs: 5,
        robots_cache_dir: cache_dir.to_path_buf(),
        cooldown_ms: 50,
        cooldown_poll_ms: 5,
        max_retries: 2,
        retry_base_delay_ms: 0,
        ..ScraperConfig::default()
    }
}

pub fn local_registry() -> ParserRegistry {
    ParserRegistry::new([LocalParser::handle("127.0.0.1"), LocalParser::handle("localhost")])
}

pub fn build_orchestrator(
    config: &ScraperConfig,
    store: Arc<MemoryStore>,
    sink: Arc<BroadcastLogSink>,
) -> ScrapeOrchestrator {
    ScrapeOrchestrator::new(config, store.clone(), store, local_registry(), sink)
        .expect("orchestrator should build")
}

/// Adds a vendor and a fresh product, returning both ids.
pub async fn seed_vendor(store: &MemoryStore, base_url: &str) -> (String, String) {
    let vendor = Vendor::new("Local Shop", base_url, true);
    let product = Product::new("Kettle");
    let ids = (vendor.id.clone(), product.id.clone());
    store.add_vendor(vendor).await;
    store.add_product(product).await;
    ids
}

pub async fn seed_listing(store: &MemoryStore, product_id: &str, vendor_id: &str, url: String) -> String {
    let listing = Listing::new(NewListing {
        product_id: product_id.to_string(),
        vendor_id: vendor_id.to_string(),
        purchase_url: url,
    });
    let id = listing.id.clone();
    store.add_listing(listing).await;
    id
}
