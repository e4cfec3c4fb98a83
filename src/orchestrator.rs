//! The scrape pipeline.
//!
//! A run moves through five phases in order: resolve vendors, collect
//! candidate URLs, filter them through robots.txt, fetch/parse/persist each
//! admitted URL, and finally stamp the run status. Only store failures in
//! the early phases and robots cache failures abort a run; a unit of work in
//! the fetch phase fails on its own.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

use crate::config::ScraperConfig;
use crate::fetcher::Fetcher;
use crate::log_sink::SharedLogSink;
use crate::models::{cheapest_price, domain_of};
use crate::plugins::{ParseResult, ParserRegistry};
use crate::rate_limiter::DomainRateLimiter;
use crate::retry::RetryExecutor;
use crate::robots::RobotsComplianceGate;
use crate::status::StatusTracker;
use crate::store::{CatalogStore, StatusStore};
use crate::utils::error::{AppError, Result};

/// Aggregate outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub eligible_vendors: usize,
    pub demoted_vendors: usize,
    pub candidates: usize,
    pub admitted: usize,
    pub updated: usize,
    pub unrecognised: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub fn started(at: DateTime<Utc>) -> Self {
        Self {
            eligible_vendors: 0,
            demoted_vendors: 0,
            candidates: 0,
            admitted: 0,
            updated: 0,
            unrecognised: 0,
            failed: 0,
            started_at: at,
            finished_at: None,
        }
    }
}

/// A listing URL that has a registered parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub url: Url,
    pub domain: String,
    pub listing_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitOutcome {
    Updated,
    Unrecognised,
    Failed,
}

pub struct ScrapeOrchestrator {
    catalog: Arc<dyn CatalogStore>,
    status: StatusTracker,
    registry: ParserRegistry,
    fetcher: Fetcher,
    robots: RobotsComplianceGate,
    rate_limiter: DomainRateLimiter,
    retry: RetryExecutor,
    log_sink: SharedLogSink,
    max_retries: u32,
    max_concurrent_domains: usize,
    // Serialises listing writes with the cheapest-price recompute that reads them back.
    persist_lock: Mutex<()>,
}

impl ScrapeOrchestrator {
    pub fn new(
        config: &ScraperConfig,
        catalog: Arc<dyn CatalogStore>,
        status_store: Arc<dyn StatusStore>,
        registry: ParserRegistry,
        log_sink: SharedLogSink,
    ) -> Result<Self> {
        let fetcher = Fetcher::new(config)?;
        let robots = RobotsComplianceGate::new(
            fetcher.clone(),
            config.robots_cache_dir.clone(),
            config.robots_ttl(),
        );

        Ok(Self {
            catalog,
            status: StatusTracker::new(status_store),
            registry,
            fetcher,
            robots,
            rate_limiter: DomainRateLimiter::new(config.cooldown(), config.cooldown_poll()),
            retry: RetryExecutor::new(config.retry_base_delay()).with_log_sink(Arc::clone(&log_sink)),
            log_sink,
            max_retries: config.max_retries,
            max_concurrent_domains: config.max_concurrent_domains.max(1),
            persist_lock: Mutex::new(()),
        })
    }

    pub fn robots(&self) -> &RobotsComplianceGate {
        &self.robots
    }

    pub fn status(&self) -> &StatusTracker {
        &self.status
    }

    /// Runs every phase once. Both the scheduler and on-demand triggers come through here.
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::started(Utc::now());
        tracing::info!("starting scrape run");
        self.log_sink.push("Scrape run started");
        metrics::counter!("scraper_runs_total").increment(1);

        let eligible = self.resolve_vendors(&mut summary).await?;
        let candidates = self.collect_candidates(&eligible).await?;
        summary.candidates = candidates.len();

        let admitted = match self.filter_robots(candidates).await {
            Ok(admitted) => admitted,
            Err(e) => {
                tracing::error!(error = %e, "robots filtering failed, aborting run");
                self.log_sink
                    .push(&format!("Scrape run aborted while checking robots.txt: {}", e));
                return Err(e);
            }
        };
        summary.admitted = admitted.len();

        for outcome in self.fetch_parse_persist(admitted).await {
            match outcome {
                UnitOutcome::Updated => summary.updated += 1,
                UnitOutcome::Unrecognised => summary.unrecognised += 1,
                UnitOutcome::Failed => summary.failed += 1,
            }
        }

        self.finalize(&mut summary).await?;
        Ok(summary)
    }

    /// Returns the ids of vendors that are flagged for updates and have a parser.
    ///
    /// Flagged vendors without a parser are demoted in the store.
    pub async fn resolve_vendors(&self, summary: &mut RunSummary) -> Result<Vec<String>> {
        let vendors = self.catalog.auto_update_vendors().await?;
        let mut eligible = Vec::with_capacity(vendors.len());

        for vendor in vendors {
            match vendor.domain() {
                Some(domain) if self.registry.has_parser(&domain) => eligible.push(vendor.id),
                domain => {
                    let domain = domain.unwrap_or_else(|| vendor.base_url.clone());
                    tracing::warn!(
                        vendor_id = %vendor.id,
                        domain = %domain,
                        "no parser for vendor, disabling automatic updates"
                    );
                    self.catalog.set_vendor_auto_update(&vendor.id, false).await?;
                    self.log_sink.push(&format!(
                        "Disabled automatic updates for {}: no parser for {}",
                        vendor.name, domain
                    ));
                    summary.demoted_vendors += 1;
                }
            }
        }

        summary.eligible_vendors = eligible.len();
        tracing::debug!(
            eligible = eligible.len(),
            demoted = summary.demoted_vendors,
            "resolved vendors"
        );
        Ok(eligible)
    }

    /// Listing URLs of eligible vendors, in enumeration order.
    pub async fn collect_candidates(&self, vendor_ids: &[String]) -> Result<Vec<Candidate>> {
        let mut candidates = Vec::new();

        for vendor_id in vendor_ids {
            for listing in self.catalog.listings_for_vendor(vendor_id).await? {
                let url = match Url::parse(listing.purchase_url.trim()) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::warn!(
                            listing_id = %listing.id,
                            url = %listing.purchase_url,
                            error = %e,
                            "skipping listing with malformed purchase URL"
                        );
                        self.log_sink.push(&format!(
                            "Skipped listing {}: malformed purchase URL {:?}",
                            listing.id, listing.purchase_url
                        ));
                        continue;
                    }
                };

                match domain_of(&url) {
                    Some(domain) if self.registry.has_parser(&domain) => candidates.push(Candidate {
                        url,
                        domain,
                        listing_id: listing.id,
                    }),
                    _ => {
                        tracing::debug!(listing_id = %listing.id, url = %url, "no parser for listing host");
                    }
                }
            }
        }

        Ok(candidates)
    }

    /// Drops candidates that robots.txt refuses. Errors only when the robots cache is unwritable.
    pub async fn filter_robots(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let mut admitted = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if self.robots.check_allowed(&candidate.url).await? {
                admitted.push(candidate);
            } else {
                metrics::counter!("scraper_robots_denied_total").increment(1);
                tracing::info!(url = %candidate.url, "robots.txt disallows listing, skipping");
            }
        }

        Ok(admitted)
    }

    async fn fetch_parse_persist(&self, admitted: Vec<Candidate>) -> Vec<UnitOutcome> {
        if self.max_concurrent_domains == 1 {
            let mut outcomes = Vec::with_capacity(admitted.len());
            for candidate in &admitted {
                outcomes.push(self.process_unit(candidate).await);
            }
            return outcomes;
        }

        let grouped: Vec<Vec<UnitOutcome>> = stream::iter(group_by_domain(admitted))
            .map(|group| async move {
                let mut outcomes = Vec::with_capacity(group.len());
                for candidate in &group {
                    outcomes.push(self.process_unit(candidate).await);
                }
                outcomes
            })
            .buffer_unordered(self.max_concurrent_domains)
            .collect()
            .await;

        grouped.into_iter().flatten().collect()
    }

    async fn process_unit(&self, candidate: &Candidate) -> UnitOutcome {
        let outcome = self
            .rate_limiter
            .enqueue(&candidate.domain, move || async move {
                self.process_listing(candidate).await.inspect_err(|e| {
                    self.log_sink.push(&format!(
                        "Failed to update listing {} from {}: {}",
                        candidate.listing_id, candidate.url, e
                    ));
                })
            })
            .await;

        outcome.unwrap_or(UnitOutcome::Failed)
    }

    async fn process_listing(&self, candidate: &Candidate) -> Result<UnitOutcome> {
        let label = format!("fetch {}", candidate.url);
        let response = self
            .retry
            .execute_with_retry(move || self.fetcher.get(&candidate.url), &label, self.max_retries)
            .await?;

        let parser = self
            .registry
            .get_parser(&candidate.domain)
            .ok_or_else(|| AppError::ParserMissing {
                domain: candidate.domain.clone(),
            })?;
        if !parser.can_parse(&candidate.url) {
            tracing::warn!(parser = parser.name(), url = %candidate.url, "parser does not claim this URL");
        }

        let result = parser.parse_price(&response.body);
        // Unknown prices are written back as zeros; the cheapest-price roll-up skips them.
        self.persist(candidate, result).await?;

        if result.is_unknown() {
            tracing::warn!(
                parser = parser.name(),
                listing_id = %candidate.listing_id,
                url = %candidate.url,
                "unrecognised page layout, price recorded as unknown"
            );
            self.log_sink.push(&format!(
                "Could not read a price for listing {} from {}",
                candidate.listing_id, candidate.url
            ));
            return Ok(UnitOutcome::Unrecognised);
        }

        Ok(UnitOutcome::Updated)
    }

    async fn persist(&self, candidate: &Candidate, result: ParseResult) -> Result<()> {
        let _guard = self.persist_lock.lock().await;

        let previous = self
            .catalog
            .get_listing(&candidate.listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource: format!("listing {}", candidate.listing_id),
            })?;

        self.catalog
            .update_listing_prices(&previous.id, result.price, result.discounted_price, Utc::now())
            .await?;

        let siblings = self.catalog.listings_for_product(&previous.product_id).await?;
        let cheapest = cheapest_price(&siblings);
        self.catalog
            .set_product_cheapest_price(&previous.product_id, cheapest)
            .await?;

        metrics::counter!("scraper_listings_updated_total").increment(1);
        tracing::info!(
            listing_id = %previous.id,
            price = %result.price,
            discounted_price = %result.discounted_price,
            "listing updated"
        );

        if let Some(old) = previous.effective_price() {
            if !result.is_unknown() && result.discounted_price < old {
                self.log_sink.push(&format!(
                    "Price drop on listing {}: {} -> {}",
                    previous.id, old, result.discounted_price
                ));
            }
        }

        Ok(())
    }

    async fn finalize(&self, summary: &mut RunSummary) -> Result<()> {
        let finished_at = self.status.update_last_update_time().await?;
        summary.finished_at = Some(finished_at);

        tracing::info!(
            eligible_vendors = summary.eligible_vendors,
            demoted_vendors = summary.demoted_vendors,
            admitted = summary.admitted,
            updated = summary.updated,
            unrecognised = summary.unrecognised,
            failed = summary.failed,
            "scrape run complete"
        );
        self.log_sink.push(&format!(
            "Scrape run complete: {} of {} listings updated, {} unrecognised, {} failed",
            summary.updated, summary.admitted, summary.unrecognised, summary.failed
        ));
        Ok(())
    }
}

/// Groups candidates by domain, keeping first-seen domain order and per-domain listing order.
fn group_by_domain(candidates: Vec<Candidate>) -> Vec<Vec<Candidate>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Candidate>> = Vec::new();

    for candidate in candidates {
        match index.get(&candidate.domain) {
            Some(&slot) => groups[slot].push(candidate),
            None => {
                index.insert(candidate.domain.clone(), groups.len());
                groups.push(vec![candidate]);
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_sink::{BroadcastLogSink, drain};
    use crate::models::{Listing, NewListing, Product, Vendor};
    use crate::plugins::PriceParser;
    use crate::store::{MemoryStore, MockCatalogStore};
    use crate::utils::price::extract_price;
    use rust_decimal::Decimal;
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct LocalParser;

    impl PriceParser for LocalParser {
        fn name(&self) -> &str {
            "local"
        }

        fn supported_domain(&self) -> &str {
            "127.0.0.1"
        }

        fn parse_price(&self, page: &[u8]) -> ParseResult {
            ParseResult::undiscounted(extract_price(&String::from_utf8_lossy(page)))
        }
    }

    fn test_config(cache_dir: &Path) -> ScraperConfig {
        ScraperConfig {
            request_timeout_secs: 5,
            robots_cache_dir: cache_dir.to_path_buf(),
            cooldown_ms: 0,
            cooldown_poll_ms: 5,
            max_retries: 0,
            retry_base_delay_ms: 0,
            ..ScraperConfig::default()
        }
    }

    fn orchestrator(
        config: &ScraperConfig,
        catalog: Arc<dyn CatalogStore>,
        status: Arc<dyn StatusStore>,
        registry: ParserRegistry,
    ) -> ScrapeOrchestrator {
        let sink = Arc::new(BroadcastLogSink::new(64));
        ScrapeOrchestrator::new(config, catalog, status, registry, sink).unwrap()
    }

    fn listing(product_id: &str, vendor_id: &str, url: &str) -> Listing {
        Listing::new(NewListing {
            product_id: product_id.to_string(),
            vendor_id: vendor_id.to_string(),
            purchase_url: url.to_string(),
        })
    }

    #[tokio::test]
    async fn test_vendor_without_parser_is_demoted() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let amazon = Vendor::new("Amazon UK", "https://www.amazon.co.uk", true);
        let corner = Vendor::new("Corner Shop", "https://shop.example", true);
        let (amazon_id, corner_id) = (amazon.id.clone(), corner.id.clone());
        store.add_vendor(amazon).await;
        store.add_vendor(corner).await;

        let orchestrator = orchestrator(
            &test_config(dir.path()),
            store.clone(),
            store.clone(),
            ParserRegistry::with_default_parsers(),
        );
        let mut summary = RunSummary::started(Utc::now());
        let eligible = orchestrator.resolve_vendors(&mut summary).await.unwrap();

        assert_eq!(eligible, vec![amazon_id]);
        assert_eq!(summary.demoted_vendors, 1);
        assert!(!store.vendor(&corner_id).await.unwrap().supports_automatic_updates);

        // A second pass finds nothing left to demote.
        let mut summary = RunSummary::started(Utc::now());
        orchestrator.resolve_vendors(&mut summary).await.unwrap();
        assert_eq!(summary.demoted_vendors, 0);
    }

    #[tokio::test]
    async fn test_vendor_with_unparsable_base_url_is_demoted() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let vendor = Vendor::new("Typo Ltd", "not a url", true);
        let vendor_id = vendor.id.clone();
        store.add_vendor(vendor).await;

        let orchestrator = orchestrator(
            &test_config(dir.path()),
            store.clone(),
            store.clone(),
            ParserRegistry::with_default_parsers(),
        );
        let mut summary = RunSummary::started(Utc::now());
        assert!(orchestrator.resolve_vendors(&mut summary).await.unwrap().is_empty());
        assert!(!store.vendor(&vendor_id).await.unwrap().supports_automatic_updates);
    }

    #[tokio::test]
    async fn test_collect_skips_malformed_and_unsupported_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let vendor = Vendor::new("Amazon UK", "https://www.amazon.co.uk", true);
        let vendor_id = vendor.id.clone();
        store.add_vendor(vendor).await;

        let good = listing("p1", &vendor_id, "https://www.amazon.co.uk/dp/B0001");
        let good_id = good.id.clone();
        store.add_listing(listing("p1", &vendor_id, "amazon dot co dot uk")).await;
        store.add_listing(good).await;
        store.add_listing(listing("p1", &vendor_id, "https://unknown.example/item")).await;

        let orchestrator = orchestrator(
            &test_config(dir.path()),
            store.clone(),
            store.clone(),
            ParserRegistry::with_default_parsers(),
        );
        let candidates = orchestrator.collect_candidates(&[vendor_id]).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].listing_id, good_id);
        assert_eq!(candidates[0].domain, "amazon.co.uk");
    }

    #[tokio::test]
    async fn test_catalog_failure_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = MockCatalogStore::new();
        catalog
            .expect_auto_update_vendors()
            .returning(|| Err(AppError::Internal("connection refused".to_string())));
        let status = Arc::new(MemoryStore::new());

        let orchestrator = orchestrator(
            &test_config(dir.path()),
            Arc::new(catalog),
            status.clone(),
            ParserRegistry::with_default_parsers(),
        );

        assert!(orchestrator.run().await.is_err());
        assert!(status.get_status().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_robots_cache_failure_aborts_before_any_update() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("£9.99"))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = Arc::new(MemoryStore::new());
        let vendor = Vendor::new("Local", server.uri(), true);
        let product = Product::new("Kettle");
        let item = listing(&product.id, &vendor.id, &format!("{}/item", server.uri()));
        let item_id = item.id.clone();
        store.add_vendor(vendor).await;
        store.add_product(product).await;
        store.add_listing(item).await;

        let orchestrator = orchestrator(
            &test_config(&blocker),
            store.clone(),
            store.clone(),
            ParserRegistry::new([Arc::new(LocalParser) as Arc<dyn PriceParser>]),
        );

        assert!(orchestrator.run().await.is_err());
        assert!(store.listing(&item_id).await.unwrap().last_listed.is_none());
        assert!(store.get_status().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_price_drop_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Now £8.50</p>"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let vendor = Vendor::new("Local", server.uri(), true);
        let product = Product::new("Kettle");
        let mut item = listing(&product.id, &vendor.id, &format!("{}/item", server.uri()));
        item.apply_prices(Decimal::new(1000, 2), Decimal::new(1000, 2), Utc::now());
        let (item_id, product_id) = (item.id.clone(), product.id.clone());
        store.add_vendor(vendor).await;
        store.add_product(product).await;
        store.add_listing(item).await;

        let sink = Arc::new(BroadcastLogSink::new(64));
        let mut rx = sink.subscribe();
        let orchestrator = ScrapeOrchestrator::new(
            &test_config(dir.path()),
            store.clone(),
            store.clone(),
            ParserRegistry::new([Arc::new(LocalParser) as Arc<dyn PriceParser>]),
            sink,
        )
        .unwrap();

        let summary = orchestrator.run().await.unwrap();
        assert_eq!(summary.updated, 1);

        let updated = store.listing(&item_id).await.unwrap();
        assert_eq!(updated.price, Decimal::new(850, 2));
        assert_eq!(updated.discounted_price, Decimal::new(850, 2));
        assert_eq!(
            store.product(&product_id).await.unwrap().cheapest_price,
            Some(Decimal::new(850, 2))
        );

        let messages = drain(&mut rx);
        assert!(messages.iter().any(|m| m.starts_with("Price drop on listing")));
        assert!(messages.last().unwrap().starts_with("Scrape run complete"));
    }

    #[tokio::test]
    async fn test_unknown_price_is_written_back_as_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Currently unavailable</p>"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let local = Vendor::new("Local", server.uri(), true);
        let other = Vendor::new("Other", "https://shop.example", false);
        let product = Product::new("Kettle");
        let mut gone = listing(&product.id, &local.id, &format!("{}/gone", server.uri()));
        gone.apply_prices(Decimal::new(1000, 2), Decimal::new(1000, 2), Utc::now());
        let mut sibling = listing(&product.id, &other.id, "https://shop.example/kettle");
        sibling.apply_prices(Decimal::new(1200, 2), Decimal::new(1200, 2), Utc::now());
        let (gone_id, product_id) = (gone.id.clone(), product.id.clone());
        store.add_vendor(local).await;
        store.add_vendor(other).await;
        store.add_product(product).await;
        store.add_listing(gone).await;
        store.add_listing(sibling).await;

        let sink = Arc::new(BroadcastLogSink::new(64));
        let mut rx = sink.subscribe();
        let orchestrator = ScrapeOrchestrator::new(
            &test_config(dir.path()),
            store.clone(),
            store.clone(),
            ParserRegistry::new([Arc::new(LocalParser) as Arc<dyn PriceParser>]),
            sink,
        )
        .unwrap();
        let before = Utc::now();
        let summary = orchestrator.run().await.unwrap();
        assert_eq!(summary.unrecognised, 1);
        assert_eq!(summary.updated, 0);

        let written = store.listing(&gone_id).await.unwrap();
        assert_eq!(written.price, Decimal::ZERO);
        assert_eq!(written.discounted_price, Decimal::ZERO);
        assert!(written.last_listed.unwrap() >= before);
        assert_eq!(
            store.product(&product_id).await.unwrap().cheapest_price,
            Some(Decimal::new(1200, 2))
        );

        let messages = drain(&mut rx);
        assert!(messages.iter().any(|m| m.starts_with("Could not read a price")));
        assert!(!messages.iter().any(|m| m.starts_with("Price drop")));
    }

    #[test]
    fn test_grouping_keeps_order_within_domain() {
        let candidate = |host: &str, id: &str| Candidate {
            url: Url::parse(&format!("https://{}/{}", host, id)).unwrap(),
            domain: host.to_string(),
            listing_id: id.to_string(),
        };
        let groups = group_by_domain(vec![
            candidate("amazon.co.uk", "a1"),
            candidate("ebay.co.uk", "e1"),
            candidate("amazon.co.uk", "a2"),
        ]);

        let ids: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.iter().map(|c| c.listing_id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["a1", "a2"], vec!["e1"]]);
    }
}
