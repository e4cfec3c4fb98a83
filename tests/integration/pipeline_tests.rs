use super::*;
use price_scraper::log_sink::drain;
use rust_decimal::Decimal;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_updates_admitted_listings() {
    let server = MockServer::start().await;
    mount_page(&server, "/robots.txt", 200, "User-agent: *\nDisallow: /private\n").await;
    mount_page(&server, "/item/1", 200, "<span class=\"price\">£15.99</span>").await;
    mount_page(&server, "/private/2", 200, "£1.00").await;
    Mock::given(method("GET"))
        .and(path("/item/3"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/item/4", 200, "<p>Currently unavailable</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let (vendor_id, product_id) = seed_vendor(&store, &server.uri()).await;
    let corner = Vendor::new("Corner Shop", "https://shop.example", true);
    let corner_id = corner.id.clone();
    store.add_vendor(corner).await;

    let uri = server.uri();
    let updated = seed_listing(&store, &product_id, &vendor_id, format!("{}/item/1", uri)).await;
    let denied = seed_listing(&store, &product_id, &vendor_id, format!("{}/private/2", uri)).await;
    let missing = seed_listing(&store, &product_id, &vendor_id, format!("{}/item/3", uri)).await;
    let unknown = seed_listing(&store, &product_id, &vendor_id, format!("{}/item/4", uri)).await;

    let sink = Arc::new(BroadcastLogSink::new(128));
    let mut rx = sink.subscribe();
    let orchestrator = build_orchestrator(&test_config(dir.path()), store.clone(), sink);

    let summary = orchestrator.run().await.unwrap();
    assert_eq!(summary.eligible_vendors, 1);
    assert_eq!(summary.demoted_vendors, 1);
    assert_eq!(summary.candidates, 4);
    assert_eq!(summary.admitted, 3);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.unrecognised, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.finished_at.is_some());

    let listing = store.listing(&updated).await.unwrap();
    assert_eq!(listing.price, Decimal::new(1599, 2));
    assert_eq!(listing.discounted_price, Decimal::new(1599, 2));
    assert!(listing.last_listed.is_some());

    for untouched in [&denied, &missing] {
        let listing = store.listing(untouched).await.unwrap();
        assert!(listing.last_listed.is_none());
        assert!(listing.price.is_zero());
    }

    let listing = store.listing(&unknown).await.unwrap();
    assert!(listing.last_listed.is_some());
    assert!(listing.price.is_zero());
    assert!(listing.discounted_price.is_zero());

    assert_eq!(
        store.product(&product_id).await.unwrap().cheapest_price,
        Some(Decimal::new(1599, 2))
    );
    assert!(!store.vendor(&corner_id).await.unwrap().supports_automatic_updates);
    assert!(orchestrator.status().get_last_update_time().await.unwrap() >= summary.started_at);

    let messages = drain(&mut rx);
    assert!(messages.iter().any(|m| m.starts_with("Disabled automatic updates for Corner Shop")));
    assert!(messages.iter().any(|m| m.starts_with(&format!("Failed to update listing {}", missing))));
    assert!(messages.iter().any(|m| m.contains(&unknown)));
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let server = MockServer::start().await;
    mount_page(&server, "/robots.txt", 200, "User-agent: *\n").await;
    Mock::given(method("GET"))
        .and(path("/item/1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_page(&server, "/item/1", 200, "£42.00").await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let (vendor_id, product_id) = seed_vendor(&store, &server.uri()).await;
    let listing_id = seed_listing(&store, &product_id, &vendor_id, format!("{}/item/1", server.uri())).await;

    let sink = Arc::new(BroadcastLogSink::new(64));
    let mut rx = sink.subscribe();
    let orchestrator = build_orchestrator(&test_config(dir.path()), store.clone(), sink);

    let summary = orchestrator.run().await.unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(store.listing(&listing_id).await.unwrap().price, Decimal::new(4200, 2));

    let retries = drain(&mut rx)
        .into_iter()
        .filter(|m| m.contains("retrying in"))
        .count();
    assert_eq!(retries, 2);
}

#[tokio::test]
async fn test_missing_robots_admits_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/item/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("£5.00"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let (vendor_id, product_id) = seed_vendor(&store, &server.uri()).await;
    seed_listing(&store, &product_id, &vendor_id, format!("{}/item/1", server.uri())).await;

    let orchestrator = build_orchestrator(&test_config(dir.path()), store.clone(), Arc::new(BroadcastLogSink::new(16)));
    let summary = orchestrator.run().await.unwrap();

    assert_eq!(summary.candidates, 1);
    assert_eq!(summary.admitted, 0);
    assert_eq!(summary.updated, 0);
}

#[tokio::test]
async fn test_concurrent_domains_share_one_product() {
    let server = MockServer::start().await;
    mount_page(&server, "/robots.txt", 200, "User-agent: *\n").await;
    mount_page(&server, "/a", 200, "£20.00").await;
    mount_page(&server, "/b", 200, "£18.50").await;
    mount_page(&server, "/c", 200, "£19.25").await;

    let port = server.address().port();
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let (first_vendor, product_id) = seed_vendor(&store, &format!("http://127.0.0.1:{}", port)).await;
    let second = Vendor::new("Other Shop", format!("http://localhost:{}", port), true);
    let second_vendor = second.id.clone();
    store.add_vendor(second).await;

    seed_listing(&store, &product_id, &first_vendor, format!("http://127.0.0.1:{}/a", port)).await;
    seed_listing(&store, &product_id, &second_vendor, format!("http://localhost:{}/b", port)).await;
    seed_listing(&store, &product_id, &first_vendor, format!("http://127.0.0.1:{}/c", port)).await;

    let config = ScraperConfig {
        max_concurrent_domains: 2,
        ..test_config(dir.path())
    };
    let orchestrator = build_orchestrator(&config, store.clone(), Arc::new(BroadcastLogSink::new(16)));

    let summary = orchestrator.run().await.unwrap();
    assert_eq!(summary.eligible_vendors, 2);
    assert_eq!(summary.updated, 3);
    assert_eq!(
        store.product(&product_id).await.unwrap().cheapest_price,
        Some(Decimal::new(1850, 2))
    );
}
