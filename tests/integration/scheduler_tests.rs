use super::*;
use chrono::Duration;
use price_scraper::scheduler::{ScrapeTrigger, TickOutcome};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_on_demand_run_resets_the_schedule() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string("£3.49"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let (vendor_id, product_id) = seed_vendor(&store, &server.uri()).await;
    seed_listing(&store, &product_id, &vendor_id, format!("{}/item", server.uri())).await;

    let orchestrator = Arc::new(build_orchestrator(
        &test_config(dir.path()),
        store.clone(),
        Arc::new(BroadcastLogSink::new(16)),
    ));
    let trigger = ScrapeTrigger::new(orchestrator, Duration::hours(12));

    let summary = trigger.run_now().await.unwrap();
    assert_eq!(summary.updated, 1);

    // The scheduled tick right after sees a fresh status and does not fetch again.
    assert!(matches!(trigger.tick().await.unwrap(), TickOutcome::Skipped { .. }));
}
