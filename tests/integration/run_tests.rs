use std::sync::Arc;

use chrono::{Duration, Utc};

use price_sentry::models::Product;
use price_sentry::monitor::PriceMonitor;
use price_sentry::sources::{FixedSource, SourceRegistry};

use super::*;

const WINDOW: i64 = 364;

fn product_a() -> Product {
    Product::new("B08N5WRWNW", "Example Product A", "https://example.com/product_A")
}

#[tokio::test]
async fn test_first_observation_never_alerts() {
    let store = test_store().await;
    let mut registry = SourceRegistry::new();
    registry.register(
        "example.com",
        Arc::new(FixedSource::with_quote(quote(10_000, true))),
    );
    let notifier = RecordingNotifier::default();

    let monitor = PriceMonitor::new(
        store.clone(),
        registry,
        Box::new(notifier.clone()),
        Duration::days(WINDOW),
    );
    let summary = monitor.run_once(&[product_a()]).await;

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.alerts, 0);
    assert_eq!(store.observation_count("B08N5WRWNW").await.unwrap(), 1);
    assert!(notifier.delivered().is_empty());
}

#[tokio::test]
async fn test_price_drop_fires_alert_with_payload() {
    let store = test_store().await;
    // Prior in-window minimum of 50.00.
    store
        .record_at(
            &observation("B08N5WRWNW", 5_000, true),
            Utc::now() - Duration::days(30),
        )
        .await
        .unwrap();

    let mut registry = SourceRegistry::new();
    registry.register(
        "example.com",
        Arc::new(FixedSource::with_quote(quote(4_500, true))),
    );
    let notifier = RecordingNotifier::default();

    let monitor = PriceMonitor::new(
        store.clone(),
        registry,
        Box::new(notifier.clone()),
        Duration::days(WINDOW),
    );
    let summary = monitor.run_once(&[product_a()]).await;

    assert_eq!(summary.alerts, 1);
    let delivered = notifier.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].contains("45.00"));
    assert!(delivered[0].contains("Example Product A"));
    assert_eq!(store.observation_count("B08N5WRWNW").await.unwrap(), 2);
}

#[tokio::test]
async fn test_unavailable_drop_is_persisted_but_never_alerts() {
    let store = test_store().await;
    store
        .record_at(
            &observation("B08N5WRWNW", 5_000, true),
            Utc::now() - Duration::days(30),
        )
        .await
        .unwrap();

    let mut registry = SourceRegistry::new();
    registry.register(
        "example.com",
        Arc::new(FixedSource::with_quote(quote(4_500, false))),
    );
    let notifier = RecordingNotifier::default();

    let monitor = PriceMonitor::new(
        store.clone(),
        registry,
        Box::new(notifier.clone()),
        Duration::days(WINDOW),
    );
    let summary = monitor.run_once(&[product_a()]).await;

    assert_eq!(summary.alerts, 0);
    assert!(notifier.delivered().is_empty());
    // The unavailable reading still lands in history.
    assert_eq!(store.observation_count("B08N5WRWNW").await.unwrap(), 2);

    // And it must not poison the baseline: the available minimum is still
    // 50.00, not the unavailable 45.00.
    let min = store
        .trailing_minimum("B08N5WRWNW", Duration::days(WINDOW), Utc::now())
        .await
        .unwrap();
    assert_eq!(min, Some(rust_decimal::Decimal::new(5_000, 2)));
}

#[tokio::test]
async fn test_equal_price_does_not_alert() {
    let store = test_store().await;
    store
        .record_at(
            &observation("B08N5WRWNW", 5_000, true),
            Utc::now() - Duration::days(7),
        )
        .await
        .unwrap();

    let mut registry = SourceRegistry::new();
    registry.register(
        "example.com",
        Arc::new(FixedSource::with_quote(quote(5_000, true))),
    );
    let notifier = RecordingNotifier::default();

    let monitor = PriceMonitor::new(
        store.clone(),
        registry,
        Box::new(notifier.clone()),
        Duration::days(WINDOW),
    );
    let summary = monitor.run_once(&[product_a()]).await;

    assert_eq!(summary.alerts, 0);
    assert!(notifier.delivered().is_empty());
}

#[tokio::test]
async fn test_one_failing_product_does_not_block_the_next() {
    let store = test_store().await;
    let mut registry = SourceRegistry::new();
    registry.register("broken-shop.com", Arc::new(FailingSource));
    registry.register(
        "example.com",
        Arc::new(FixedSource::with_quote(quote(10_000, true))),
    );
    let notifier = RecordingNotifier::default();

    let products = vec![
        Product::new("SKU_Q", "Product Q", "https://broken-shop.com/q"),
        Product::new("SKU_R", "Product R", "https://example.com/r"),
    ];

    let monitor = PriceMonitor::new(
        store.clone(),
        registry,
        Box::new(notifier.clone()),
        Duration::days(WINDOW),
    );
    let summary = monitor.run_once(&products).await;

    assert_eq!(summary.checked, 2);
    assert_eq!(summary.failed, 1);
    // Q left no trace; R was fetched, persisted, and evaluated normally.
    assert_eq!(store.observation_count("SKU_Q").await.unwrap(), 0);
    assert_eq!(store.observation_count("SKU_R").await.unwrap(), 1);
}

#[tokio::test]
async fn test_notify_failure_does_not_abort_the_run() {
    let store = test_store().await;
    store
        .record_at(
            &observation("B08N5WRWNW", 5_000, true),
            Utc::now() - Duration::days(30),
        )
        .await
        .unwrap();

    let mut registry = SourceRegistry::new();
    registry.register(
        "example.com",
        Arc::new(FixedSource::with_quote(quote(4_500, true))),
    );

    let second = Product::new("SKU_R", "Product R", "https://example.com/r");
    let monitor = PriceMonitor::new(
        store.clone(),
        registry,
        Box::new(BrokenNotifier),
        Duration::days(WINDOW),
    );
    let summary = monitor.run_once(&[product_a(), second]).await;

    // Delivery failed but the drop was detected, the observation persisted,
    // and the second product still processed.
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.alerts, 1);
    assert_eq!(store.observation_count("B08N5WRWNW").await.unwrap(), 2);
    assert_eq!(store.observation_count("SKU_R").await.unwrap(), 1);
}

#[tokio::test]
async fn test_stale_low_outside_window_is_ignored() {
    let store = test_store().await;
    // An ancient 10.00 low, well outside the 364-day window.
    store
        .record_at(
            &observation("B08N5WRWNW", 1_000, true),
            Utc::now() - Duration::days(500),
        )
        .await
        .unwrap();
    // Recent in-window reading at 60.00.
    store
        .record_at(
            &observation("B08N5WRWNW", 6_000, true),
            Utc::now() - Duration::days(10),
        )
        .await
        .unwrap();

    let mut registry = SourceRegistry::new();
    registry.register(
        "example.com",
        Arc::new(FixedSource::with_quote(quote(5_500, true))),
    );
    let notifier = RecordingNotifier::default();

    let monitor = PriceMonitor::new(
        store.clone(),
        registry,
        Box::new(notifier.clone()),
        Duration::days(WINDOW),
    );
    let summary = monitor.run_once(&[product_a()]).await;

    // 55.00 beats the in-window 60.00 even though it is far above the
    // expired 10.00 low.
    assert_eq!(summary.alerts, 1);
    assert_eq!(notifier.delivered().len(), 1);
}
