use quotecache::FetchStage;
use quotecache_mock::{MockBehavior, MockCall, StoreOp};
use rust_decimal::Decimal;

use crate::helpers::{
    AAPL, full_record, harness, minutes, partial_record, raw_overview, raw_quote,
};

#[tokio::test]
async fn fresh_hit_makes_no_upstream_calls() {
    let h = harness();
    let seeded = h.seed_aged(full_record(AAPL, "150.00"), minutes(5)).await;

    let got = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(got, seeded);
    assert!(h.ctl.calls().await.is_empty());
    assert_eq!(h.store.put_count().await, 0);
}

#[tokio::test]
async fn miss_fetches_quote_then_overview_then_writes_back() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.overview_ok(AAPL, "Apple Inc").await;

    let rec = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(
        h.ctl.calls().await,
        vec![
            MockCall {
                stage: FetchStage::Quote,
                symbol: AAPL.to_string()
            },
            MockCall {
                stage: FetchStage::Overview,
                symbol: AAPL.to_string()
            },
        ]
    );
    assert_eq!(
        h.store.ops().await,
        vec![StoreOp::Get(AAPL.to_string()), StoreOp::Put(AAPL.to_string())]
    );
    assert!(!rec.is_partial());
    assert_eq!(rec.company_name(), "Apple Inc");
    assert_eq!(rec.price, "182.63".parse::<Decimal>().unwrap());
    assert_eq!(rec.last_updated, crate::helpers::t0());

    // the written document is the merged record
    let stored = h.store.raw(AAPL).await.expect("record written");
    assert_eq!(stored, serde_json::to_value(&rec).unwrap());
}

#[tokio::test]
async fn record_exactly_ttl_old_is_refetched() {
    let h = harness();
    h.seed_aged(full_record(AAPL, "150.00"), minutes(15)).await;
    h.quote_ok(AAPL, "151.00").await;
    h.overview_ok(AAPL, "Apple Inc").await;

    let rec = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(rec.price, "151.00".parse::<Decimal>().unwrap());
    assert_eq!(h.ctl.calls().await.len(), 2);
    assert_eq!(h.store.put_count().await, 1);
}

#[tokio::test]
async fn record_just_inside_ttl_is_served() {
    let h = harness();
    let seeded = h
        .seed_aged(
            full_record(AAPL, "150.00"),
            minutes(15) - chrono::TimeDelta::milliseconds(1),
        )
        .await;

    assert_eq!(h.cache.resolve_one(AAPL).await.unwrap(), seeded);
    assert!(h.ctl.calls().await.is_empty());
}

#[tokio::test]
async fn record_stamped_in_the_future_counts_as_fresh() {
    // writers with a skewed clock can stamp records ahead of ours
    let h = harness();
    let seeded = h.seed_aged(full_record(AAPL, "150.00"), minutes(-3)).await;

    assert_eq!(h.cache.resolve_one(AAPL).await.unwrap(), seeded);
    assert!(h.ctl.calls().await.is_empty());
}

#[tokio::test]
async fn second_lookup_within_ttl_is_identical_and_free() {
    let h = harness();
    h.ctl
        .set_quote_behavior(
            AAPL,
            MockBehavior::Return(raw_quote("12345678.123456789", "2.1500", "0.5398%")),
        )
        .await;
    h.ctl
        .set_overview_behavior(AAPL, MockBehavior::Return(raw_overview("Apple Inc", "29.4500")))
        .await;

    let first = h.cache.resolve_one(AAPL).await.unwrap();
    h.clock.advance(std::time::Duration::from_secs(60));
    let second = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.price.to_string(), "12345678.123456789");
    assert_eq!(first.price.to_string(), second.price.to_string());
    assert_eq!(second.change.to_string(), "2.1500");
    assert_eq!(second.pe_ratio().to_string(), "29.4500");
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    assert_eq!(h.ctl.calls().await.len(), 2);
    assert_eq!(h.store.put_count().await, 1);
}

#[tokio::test]
async fn clock_advance_past_ttl_triggers_refresh() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.overview_ok(AAPL, "Apple Inc").await;

    h.cache.resolve_one(AAPL).await.unwrap();
    h.clock.advance(std::time::Duration::from_secs(16 * 60));
    let again = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(h.ctl.call_count(FetchStage::Quote).await, 2);
    assert_eq!(h.ctl.call_count(FetchStage::Overview).await, 2);
    assert_eq!(again.last_updated, crate::helpers::t0() + minutes(16));
}

#[tokio::test]
async fn write_failure_still_returns_fetched_record() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.overview_ok(AAPL, "Apple Inc").await;
    h.store.set_fail_writes(true);

    let rec = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(rec.company_name(), "Apple Inc");
    assert_eq!(h.store.put_count().await, 1);
    assert!(h.store.raw(AAPL).await.is_none());
}

#[tokio::test]
async fn read_failure_fails_open_to_upstream() {
    let h = harness();
    h.seed_aged(full_record(AAPL, "150.00"), minutes(1)).await;
    h.store.set_fail_reads(true);
    h.quote_ok(AAPL, "182.63").await;
    h.overview_ok(AAPL, "Apple Inc").await;

    let rec = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(rec.price, "182.63".parse::<Decimal>().unwrap());
    assert_eq!(h.ctl.calls().await.len(), 2);
    assert_eq!(h.store.put_count().await, 1);
}

#[tokio::test]
async fn undecodable_cached_document_is_treated_as_a_miss() {
    let h = harness();
    h.store
        .seed_raw(AAPL, serde_json::json!({ "symbol": "AAPL", "price": "oops" }))
        .await;
    h.quote_ok(AAPL, "182.63").await;
    h.overview_ok(AAPL, "Apple Inc").await;

    let rec = h.cache.resolve_one(AAPL).await.unwrap();

    assert!(!rec.is_partial());
    assert_eq!(h.ctl.calls().await.len(), 2);
}

#[tokio::test]
async fn fresh_partial_record_is_served_as_cached() {
    let h = harness();
    let seeded = h.seed_aged(partial_record(AAPL, "150.00"), minutes(2)).await;

    let got = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(got, seeded);
    assert!(got.is_partial());
    assert!(h.ctl.calls().await.is_empty());
}

#[tokio::test]
async fn lookup_symbol_is_trimmed_and_uppercased() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.overview_ok(AAPL, "Apple Inc").await;

    let rec = h.cache.resolve_one("  aapl ").await.unwrap();

    assert_eq!(rec.symbol, AAPL);
    assert_eq!(h.store.ops().await[0], StoreOp::Get(AAPL.to_string()));
}

#[tokio::test]
async fn blank_symbol_is_rejected_before_any_io() {
    let h = harness();

    let err = h.cache.resolve_one("   ").await.unwrap_err();

    assert!(matches!(err, quotecache::QuoteCacheError::InvalidArg(_)));
    assert!(h.store.ops().await.is_empty());
    assert!(h.ctl.calls().await.is_empty());
}
