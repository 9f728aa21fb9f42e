use quotecache::{FetchStage, QuoteCacheError, UpstreamError};
use quotecache_mock::{MockBehavior, StoreOp};
use rust_decimal::Decimal;

use crate::helpers::{AAPL, BAD, MSFT, full_record, harness, minutes};

#[tokio::test]
async fn failing_symbol_only_fails_its_own_slot() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.quote_ok(MSFT, "420.55").await;
    h.ctl
        .set_quote_behavior(
            BAD,
            MockBehavior::Fail(UpstreamError::Provider("Invalid API call".into())),
        )
        .await;

    let out = h.cache.resolve_many(&[AAPL, BAD, MSFT], false).await;

    assert_eq!(out.len(), 3);
    assert_eq!(out[0].0, AAPL);
    assert_eq!(out[1].0, BAD);
    assert_eq!(out[2].0, MSFT);
    assert_eq!(
        out[0].1.as_ref().unwrap().price,
        "182.63".parse::<Decimal>().unwrap()
    );
    assert!(matches!(
        &out[1].1,
        Err(QuoteCacheError::UpstreamFetchFailed {
            stage: FetchStage::Quote,
            ..
        })
    ));
    assert_eq!(
        out[2].1.as_ref().unwrap().price,
        "420.55".parse::<Decimal>().unwrap()
    );

    let calls = h.ctl.calls().await;
    assert!(calls.iter().any(|c| c.symbol == AAPL));
    assert!(calls.iter().any(|c| c.symbol == MSFT));
    assert_eq!(h.store.put_count().await, 2);
}

#[tokio::test]
async fn batch_never_fetches_overview_and_caches_partial_records() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.overview_ok(AAPL, "Apple Inc").await;

    let out = h.cache.resolve_many(&[AAPL], false).await;
    let rec = out[0].1.as_ref().unwrap();

    assert!(rec.is_partial());
    assert_eq!(rec.company_name(), "");
    assert!(rec.pe_ratio().is_zero());
    assert_eq!(rec.market_cap(), "0");
    assert_eq!(h.ctl.call_count(FetchStage::Overview).await, 0);

    let stored = h.store.raw(AAPL).await.expect("written back");
    assert!(stored.get("companyName").is_none());
}

#[tokio::test]
async fn fresh_cached_slots_skip_upstream() {
    let h = harness();
    let cached = h.seed_aged(full_record(MSFT, "400.00"), minutes(3)).await;
    h.quote_ok(AAPL, "182.63").await;

    let out = h.cache.resolve_many(&[AAPL, MSFT], false).await;

    assert_eq!(out[1].1.as_ref().unwrap(), &cached);
    assert!(!out[1].1.as_ref().unwrap().is_partial());
    assert_eq!(h.ctl.calls().await.len(), 1);
    assert_eq!(h.ctl.calls().await[0].symbol, AAPL);
}

#[tokio::test]
async fn stale_full_record_is_replaced_by_partial_in_batch() {
    let h = harness();
    h.seed_aged(full_record(AAPL, "150.00"), minutes(20)).await;
    h.quote_ok(AAPL, "182.63").await;

    let out = h.cache.resolve_many(&[AAPL], false).await;

    assert!(out[0].1.as_ref().unwrap().is_partial());
    assert!(h.store.raw(AAPL).await.unwrap().get("companyName").is_none());
}

#[tokio::test]
async fn store_failures_do_not_fail_batch_slots() {
    let h = harness();
    h.store.set_fail_reads(true);
    h.store.set_fail_writes(true);
    h.quote_ok(AAPL, "182.63").await;
    h.quote_ok(MSFT, "420.55").await;

    let out = h.cache.resolve_many(&[AAPL, MSFT], false).await;

    assert!(out.iter().all(|(_, r)| r.is_ok()));
    assert_eq!(h.store.put_count().await, 2);
}

#[tokio::test]
async fn blank_slot_keeps_raw_label_and_fails_alone() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.quote_ok(MSFT, "420.55").await;

    let out = h.cache.resolve_many(&["aapl", "  ", MSFT], false).await;

    assert_eq!(out[0].0, AAPL);
    assert_eq!(out[1].0, "  ");
    assert!(matches!(out[1].1, Err(QuoteCacheError::InvalidArg(_))));
    assert!(out[0].1.is_ok());
    assert!(out[2].1.is_ok());
    assert!(!h.store.ops().await.contains(&StoreOp::Get("  ".to_string())));
}

#[tokio::test]
async fn empty_batch_does_no_work() {
    let h = harness();
    let empty: [&str; 0] = [];

    let out = h.cache.resolve_many(&empty, true).await;

    assert!(out.is_empty());
    assert!(h.store.ops().await.is_empty());
}

#[tokio::test]
async fn dedupe_collapses_to_first_occurrence() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.quote_ok(MSFT, "420.55").await;

    let out = h
        .cache
        .resolve_many(&["aapl", AAPL, " msft", "AAPL "], true)
        .await;

    let labels: Vec<&str> = out.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(labels, vec![AAPL, MSFT]);
    assert_eq!(h.ctl.call_count(FetchStage::Quote).await, 2);
}

#[tokio::test]
async fn without_dedupe_every_slot_is_answered() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;

    let out = h.cache.resolve_many(&[AAPL, "aapl", AAPL], false).await;

    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|(s, r)| s == AAPL && r.is_ok()));
}
