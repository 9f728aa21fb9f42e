use std::time::Duration;

use quotecache::{FetchStage, QuoteCacheError, UpstreamError};
use quotecache_mock::MockBehavior;

use crate::helpers::{AAPL, BAD, full_record, harness, harness_with, minutes};

#[tokio::test]
async fn quote_failure_skips_overview_and_write_back() {
    let h = harness();
    h.ctl
        .set_quote_behavior(
            BAD,
            MockBehavior::Fail(UpstreamError::Provider("Invalid API call".into())),
        )
        .await;

    let err = h.cache.resolve_one(BAD).await.unwrap_err();

    match &err {
        QuoteCacheError::UpstreamFetchFailed {
            symbol,
            stage,
            source,
        } => {
            assert_eq!(symbol, BAD);
            assert_eq!(*stage, FetchStage::Quote);
            assert!(matches!(source, UpstreamError::Provider(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_not_found());
    assert_eq!(h.ctl.call_count(FetchStage::Overview).await, 0);
    assert_eq!(h.store.put_count().await, 0);
}

#[tokio::test]
async fn overview_failure_fails_the_detail_lookup() {
    let h = harness();
    h.quote_ok(AAPL, "182.63").await;
    h.ctl
        .set_overview_behavior(
            AAPL,
            MockBehavior::Fail(UpstreamError::Transport("connection reset".into())),
        )
        .await;

    let err = h.cache.resolve_one(AAPL).await.unwrap_err();

    assert_eq!(err.stage(), Some(FetchStage::Overview));
    assert_eq!(h.store.put_count().await, 0);
    assert!(h.store.raw(AAPL).await.is_none());
}

#[tokio::test]
async fn stale_record_is_not_served_when_upstream_fails() {
    let h = harness();
    h.seed_aged(full_record(AAPL, "150.00"), minutes(30)).await;
    h.ctl
        .set_quote_behavior(AAPL, MockBehavior::Fail(UpstreamError::RateLimited("5/min".into())))
        .await;

    let err = h.cache.resolve_one(AAPL).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.http_status(), 404);
}

#[tokio::test(start_paused = true)]
async fn hanging_quote_times_out_as_upstream_failure() {
    let h = harness_with(|b| b.provider_timeout(Duration::from_secs(2)));
    h.ctl.set_quote_behavior(AAPL, MockBehavior::Hang).await;

    let err = h.cache.resolve_one(AAPL).await.unwrap_err();

    assert_eq!(
        err,
        QuoteCacheError::upstream(AAPL, FetchStage::Quote, UpstreamError::Timeout { timeout_ms: 2000 })
    );
    assert_eq!(h.ctl.call_count(FetchStage::Overview).await, 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_applies_to_each_call_separately() {
    let h = harness_with(|b| b.provider_timeout(Duration::from_secs(2)));
    // each call stays under budget even though together they exceed it
    h.quote_after(AAPL, "182.63", Duration::from_millis(1500)).await;
    h.ctl
        .set_overview_behavior(
            AAPL,
            MockBehavior::ReturnAfter(
                Duration::from_millis(1500),
                crate::helpers::raw_overview("Apple Inc", "29.4"),
            ),
        )
        .await;

    let rec = h.cache.resolve_one(AAPL).await.unwrap();
    assert_eq!(rec.company_name(), "Apple Inc");
}

#[tokio::test(start_paused = true)]
async fn hanging_overview_times_out_with_overview_stage() {
    let h = harness_with(|b| b.provider_timeout(Duration::from_millis(500)));
    h.quote_ok(AAPL, "182.63").await;
    h.ctl.set_overview_behavior(AAPL, MockBehavior::Hang).await;

    let err = h.cache.resolve_one(AAPL).await.unwrap_err();

    assert_eq!(err.stage(), Some(FetchStage::Overview));
    assert!(matches!(
        err,
        QuoteCacheError::UpstreamFetchFailed {
            source: UpstreamError::Timeout { timeout_ms: 500 },
            ..
        }
    ));
}

#[tokio::test]
async fn non_numeric_upstream_fields_degrade_instead_of_failing() {
    let h = harness();
    h.ctl
        .set_quote_behavior(
            AAPL,
            MockBehavior::Return(quotecache::RawQuote {
                price: Some("N/A".into()),
                change: None,
                change_percent: None,
            }),
        )
        .await;
    h.ctl
        .set_overview_behavior(
            AAPL,
            MockBehavior::Return(quotecache::RawOverview {
                name: Some("Apple Inc".into()),
                pe_ratio: Some("None".into()),
                ..Default::default()
            }),
        )
        .await;

    let rec = h.cache.resolve_one(AAPL).await.unwrap();

    assert!(rec.price.is_zero());
    assert!(rec.change.is_zero());
    assert_eq!(rec.change_percent, "0%");
    assert!(rec.pe_ratio().is_zero());
    assert_eq!(rec.market_cap(), "0");
    assert_eq!(rec.industry(), "");
}
