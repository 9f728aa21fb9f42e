use quotecache::{FetchStage, UpstreamError};
use quotecache_mock::MockBehavior;

use crate::helpers::{AAPL, BAD, MSFT, harness_with};

#[tokio::test]
async fn popular_keeps_configured_order_and_drops_failures() {
    let h = harness_with(|b| b.popular_symbols([MSFT, BAD, AAPL]));
    h.quote_ok(AAPL, "182.63").await;
    h.quote_ok(MSFT, "420.55").await;
    h.ctl
        .set_quote_behavior(BAD, MockBehavior::Fail(UpstreamError::Malformed("empty".into())))
        .await;

    let list = h.cache.popular().await;

    let symbols: Vec<&str> = list.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec![MSFT, AAPL]);
    assert!(list.iter().all(quotecache::QuoteRecord::is_partial));
    assert_eq!(h.ctl.call_count(FetchStage::Overview).await, 0);
}

#[tokio::test]
async fn popular_defaults_to_the_five_large_caps() {
    let h = harness_with(|b| b);
    assert_eq!(
        h.cache.config().popular_symbols,
        vec!["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"]
    );
}

#[tokio::test]
async fn popular_with_every_symbol_failing_is_empty() {
    let h = harness_with(|b| b.popular_symbols(["X", "Y"]));
    assert!(h.cache.popular().await.is_empty());
}
