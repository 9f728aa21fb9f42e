use std::time::Duration;

use quotecache::{FetchStage, QuoteCacheError, UpstreamError};
use quotecache_mock::MockBehavior;

use crate::helpers::{AAPL, MSFT, TSLA, harness, harness_with};

#[tokio::test(start_paused = true)]
async fn output_follows_input_order_not_completion_order() {
    let h = harness();
    h.quote_after(AAPL, "1.00", Duration::from_millis(300)).await;
    h.quote_after(MSFT, "2.00", Duration::from_millis(200)).await;
    h.quote_after(TSLA, "3.00", Duration::from_millis(100)).await;

    let out = h.cache.resolve_many(&[AAPL, MSFT, TSLA], false).await;

    let labels: Vec<&str> = out.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(labels, vec![AAPL, MSFT, TSLA]);
    let prices: Vec<String> = out
        .iter()
        .map(|(_, r)| r.as_ref().unwrap().price.normalize().to_string())
        .collect();
    assert_eq!(prices, vec!["1", "2", "3"]);
}

#[tokio::test(start_paused = true)]
async fn batch_runs_symbols_concurrently() {
    let h = harness();
    let symbols = [AAPL, MSFT, TSLA];
    for s in symbols {
        h.quote_after(s, "10.00", Duration::from_secs(1)).await;
    }

    let started = tokio::time::Instant::now();
    let out = h.cache.resolve_many(&symbols, false).await;

    assert!(out.iter().all(|(_, r)| r.is_ok()));
    // one round-trip, not three
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(h.ctl.peak_in_flight(), 3);
}

#[tokio::test(start_paused = true)]
async fn in_flight_symbols_are_bounded_by_batch_concurrency() {
    let h = harness_with(|b| b.batch_concurrency(2));
    let symbols: Vec<String> = (0..6).map(|i| format!("SYM{i}")).collect();
    for s in &symbols {
        h.quote_after(s, "10.00", Duration::from_millis(100)).await;
    }

    let out = h.cache.resolve_many(&symbols, false).await;

    assert_eq!(out.len(), 6);
    assert!(out.iter().all(|(_, r)| r.is_ok()));
    assert_eq!(h.ctl.peak_in_flight(), 2);
}

#[tokio::test(start_paused = true)]
async fn hanging_symbol_times_out_without_holding_back_others() {
    let h = harness_with(|b| b.provider_timeout(Duration::from_secs(1)));
    h.quote_ok(AAPL, "182.63").await;
    h.ctl.set_quote_behavior(MSFT, MockBehavior::Hang).await;
    h.quote_ok(TSLA, "171.05").await;

    let out = h.cache.resolve_many(&[AAPL, MSFT, TSLA], false).await;

    assert!(out[0].1.is_ok());
    assert_eq!(
        out[1].1,
        Err(QuoteCacheError::upstream(
            MSFT,
            FetchStage::Quote,
            UpstreamError::Timeout { timeout_ms: 1000 }
        ))
    );
    assert!(out[2].1.is_ok());
}
