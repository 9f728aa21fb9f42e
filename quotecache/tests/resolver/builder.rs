use std::sync::Arc;
use std::time::Duration;

use quotecache::{QuoteCache, QuoteCacheConfig, QuoteCacheError};
use quotecache_mock::{MemoryQuoteStore, MockClient};

use crate::helpers::{AAPL, full_record, harness_with, minutes};

fn invalid(res: Result<QuoteCache, QuoteCacheError>) -> String {
    match res {
        Err(QuoteCacheError::InvalidArg(msg)) => msg,
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("build should fail"),
    }
}

#[test]
fn build_requires_a_client() {
    let msg = invalid(
        QuoteCache::builder()
            .with_store(Arc::new(MemoryQuoteStore::new()))
            .build(),
    );
    assert!(msg.contains("client"));
}

#[test]
fn build_requires_a_store() {
    let msg = invalid(
        QuoteCache::builder()
            .with_client(Arc::new(MockClient::new()))
            .build(),
    );
    assert!(msg.contains("store"));
}

#[test]
fn build_rejects_zero_concurrency_and_zero_durations() {
    let base = || {
        QuoteCache::builder()
            .with_client(Arc::new(MockClient::new()))
            .with_store(Arc::new(MemoryQuoteStore::new()))
    };
    assert!(invalid(base().batch_concurrency(0).build()).contains("batch_concurrency"));
    assert!(invalid(base().freshness_ttl(Duration::ZERO).build()).contains("freshness_ttl"));
    assert!(invalid(base().provider_timeout(Duration::ZERO).build()).contains("provider_timeout"));
}

#[test]
fn defaults_match_config_defaults() {
    let cache = QuoteCache::builder()
        .with_client(Arc::new(MockClient::new()))
        .with_store(Arc::new(MemoryQuoteStore::new()))
        .build()
        .unwrap();
    assert_eq!(cache.config(), &QuoteCacheConfig::default());
    assert_eq!(cache.freshness().ttl(), Duration::from_secs(15 * 60));
    assert_eq!(cache.client_name(), "quotecache-mock");
}

#[test]
fn whole_config_can_be_replaced() {
    let cfg = QuoteCacheConfig {
        freshness_ttl: Duration::from_secs(60),
        provider_timeout: Duration::from_secs(3),
        batch_concurrency: 9,
        popular_symbols: vec!["IBM".into()],
    };
    let cache = QuoteCache::builder()
        .with_client(Arc::new(MockClient::new()))
        .with_store(Arc::new(MemoryQuoteStore::new()))
        .config(cfg.clone())
        .build()
        .unwrap();
    assert_eq!(cache.config(), &cfg);
}

#[tokio::test]
async fn configured_ttl_governs_freshness() {
    let h = harness_with(|b| b.freshness_ttl(Duration::from_secs(60)));
    h.seed_aged(full_record(AAPL, "150.00"), minutes(2)).await;
    h.quote_ok(AAPL, "151.00").await;
    h.overview_ok(AAPL, "Apple Inc").await;

    let rec = h.cache.resolve_one(AAPL).await.unwrap();

    assert_eq!(rec.company_name(), "Apple Inc");
    assert_eq!(h.ctl.calls().await.len(), 2);
}
