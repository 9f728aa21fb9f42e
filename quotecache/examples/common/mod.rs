use quotecache::MarketDataClient;
use std::sync::Arc;

#[must_use]
pub fn get_client() -> Arc<dyn MarketDataClient> {
    if std::env::var("QUOTECACHE_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Client for CI) ---");
        Arc::new(quotecache_mock::MockClient::new())
    } else {
        // Free-tier budget: five calls per minute, one-minute cool-down when refused
        match quotecache_alphavantage::AlphaVantageClient::rate_limited(
            quotecache_alphavantage::AlphaVantageConfig::from_env(),
        ) {
            Ok(builder) => builder.build(),
            Err(e) => {
                eprintln!("alpha vantage client unavailable ({e}); falling back to mock");
                Arc::new(quotecache_mock::MockClient::new())
            }
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
