use std::sync::Arc;
use std::time::Duration;

use quotecache::{ClientBuilder, MarketDataClient, QuotaConfig, QuotaConsumptionStrategy, QuoteCache};
use quotecache_mock::{MemoryQuoteStore, MockClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt().with_writer(std::io::stderr).try_init();

    // Two calls per minute, then a one-minute cool-down.
    let raw: Arc<dyn MarketDataClient> = Arc::new(MockClient::new());
    let builder = ClientBuilder::new(raw)
        .with_quota(&QuotaConfig {
            limit: 2,
            window: Duration::from_secs(60),
            strategy: QuotaConsumptionStrategy::Unit,
        })
        .with_blacklist(Duration::from_secs(60));
    for (layer, cfg) in builder.describe() {
        println!("layer {layer}: {cfg}");
    }

    let cache = QuoteCache::builder()
        .with_client(builder.build())
        .with_store(Arc::new(MemoryQuoteStore::new()))
        .build()?;

    // Each symbol costs one quote call. Once two calls are spent the rest fail
    // fast without reaching the client.
    for (symbol, res) in cache
        .resolve_many(&["AAPL", "MSFT", "GOOGL", "AMZN"], false)
        .await
    {
        match res {
            Ok(rec) => println!("{symbol}: {}", rec.price),
            Err(e) => println!("{symbol}: {e}"),
        }
    }

    Ok(())
}
