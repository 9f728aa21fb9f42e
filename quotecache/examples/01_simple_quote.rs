mod common;
use std::sync::Arc;

use common::{get_client, init_tracing};
use quotecache::QuoteCache;
use quotecache_mock::MemoryQuoteStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // 1. Create the upstream client (mock in CI when QUOTECACHE_EXAMPLES_USE_MOCK is set).
    let client = get_client();

    // 2. Build the cache over an in-memory store.
    let cache = QuoteCache::builder()
        .with_client(client)
        .with_store(Arc::new(MemoryQuoteStore::new()))
        .build()?;

    // 3. The first lookup misses and fetches quote + overview.
    println!("Fetching AAPL...");
    let first = cache.resolve_one("aapl").await?;
    println!("{first:#?}");

    // 4. The second lookup is served from the cache.
    let second = cache.resolve_one("AAPL").await?;
    assert_eq!(first, second);
    println!("second lookup served from cache (lastUpdated {})", second.last_updated);

    Ok(())
}
