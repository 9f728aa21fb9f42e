mod common;
use std::sync::Arc;

use common::{get_client, init_tracing};
use quotecache::QuoteCache;
use quotecache_mock::MemoryQuoteStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cache = QuoteCache::builder()
        .with_client(get_client())
        .with_store(Arc::new(MemoryQuoteStore::new()))
        .batch_concurrency(3)
        .build()?;

    // A batch keeps input order; FAIL only fails its own slot.
    let symbols = ["AAPL", "FAIL", "MSFT", "  tsla "];
    for (symbol, res) in cache.resolve_many(&symbols, false).await {
        match res {
            Ok(rec) => println!("{symbol:>6}  {:>10}  {:>8}  {}", rec.price, rec.change, rec.change_percent),
            Err(e) => println!("{symbol:>6}  error: {e}"),
        }
    }

    println!("--- popular ---");
    for rec in cache.popular().await {
        println!("{:>6}  {:>10}", rec.symbol, rec.price);
    }

    Ok(())
}
