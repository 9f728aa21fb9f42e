mod common;
use std::sync::Arc;

use common::{get_client, init_tracing};
use quotecache::{Favorites, QuoteApi, QuoteCache};
use quotecache_mock::{MemoryFavoritesStore, MemoryQuoteStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cache = QuoteCache::builder()
        .with_client(get_client())
        .with_store(Arc::new(MemoryQuoteStore::new()))
        .build()?;
    let api = QuoteApi::new(
        Arc::new(cache),
        Favorites::new(Arc::new(MemoryFavoritesStore::new())),
    );

    let user = Some("user-123");

    let resp = api.get_stock(Some("MSFT")).await;
    println!("GET /stocks/MSFT -> {}\n{:#}", resp.status, resp.body);

    let resp = api.get_stock(Some("FAIL")).await;
    println!("GET /stocks/FAIL -> {} {}", resp.status, resp.body);

    let resp = api
        .add_favorite(user, Some(r#"{"symbol":"msft","companyName":"Microsoft Corporation"}"#))
        .await;
    println!("POST /favorites -> {} {}", resp.status, resp.body);

    let resp = api.list_favorites(user).await;
    println!("GET /favorites -> {} {:#}", resp.status, resp.body);

    let resp = api.remove_favorite(user, Some("MSFT")).await;
    println!("DELETE /favorites/MSFT -> {} {}", resp.status, resp.body);

    let resp = api.list_favorites(None).await;
    println!("GET /favorites (anonymous) -> {} {}", resp.status, resp.body);

    Ok(())
}
