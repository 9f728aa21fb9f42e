//! quotecache serves stock quotes through a read-through cache.
//!
//! Overview
//! - [`QuoteCache`] checks a [`QuoteStore`] first and serves any record younger
//!   than the freshness window (15 minutes unless configured otherwise).
//! - On a miss or a stale record it calls the [`MarketDataClient`], merges the
//!   payloads with [`QuoteAggregator`], writes the record back and returns it.
//! - [`Favorites`] keeps per-user symbol lists; [`api`] maps both onto
//!   HTTP-shaped responses.
//!
//! Key behaviors and trade-offs
//! - Detail lookups (`resolve_one`) need both the quote and the company
//!   overview; either failing fails the lookup with `UpstreamFetchFailed`.
//! - List lookups (`resolve_many`, `popular`) fetch the quote only and cache
//!   partial records. Symbols are resolved concurrently (bounded by
//!   `batch_concurrency`); results keep input order and one failing symbol
//!   never affects another.
//! - Cache reads and writes fail open: a broken store costs latency, not
//!   availability.
//! - Every upstream call is bounded by `provider_timeout`. Nothing is retried.
//! - An unknown symbol and an unreachable provider both surface as
//!   `UpstreamFetchFailed`, which the HTTP mapping renders as 404.
//!
//! Examples
//! Building a cache over the rate-limited Alpha Vantage client:
//! ```rust,ignore
//! use std::sync::Arc;
//! use quotecache::QuoteCache;
//! use quotecache_alphavantage::{AlphaVantageClient, AlphaVantageConfig};
//!
//! let client = AlphaVantageClient::rate_limited(AlphaVantageConfig::from_env())?.build();
//! let cache = QuoteCache::builder()
//!     .with_client(client)
//!     .with_store(store)
//!     .provider_timeout(std::time::Duration::from_secs(5))
//!     .build()?;
//!
//! let aapl = cache.resolve_one("AAPL").await?;
//! for (symbol, res) in cache.resolve_many(&["AAPL", "BAD", "MSFT"], false).await {
//!     println!("{symbol}: {:?}", res.map(|r| r.price));
//! }
//! ```
//!
//! See `quotecache/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

/// HTTP outcome mapping for the stock and favorites endpoints.
pub mod api;
pub(crate) mod core;
mod favorites;
mod resolver;

pub use api::{ApiResponse, QuoteApi};
pub use crate::core::{QuoteCache, QuoteCacheBuilder};
pub use favorites::Favorites;

pub use quotecache_middleware::{
    BlacklistMiddleware, BlacklistingClient, ClientBuilder, QuotaAwareClient, QuotaMiddleware,
};

// Re-export core types for convenience
pub use quotecache_core::{
    Clock, CompanyOverview, Favorite, FavoritesStore, FetchStage, FreshnessPolicy,
    MarketDataClient, MergeDefaulted, QuotaConfig, QuotaConsumptionStrategy, QuotaState,
    QuoteAggregator, QuoteCacheConfig, QuoteCacheError, QuoteRecord, QuoteStore, RawOverview,
    RawQuote, StoreError, SystemClock, UpstreamError, normalize_symbol,
};
