//! quotecache-core
//!
//! Contracts and pure policy shared across the quotecache workspace.
//!
//! - `client`: the `MarketDataClient` trait implemented by upstream providers.
//! - `store`: the `QuoteStore` and `FavoritesStore` persistence traits.
//! - `freshness`: the ttl check deciding whether a cached record is served.
//! - `aggregate`: merging raw quote and overview payloads into a `QuoteRecord`.
//! - `middleware`: the trait implemented by client wrappers.
//!
//! Nothing here performs I/O; implementations live in `quotecache-alphavantage`
//! (upstream) and `quotecache-mock` (in-memory fakes).
#![warn(missing_docs)]

/// Merging raw upstream payloads into normalized records.
pub mod aggregate;
/// Upstream market-data client contract.
pub mod client;
/// Injectable wall clock.
pub mod clock;
/// Cache freshness policy.
pub mod freshness;
/// Middleware trait implemented by client wrappers.
pub mod middleware;
/// Provider-neutral raw payloads returned by clients.
pub mod raw;
/// Persistence contracts.
pub mod store;
/// Ticker normalization.
pub mod symbol;

pub use aggregate::{MergeDefaulted, QuoteAggregator};
pub use client::MarketDataClient;
pub use clock::{Clock, SystemClock};
pub use freshness::{DEFAULT_FRESHNESS_TTL, FreshnessPolicy, is_fresh};
pub use middleware::Middleware;
pub use raw::{RawOverview, RawQuote};
pub use store::{FavoritesStore, QuoteStore, StoreError};
pub use symbol::normalize_symbol;

pub use quotecache_types::*;
