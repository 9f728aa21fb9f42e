//! Configuration types shared across the resolver and client middleware.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Symbols served by the list view when the caller names none.
const POPULAR_SYMBOLS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];

/// Configuration for the `QuoteCache` resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCacheConfig {
    /// Maximum age at which a cached record is served without refetching.
    pub freshness_ttl: Duration,
    /// Timeout applied to every individual upstream call.
    pub provider_timeout: Duration,
    /// Maximum number of symbols resolved concurrently by a batch.
    pub batch_concurrency: usize,
    /// Symbols resolved by the popular-list view.
    pub popular_symbols: Vec<String>,
}

impl Default for QuoteCacheConfig {
    fn default() -> Self {
        Self {
            freshness_ttl: Duration::from_secs(15 * 60),
            provider_timeout: Duration::from_secs(10),
            batch_concurrency: 5,
            popular_symbols: POPULAR_SYMBOLS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Strategy for consuming units from a quota when handling requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum QuotaConsumptionStrategy {
    /// Each request deducts exactly one unit from the window budget.
    #[default]
    Unit,
    /// Spread the window budget evenly over 24 slices so a burst cannot
    /// drain a daily allowance in its first minutes.
    EvenSpreadHourly,
}

/// Configuration for a fixed-window call budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Maximum number of calls within a single window.
    pub limit: u64,
    /// Duration of the accounting window.
    pub window: Duration,
    /// How calls consume the budget.
    pub strategy: QuotaConsumptionStrategy,
}

impl Default for QuotaConfig {
    /// Alpha Vantage's free tier: five calls per minute.
    fn default() -> Self {
        Self {
            limit: 5,
            window: Duration::from_secs(60),
            strategy: QuotaConsumptionStrategy::Unit,
        }
    }
}

/// Snapshot of a quota budget at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuotaState {
    /// Configured maximum calls per window.
    pub limit: u64,
    /// Remaining calls in the current window.
    pub remaining: u64,
    /// Time until the current window resets.
    pub reset_in: Duration,
}
