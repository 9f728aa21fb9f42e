use async_trait::async_trait;

use crate::raw::{RawOverview, RawQuote};
use quotecache_types::UpstreamError;

/// Contract for an upstream market-data provider.
///
/// The two calls are independent: a resolver may issue one without the other,
/// and either may fail on its own. Implementations do not retry; the first
/// failure is reported as-is.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Stable identifier used in logs (e.g. `"alphavantage"`).
    fn name(&self) -> &'static str;

    /// Fetch the latest price quote for an upper-case `symbol`.
    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError>;

    /// Fetch the company overview for an upper-case `symbol`.
    async fn fetch_overview(&self, symbol: &str) -> Result<RawOverview, UpstreamError>;
}
