#![doc = include_str!("../README.md")]

use std::time::Duration;

use async_trait::async_trait;
use quotecache_core::{FetchStage, MarketDataClient, RawOverview, RawQuote, UpstreamError};

mod clock;
mod dynamic;
mod fixtures;
mod store;

pub use clock::ManualClock;
pub use dynamic::{DynamicMockClient, DynamicMockController, MockBehavior, MockCall};
pub use store::{MemoryFavoritesStore, MemoryQuoteStore, StoreOp};

/// How long the `TIMEOUT` symbol stalls before answering.
pub const TIMEOUT_STALL: Duration = Duration::from_secs(30);

/// Mock client for CI-safe examples. Provides deterministic data from static fixtures.
pub struct MockClient;

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn not_found(stage: FetchStage, symbol: &str) -> UpstreamError {
        UpstreamError::Malformed(format!("no {stage} data for {symbol}"))
    }

    async fn maybe_fail_or_timeout(symbol: &str, stage: FetchStage) -> Result<(), UpstreamError> {
        match symbol {
            "FAIL" => Err(UpstreamError::Provider(format!("forced failure: {stage}"))),
            "RATELIMIT" => Err(UpstreamError::RateLimited(
                "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
                    .to_string(),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(TIMEOUT_STALL).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl MarketDataClient for MockClient {
    fn name(&self) -> &'static str {
        "quotecache-mock"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError> {
        Self::maybe_fail_or_timeout(symbol, FetchStage::Quote).await?;
        fixtures::quotes::by_symbol(symbol).ok_or_else(|| Self::not_found(FetchStage::Quote, symbol))
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<RawOverview, UpstreamError> {
        Self::maybe_fail_or_timeout(symbol, FetchStage::Overview).await?;
        fixtures::overviews::by_symbol(symbol)
            .ok_or_else(|| Self::not_found(FetchStage::Overview, symbol))
    }
}
