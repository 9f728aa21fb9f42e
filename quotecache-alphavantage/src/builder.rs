use std::sync::Arc;
use std::time::Duration;

use quotecache_core::{MarketDataClient, UpstreamError};
use quotecache_middleware::ClientBuilder;
use quotecache_types::QuotaConfig;

use crate::{AlphaVantageClient, AlphaVantageConfig};

/// Builder type alias specialized for Alpha Vantage clients.
pub type AlphaVantageClientBuilder = ClientBuilder;

impl AlphaVantageClient {
    /// Returns a builder around an unwrapped client, with no layers configured.
    ///
    /// # Errors
    /// See [`AlphaVantageClient::new`].
    pub fn builder(
        config: AlphaVantageConfig,
    ) -> Result<AlphaVantageClientBuilder, UpstreamError> {
        let raw: Arc<dyn MarketDataClient> = Arc::new(Self::new(config)?);
        Ok(ClientBuilder::new(raw))
    }

    /// Returns a builder sized for the free tier: five calls per minute, with a
    /// one-minute blacklist once Alpha Vantage starts refusing calls.
    ///
    /// # Errors
    /// See [`AlphaVantageClient::new`].
    pub fn rate_limited(
        config: AlphaVantageConfig,
    ) -> Result<AlphaVantageClientBuilder, UpstreamError> {
        Ok(Self::builder(config)?
            .with_quota(&QuotaConfig::default())
            .with_blacklist(Duration::from_secs(60)))
    }
}
