//! quotecache-alphavantage
//!
//! `MarketDataClient` implementation on top of the Alpha Vantage HTTP API.
//! One `GLOBAL_QUOTE` request backs `fetch_quote`, one `OVERVIEW` request
//! backs `fetch_overview`. Neither retries.
#![warn(missing_docs)]

mod builder;
mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use quotecache_core::{MarketDataClient, RawOverview, RawQuote, UpstreamError};
use wire::{GlobalQuoteResponse, OverviewResponse};

pub use builder::AlphaVantageClientBuilder;

/// Public production endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
/// Key accepted by Alpha Vantage for a handful of demo symbols.
pub const DEMO_API_KEY: &str = "demo";
/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";
/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "ALPHA_VANTAGE_BASE_URL";

/// Connection settings for [`AlphaVantageClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaVantageConfig {
    /// API key sent as the `apikey` query parameter.
    pub api_key: String,
    /// Scheme and host, without the `/query` path.
    pub base_url: String,
    /// Timeout applied by the HTTP client to each request.
    pub http_timeout: Duration,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl AlphaVantageConfig {
    /// Defaults overridden by `ALPHA_VANTAGE_API_KEY` and `ALPHA_VANTAGE_BASE_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.trim().is_empty()
        {
            cfg.api_key = key;
        }
        if let Ok(base) = std::env::var(BASE_URL_ENV)
            && !base.trim().is_empty()
        {
            cfg.base_url = base;
        }
        cfg
    }
}

/// Alpha Vantage client.
pub struct AlphaVantageClient {
    http: Client,
    endpoint: Url,
    config: AlphaVantageConfig,
}

impl AlphaVantageClient {
    /// Stable client name used in logs.
    pub const NAME: &'static str = "alphavantage";

    /// Build a client from explicit settings.
    ///
    /// # Errors
    /// Returns `UpstreamError::Transport` if `base_url` is not a valid URL or the
    /// HTTP client cannot be constructed.
    pub fn new(config: AlphaVantageConfig) -> Result<Self, UpstreamError> {
        let endpoint = Url::parse(&config.base_url)
            .and_then(|base| base.join("query"))
            .map_err(|e| UpstreamError::Transport(format!("invalid base url: {e}")))?;
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    /// Build a client from [`AlphaVantageConfig::from_env`].
    ///
    /// # Errors
    /// See [`AlphaVantageClient::new`].
    pub fn from_env() -> Result<Self, UpstreamError> {
        Self::new(AlphaVantageConfig::from_env())
    }

    /// Settings this client was built with.
    #[must_use]
    pub const fn config(&self) -> &AlphaVantageConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        function: &str,
        symbol: &str,
    ) -> Result<T, UpstreamError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("function", function)
            .append_pair("symbol", symbol)
            .append_pair("apikey", &self.config.api_key);

        tracing::debug!(url = %masked(&url), "alpha vantage request");

        let resp = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::timeout(self.config.http_timeout)
            } else {
                UpstreamError::Transport(e.without_url().to_string())
            }
        })?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(UpstreamError::Transport(format!(
                "{function} for {symbol} returned HTTP {status}"
            )));
        }

        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::timeout(self.config.http_timeout)
            } else {
                UpstreamError::Transport(e.without_url().to_string())
            }
        })?;
        serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::Malformed(format!("{function} body for {symbol}: {e}")))
    }
}

/// `url` with the `apikey` query value replaced by `***`.
fn masked(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    let mut out = url.clone();
    out.query_pairs_mut().clear().extend_pairs(pairs);
    out.into()
}

#[async_trait]
impl MarketDataClient for AlphaVantageClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[tracing::instrument(name = "alphavantage.global_quote", skip(self))]
    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError> {
        self.get_json::<GlobalQuoteResponse>("GLOBAL_QUOTE", symbol)
            .await?
            .into_raw(symbol)
    }

    #[tracing::instrument(name = "alphavantage.overview", skip(self))]
    async fn fetch_overview(&self, symbol: &str) -> Result<RawOverview, UpstreamError> {
        self.get_json::<OverviewResponse>("OVERVIEW", symbol)
            .await?
            .into_raw(symbol)
    }
}
