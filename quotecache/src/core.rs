use std::sync::Arc;
use std::time::Duration;

use quotecache_core::{
    Clock, FetchStage, FreshnessPolicy, MarketDataClient, QuoteCacheConfig, QuoteCacheError,
    QuoteStore, SystemClock, UpstreamError,
};

/// Cache-aside resolver for stock quotes.
///
/// Serves records from the [`QuoteStore`] while they are fresh and falls back
/// to the [`MarketDataClient`] otherwise, writing fetched records back.
pub struct QuoteCache {
    pub(crate) client: Arc<dyn MarketDataClient>,
    pub(crate) store: Arc<dyn QuoteStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) freshness: FreshnessPolicy,
    pub(crate) cfg: QuoteCacheConfig,
}

/// Builder for constructing a [`QuoteCache`] with custom configuration.
pub struct QuoteCacheBuilder {
    client: Option<Arc<dyn MarketDataClient>>,
    store: Option<Arc<dyn QuoteStore>>,
    clock: Arc<dyn Clock>,
    cfg: QuoteCacheConfig,
}

impl Default for QuoteCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteCacheBuilder {
    /// Create a new builder with default configuration and the system clock.
    ///
    /// A client and a store must be supplied before [`build`](Self::build).
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: None,
            store: None,
            clock: Arc::new(SystemClock),
            cfg: QuoteCacheConfig::default(),
        }
    }

    /// Upstream provider queried on a miss. Replaces any previous client.
    ///
    /// Wrap the client with `quotecache_middleware::ClientBuilder` first to get
    /// quota enforcement and blacklisting.
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn MarketDataClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Backing store for cached records. Replaces any previous store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn QuoteStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Clock used for freshness checks and for stamping `lastUpdated`.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: QuoteCacheConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Maximum age at which a cached record is served without refetching.
    #[must_use]
    pub const fn freshness_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.freshness_ttl = ttl;
        self
    }

    /// Timeout applied to each individual upstream call.
    ///
    /// A call that exceeds it is reported exactly like any other upstream
    /// failure. It is not retried.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Maximum number of symbols a batch resolves at once.
    #[must_use]
    pub const fn batch_concurrency(mut self, n: usize) -> Self {
        self.cfg.batch_concurrency = n;
        self
    }

    /// Symbols served by [`QuoteCache::popular`], in display order.
    #[must_use]
    pub fn popular_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.popular_symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Build the [`QuoteCache`].
    ///
    /// # Errors
    /// Returns `InvalidArg` if no client or store was supplied, if
    /// `batch_concurrency` is zero, or if `freshness_ttl` or `provider_timeout`
    /// is zero.
    pub fn build(self) -> Result<QuoteCache, QuoteCacheError> {
        let client = self.client.ok_or_else(|| {
            QuoteCacheError::invalid_arg("no client supplied; add one via with_client(...)")
        })?;
        let store = self.store.ok_or_else(|| {
            QuoteCacheError::invalid_arg("no store supplied; add one via with_store(...)")
        })?;
        if self.cfg.batch_concurrency == 0 {
            return Err(QuoteCacheError::invalid_arg(
                "batch_concurrency must be at least 1",
            ));
        }
        if self.cfg.freshness_ttl.is_zero() {
            return Err(QuoteCacheError::invalid_arg("freshness_ttl must be non-zero"));
        }
        if self.cfg.provider_timeout.is_zero() {
            return Err(QuoteCacheError::invalid_arg(
                "provider_timeout must be non-zero",
            ));
        }

        Ok(QuoteCache {
            client,
            store,
            clock: self.clock,
            freshness: FreshnessPolicy::new(self.cfg.freshness_ttl),
            cfg: self.cfg,
        })
    }
}

impl QuoteCache {
    /// Start building a new `QuoteCache`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use quotecache_mock::{MemoryQuoteStore, MockClient};
    ///
    /// let cache = quotecache::QuoteCache::builder()
    ///     .with_client(Arc::new(MockClient::new()))
    ///     .with_store(Arc::new(MemoryQuoteStore::new()))
    ///     .batch_concurrency(8)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> QuoteCacheBuilder {
        QuoteCacheBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &QuoteCacheConfig {
        &self.cfg
    }

    /// Freshness policy derived from the configured ttl.
    #[must_use]
    pub const fn freshness(&self) -> FreshnessPolicy {
        self.freshness
    }

    /// Name of the upstream client, as reported by the client itself.
    #[must_use]
    pub fn client_name(&self) -> &'static str {
        self.client.name()
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    ///
    /// `client_name` and `stage` only label the span.
    #[tracing::instrument(
        name = "quotecache::core::provider_call_with_timeout",
        skip(fut, stage),
        fields(
            client = client_name,
            stage = %stage,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ),
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        client_name: &'static str,
        stage: FetchStage,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, UpstreamError>
    where
        Fut: core::future::Future<Output = Result<T, UpstreamError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(UpstreamError::timeout(timeout)))
    }
}
