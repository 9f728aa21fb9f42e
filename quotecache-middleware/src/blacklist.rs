use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use quotecache_core::{MarketDataClient, Middleware, RawOverview, RawQuote};
use quotecache_types::UpstreamError;

/// Client wrapper that stops calling upstream for a while after rate limiting.
///
/// A `RateLimited` error from the provider, or a `QuotaExceeded` error from an
/// inner quota layer, starts a cool-down. While it lasts every call fails
/// immediately with `TemporarilyBlacklisted`.
pub struct BlacklistingClient {
    inner: Arc<dyn MarketDataClient>,
    until: Mutex<Option<Instant>>,
    default_duration: Duration,
}

impl BlacklistingClient {
    /// Wrap `inner`; `default_duration` is used when the error carries no reset hint.
    pub fn new(inner: Arc<dyn MarketDataClient>, default_duration: Duration) -> Self {
        Self {
            inner,
            until: Mutex::new(None),
            default_duration,
        }
    }

    /// Remaining cool-down, if the client is currently blacklisted.
    #[must_use]
    pub fn blacklisted_for(&self) -> Option<Duration> {
        let mut guard = self.until.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        match *guard {
            Some(until) if now < until => Some(until - now),
            Some(_) => {
                *guard = None;
                None
            }
            None => None,
        }
    }

    fn check(&self) -> Result<(), UpstreamError> {
        match self.blacklisted_for() {
            Some(left) => Err(UpstreamError::TemporarilyBlacklisted {
                reset_in_ms: u64::try_from(left.as_millis()).unwrap_or(u64::MAX).max(1),
            }),
            None => Ok(()),
        }
    }

    fn observe(&self, err: UpstreamError) -> UpstreamError {
        let cool_down = match err {
            UpstreamError::QuotaExceeded { reset_in_ms, .. } if reset_in_ms > 0 => {
                Duration::from_millis(reset_in_ms)
            }
            UpstreamError::QuotaExceeded { .. } | UpstreamError::RateLimited(_) => {
                self.default_duration
            }
            _ => return err,
        };
        tracing::warn!(
            client = self.inner.name(),
            cool_down_ms = u64::try_from(cool_down.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "blacklisting upstream client"
        );
        *self.until.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Instant::now() + cool_down);
        err
    }
}

#[async_trait]
impl MarketDataClient for BlacklistingClient {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError> {
        self.check()?;
        self.inner
            .fetch_quote(symbol)
            .await
            .map_err(|e| self.observe(e))
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<RawOverview, UpstreamError> {
        self.check()?;
        self.inner
            .fetch_overview(symbol)
            .await
            .map_err(|e| self.observe(e))
    }
}

/// Middleware config for constructing a [`BlacklistingClient`].
pub struct BlacklistMiddleware {
    /// Cool-down used when the triggering error carries no reset hint.
    pub default_duration: Duration,
}

impl BlacklistMiddleware {
    /// Middleware with the given fallback cool-down.
    #[must_use]
    pub const fn new(default_duration: Duration) -> Self {
        Self { default_duration }
    }
}

pub(crate) const BLACKLIST_LAYER: &str = "BlacklistingClient";

impl Middleware for BlacklistMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn MarketDataClient>) -> Arc<dyn MarketDataClient> {
        Arc::new(BlacklistingClient::new(inner, self.default_duration))
    }

    fn name(&self) -> &'static str {
        BLACKLIST_LAYER
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "default_duration_ms": u64::try_from(self.default_duration.as_millis()).unwrap_or(u64::MAX),
        })
    }
}
