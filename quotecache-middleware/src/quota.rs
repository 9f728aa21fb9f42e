//! Quota-aware client wrapper.
//!
//! Every upstream call, quote or overview, consumes one unit of the window
//! budget. Calls are rejected locally once the budget is spent so the
//! provider never sees them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use quotecache_core::{MarketDataClient, Middleware, RawOverview, RawQuote};
use quotecache_types::{QuotaConfig, QuotaConsumptionStrategy, QuotaState, UpstreamError};

/// Number of slices a window is divided into under `EvenSpreadHourly`.
const SLICES_PER_WINDOW: u64 = 24;

/// Wrapper that enforces a fixed-window call budget.
pub struct QuotaAwareClient {
    inner: Arc<dyn MarketDataClient>,
    config: QuotaConfig,
    runtime: Mutex<QuotaRuntime>,
}

struct QuotaRuntime {
    calls_made_in_window: u64,
    window_start: Instant,

    // EvenSpreadHourly only
    allowed_per_slice: u64,
    slice_duration: Duration,
    calls_made_in_slice: u64,
    slice_start: Instant,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Advance `start` to the most recent boundary of `period` at or before `now`.
fn align(start: Instant, now: Instant, period: Duration) -> Instant {
    let period_ns = period.as_nanos().max(1);
    let elapsed_ns = now.duration_since(start).as_nanos();
    let offset = (elapsed_ns / period_ns) * period_ns;
    start + Duration::from_nanos(u64::try_from(offset).unwrap_or(u64::MAX))
}

impl QuotaAwareClient {
    /// Wrap `inner` with a fresh budget described by `config`.
    pub fn new(inner: Arc<dyn MarketDataClient>, config: QuotaConfig) -> Self {
        let (allowed_per_slice, slice_duration) = match config.strategy {
            QuotaConsumptionStrategy::EvenSpreadHourly => {
                let per_slice = (config.limit / SLICES_PER_WINDOW).max(1);
                let slice_ms = (millis(config.window) / SLICES_PER_WINDOW).max(1);
                (per_slice, Duration::from_millis(slice_ms))
            }
            _ => (0, Duration::ZERO),
        };
        let now = Instant::now();
        Self {
            inner,
            config,
            runtime: Mutex::new(QuotaRuntime {
                calls_made_in_window: 0,
                window_start: now,
                allowed_per_slice,
                slice_duration,
                calls_made_in_slice: 0,
                slice_start: now,
            }),
        }
    }

    /// Access the wrapped client.
    pub fn inner(&self) -> &Arc<dyn MarketDataClient> {
        &self.inner
    }

    fn runtime(&self) -> MutexGuard<'_, QuotaRuntime> {
        self.runtime.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn roll_window(&self, rt: &mut QuotaRuntime, now: Instant) {
        if now.duration_since(rt.window_start) >= self.config.window {
            rt.calls_made_in_window = 0;
            rt.window_start = align(rt.window_start, now, self.config.window);
        }
    }

    /// Consume one unit of budget, or report why the call must not proceed.
    ///
    /// # Errors
    /// Returns `UpstreamError::QuotaExceeded` when the per-slice (for
    /// `EvenSpreadHourly`) or the overall window budget is exhausted. When a
    /// slice blocks the call while the window still has units left,
    /// `remaining` is non-zero and `reset_in_ms` points at the next slice.
    pub fn should_allow_call(&self) -> Result<(), UpstreamError> {
        let now = Instant::now();
        let mut rt = self.runtime();
        self.roll_window(&mut rt, now);

        let spread = matches!(
            self.config.strategy,
            QuotaConsumptionStrategy::EvenSpreadHourly
        );
        if spread {
            if now.duration_since(rt.slice_start) >= rt.slice_duration {
                rt.calls_made_in_slice = 0;
                rt.slice_start = align(rt.slice_start, now, rt.slice_duration);
            }
            if rt.calls_made_in_slice >= rt.allowed_per_slice
                && rt.calls_made_in_window < self.config.limit
            {
                let left_in_slice = rt
                    .slice_duration
                    .saturating_sub(now.duration_since(rt.slice_start));
                return Err(UpstreamError::QuotaExceeded {
                    remaining: self.config.limit - rt.calls_made_in_window,
                    reset_in_ms: millis(left_in_slice),
                });
            }
        }

        if rt.calls_made_in_window < self.config.limit {
            rt.calls_made_in_window += 1;
            if spread {
                rt.calls_made_in_slice += 1;
            }
            return Ok(());
        }

        let left_in_window = self
            .config
            .window
            .saturating_sub(now.duration_since(rt.window_start));
        drop(rt);
        tracing::debug!(
            client = self.inner.name(),
            limit = self.config.limit,
            "quota window exhausted"
        );
        Err(UpstreamError::QuotaExceeded {
            remaining: 0,
            reset_in_ms: millis(left_in_window),
        })
    }

    /// Snapshot of the window budget.
    #[must_use]
    pub fn state(&self) -> QuotaState {
        let now = Instant::now();
        let mut rt = self.runtime();
        self.roll_window(&mut rt, now);
        QuotaState {
            limit: self.config.limit,
            remaining: self.config.limit.saturating_sub(rt.calls_made_in_window),
            reset_in: self
                .config
                .window
                .saturating_sub(now.duration_since(rt.window_start)),
        }
    }
}

#[async_trait]
impl MarketDataClient for QuotaAwareClient {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError> {
        self.should_allow_call()?;
        self.inner.fetch_quote(symbol).await
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<RawOverview, UpstreamError> {
        self.should_allow_call()?;
        self.inner.fetch_overview(symbol).await
    }
}

/// Middleware config for constructing a [`QuotaAwareClient`].
pub struct QuotaMiddleware {
    /// Budget applied by the produced wrapper.
    pub config: QuotaConfig,
}

impl QuotaMiddleware {
    /// Middleware applying `config`.
    #[must_use]
    pub const fn new(config: QuotaConfig) -> Self {
        Self { config }
    }
}

pub(crate) const QUOTA_LAYER: &str = "QuotaAwareClient";

impl Middleware for QuotaMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn MarketDataClient>) -> Arc<dyn MarketDataClient> {
        Arc::new(QuotaAwareClient::new(inner, self.config))
    }

    fn name(&self) -> &'static str {
        QUOTA_LAYER
    }

    fn config_json(&self) -> serde_json::Value {
        let strategy = match self.config.strategy {
            QuotaConsumptionStrategy::EvenSpreadHourly => "EvenSpreadHourly",
            _ => "Unit",
        };
        serde_json::json!({
            "limit": self.config.limit,
            "window_ms": millis(self.config.window),
            "strategy": strategy,
        })
    }
}
