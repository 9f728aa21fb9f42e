use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quotecache_core::{FetchStage, MarketDataClient, RawOverview, RawQuote, UpstreamError};

/// Instruction for how a method should behave for a given symbol.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Return the provided value after sleeping (tokio time).
    ReturnAfter(Duration, T),
    /// Fail immediately with the provided error.
    Fail(UpstreamError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

/// One recorded upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub stage: FetchStage,
    pub symbol: String,
}

#[derive(Default)]
struct InternalState {
    quote_rules: HashMap<String, MockBehavior<RawQuote>>,
    overview_rules: HashMap<String, MockBehavior<RawOverview>>,
    calls: Vec<MockCall>,
}

#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

struct InFlightGuard<'a>(&'a InFlight);

impl<'a> InFlightGuard<'a> {
    fn enter(f: &'a InFlight) -> Self {
        let now = f.current.fetch_add(1, Ordering::SeqCst) + 1;
        f.peak.fetch_max(now, Ordering::SeqCst);
        Self(f)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
    in_flight: Arc<InFlight>,
}

impl DynamicMockController {
    /// Set the behavior for `fetch_quote` calls for a specific symbol.
    pub async fn set_quote_behavior(&self, symbol: &str, behavior: MockBehavior<RawQuote>) {
        let mut guard = self.state.lock().await;
        guard.quote_rules.insert(symbol.to_string(), behavior);
    }

    /// Set the behavior for `fetch_overview` calls for a specific symbol.
    pub async fn set_overview_behavior(&self, symbol: &str, behavior: MockBehavior<RawOverview>) {
        let mut guard = self.state.lock().await;
        guard.overview_rules.insert(symbol.to_string(), behavior);
    }

    /// Every call made so far, in arrival order.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of calls made for `stage`.
    pub async fn call_count(&self, stage: FetchStage) -> usize {
        let guard = self.state.lock().await;
        guard.calls.iter().filter(|c| c.stage == stage).count()
    }

    /// Highest number of calls that were executing at the same time.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.in_flight.peak.load(Ordering::SeqCst)
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.quote_rules.clear();
        guard.overview_rules.clear();
        guard.calls.clear();
    }
}

/// A client that defers all behavior to an external controller.
///
/// Symbols without a configured behavior fail with `UpstreamError::Malformed`.
pub struct DynamicMockClient {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
    in_flight: Arc<InFlight>,
}

impl DynamicMockClient {
    /// Create a new dynamic mock client and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn MarketDataClient>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let in_flight = Arc::new(InFlight::default());
        let controller = DynamicMockController {
            state: Arc::clone(&state),
            in_flight: Arc::clone(&in_flight),
        };
        let me = Arc::new(Self {
            name,
            state,
            in_flight,
        });
        (me as Arc<dyn MarketDataClient>, controller)
    }
}

async fn play<T>(
    behavior: Option<MockBehavior<T>>,
    stage: FetchStage,
    symbol: &str,
) -> Result<T, UpstreamError> {
    match behavior {
        Some(MockBehavior::Return(v)) => Ok(v),
        Some(MockBehavior::ReturnAfter(delay, v)) => {
            tokio::time::sleep(delay).await;
            Ok(v)
        }
        Some(MockBehavior::Fail(e)) => Err(e),
        Some(MockBehavior::Hang) => {
            std::future::pending::<()>().await;
            unreachable!()
        }
        None => Err(UpstreamError::Malformed(format!(
            "no mock {stage} behavior for {symbol}"
        ))),
    }
}

#[async_trait]
impl MarketDataClient for DynamicMockClient {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError> {
        let _slot = InFlightGuard::enter(&self.in_flight);
        // Snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.push(MockCall {
                stage: FetchStage::Quote,
                symbol: symbol.to_string(),
            });
            guard.quote_rules.get(symbol).cloned()
        };
        play(behavior, FetchStage::Quote, symbol).await
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<RawOverview, UpstreamError> {
        let _slot = InFlightGuard::enter(&self.in_flight);
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.push(MockCall {
                stage: FetchStage::Overview,
                symbol: symbol.to_string(),
            });
            guard.overview_rules.get(symbol).cloned()
        };
        play(behavior, FetchStage::Overview, symbol).await
    }
}
