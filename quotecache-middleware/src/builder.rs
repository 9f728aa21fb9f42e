//! Builder for composing a market-data client with middleware layers.
//!
//! Layers form an onion around the raw client:
//!
//! ```text
//! Resolver
//!     ↓
//! Outermost layer (e.g. Blacklist: checks first, sees errors last)
//!     ↓
//! Inner layer (e.g. Quota: spends budget)
//!     ↓
//! Raw client (e.g. Alpha Vantage: performs the HTTP call)
//! ```
//!
//! `layers` is stored outermost-first (the most recently added layer sits at
//! index 0) and applied in reverse during [`ClientBuilder::build`]:
//!
//! ```text
//! builder.with_quota(..).with_blacklist(..)
//!
//! Storage: [Blacklist, Quota]
//! Applied:  Raw -> Quota -> Blacklist
//! Result:   Blacklist(Quota(Raw))
//! ```

use std::sync::Arc;
use std::time::Duration;

use quotecache_core::{MarketDataClient, Middleware};
use quotecache_types::{QuotaConfig, QuotaConsumptionStrategy};

use crate::blacklist::{BLACKLIST_LAYER, BlacklistMiddleware};
use crate::quota::{QUOTA_LAYER, QuotaMiddleware};

/// Composes a raw client with layered wrappers.
pub struct ClientBuilder {
    raw: Arc<dyn MarketDataClient>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ClientBuilder {
    /// Start from a raw, unwrapped client.
    #[must_use]
    pub fn new(raw: Arc<dyn MarketDataClient>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    fn existing_quota_config(&self) -> Option<QuotaConfig> {
        let layer = self.layers.iter().find(|m| m.name() == QUOTA_LAYER)?;
        let cfg = layer.config_json();
        let defaults = QuotaConfig::default();
        let limit = cfg
            .get("limit")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(defaults.limit);
        let window = cfg
            .get("window_ms")
            .and_then(serde_json::Value::as_u64)
            .map_or(defaults.window, Duration::from_millis);
        let strategy = match cfg.get("strategy").and_then(serde_json::Value::as_str) {
            Some("EvenSpreadHourly") => QuotaConsumptionStrategy::EvenSpreadHourly,
            Some("Unit") => QuotaConsumptionStrategy::Unit,
            _ => defaults.strategy,
        };
        Some(QuotaConfig {
            limit,
            window,
            strategy,
        })
    }

    /// Add or replace the quota layer, placing it outermost.
    #[must_use]
    pub fn with_quota(mut self, cfg: &QuotaConfig) -> Self {
        self.layers.retain(|m| m.name() != QUOTA_LAYER);
        self.layers
            .insert(0, Box::new(QuotaMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the quota layer if present.
    #[must_use]
    pub fn without_quota(mut self) -> Self {
        self.layers.retain(|m| m.name() != QUOTA_LAYER);
        self
    }

    /// Add or replace the blacklist layer, placing it outermost.
    #[must_use]
    pub fn with_blacklist(mut self, default_duration: Duration) -> Self {
        self.layers.retain(|m| m.name() != BLACKLIST_LAYER);
        self.layers
            .insert(0, Box::new(BlacklistMiddleware::new(default_duration)));
        self
    }

    /// Remove the blacklist layer if present.
    #[must_use]
    pub fn without_blacklist(mut self) -> Self {
        self.layers.retain(|m| m.name() != BLACKLIST_LAYER);
        self
    }

    /// Shortcut: set the quota limit, keeping any configured window and strategy.
    #[must_use]
    pub fn quota_limit(self, limit: u64) -> Self {
        let mut cfg = self.existing_quota_config().unwrap_or_default();
        cfg.limit = limit;
        self.with_quota(&cfg)
    }

    /// Shortcut: set the quota window, keeping any configured limit and strategy.
    #[must_use]
    pub fn quota_window(self, window: Duration) -> Self {
        let mut cfg = self.existing_quota_config().unwrap_or_default();
        cfg.window = window;
        self.with_quota(&cfg)
    }

    /// Add an arbitrary layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Layer names and configs, outermost first, ending with the raw client.
    #[must_use]
    pub fn describe(&self) -> Vec<(String, serde_json::Value)> {
        self.layers
            .iter()
            .map(|l| (l.name().to_string(), l.config_json()))
            .chain(std::iter::once((
                "RawClient".to_string(),
                serde_json::json!({ "name": self.raw.name() }),
            )))
            .collect()
    }

    /// Apply the layers innermost-first and return the outermost client.
    #[must_use]
    pub fn build(self) -> Arc<dyn MarketDataClient> {
        let mut acc: Arc<dyn MarketDataClient> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
