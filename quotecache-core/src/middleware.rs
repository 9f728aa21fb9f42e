use std::sync::Arc;

use crate::client::MarketDataClient;

/// Trait implemented by client middleware layers.
///
/// A middleware consumes an inner `MarketDataClient` and returns a wrapped client
/// that augments or restricts behavior (e.g., quotas, blacklisting).
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner client and return the wrapped client.
    fn apply(self: Box<Self>, inner: Arc<dyn MarketDataClient>) -> Arc<dyn MarketDataClient>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;

    /// Opaque configuration snapshot for serialization/inspection.
    fn config_json(&self) -> serde_json::Value;
}
