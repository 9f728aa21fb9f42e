use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use quotecache_types::QuoteRecord;

/// Freshness window used by the system: fifteen minutes.
pub const DEFAULT_FRESHNESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Returns true iff `now - last_updated < ttl`.
///
/// A `last_updated` in the future (clock skew between writers) yields a
/// negative age and therefore counts as fresh. An age equal to `ttl` is stale.
#[must_use]
pub fn is_fresh(last_updated: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    let Ok(ttl) = TimeDelta::from_std(ttl) else {
        // ttl beyond chrono's range: nothing can be that old
        return true;
    };
    now.signed_duration_since(last_updated) < ttl
}

/// Applies [`is_fresh`] with a fixed ttl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    ttl: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS_TTL)
    }
}

impl FreshnessPolicy {
    /// Policy with the given freshness window.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// The freshness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `record` may be served at `now` without refetching.
    #[must_use]
    pub fn is_fresh(&self, record: &QuoteRecord, now: DateTime<Utc>) -> bool {
        is_fresh(record.last_updated, now, self.ttl)
    }
}
