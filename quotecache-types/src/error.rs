use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which upstream call of a resolution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchStage {
    /// The price quote call.
    Quote,
    /// The company-overview call.
    Overview,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quote => f.write_str("quote"),
            Self::Overview => f.write_str("overview"),
        }
    }
}

/// Failure of a single upstream provider call.
///
/// Every variant is treated the same by the resolver (the symbol could not be
/// fetched); the distinction exists for logs and for the middleware that
/// reacts to rate limiting.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UpstreamError {
    /// Network or HTTP-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a structured error body.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider reported that its call frequency limit was hit.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The payload could not be decoded or lacked the expected data.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The call exceeded its timeout budget.
    #[error("timed out after {timeout_ms}ms")]
    Timeout {
        /// Budget that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The local quota budget for the current window is spent.
    #[error("quota exceeded: remaining={remaining} reset_in_ms={reset_in_ms}")]
    QuotaExceeded {
        /// Remaining units at the time of rejection.
        remaining: u64,
        /// Milliseconds until the quota window resets.
        reset_in_ms: u64,
    },

    /// The client is cooling down after rate limiting; retry after `reset_in_ms`.
    #[error("temporarily blacklisted: reset_in_ms={reset_in_ms}")]
    TemporarilyBlacklisted {
        /// Milliseconds until the cool-down elapses.
        reset_in_ms: u64,
    },
}

impl UpstreamError {
    /// Helper: build a `Timeout` from the elapsed budget.
    #[must_use]
    pub fn timeout(budget: std::time::Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// True for errors that signal the provider must not be called for a while.
    #[must_use]
    pub const fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::QuotaExceeded { .. })
    }
}

/// Unified error type for the quotecache workspace.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuoteCacheError {
    /// A quote or overview fetch failed for `symbol`.
    ///
    /// This deliberately covers both "symbol unknown to the provider" and
    /// "provider unavailable"; callers cannot tell the two apart.
    #[error("{stage} fetch failed for {symbol}: {source}")]
    UpstreamFetchFailed {
        /// Normalized symbol being resolved.
        symbol: String,
        /// Which call failed.
        stage: FetchStage,
        /// Underlying provider failure.
        source: UpstreamError,
    },

    /// Reading the cache failed; recovered by fetching fresh data.
    #[error("cache read failed for {symbol}: {msg}")]
    CacheReadFailed {
        /// Symbol whose record could not be read.
        symbol: String,
        /// Backend message.
        msg: String,
    },

    /// Writing the cache failed; recovered by returning the fetched record.
    #[error("cache write failed for {symbol}: {msg}")]
    CacheWriteFailed {
        /// Symbol whose record could not be written.
        symbol: String,
        /// Backend message.
        msg: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The caller carries no principal.
    #[error("unauthorized")]
    Unauthorized,

    /// A primary-data store (not the quote cache) failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl QuoteCacheError {
    /// Helper: build an `UpstreamFetchFailed` error.
    pub fn upstream(symbol: impl Into<String>, stage: FetchStage, source: UpstreamError) -> Self {
        Self::UpstreamFetchFailed {
            symbol: symbol.into(),
            stage,
            source,
        }
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Returns true if this error is surfaced to users as "not found".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UpstreamFetchFailed { .. })
    }

    /// Status code used when this error is returned to an HTTP caller.
    ///
    /// Upstream failures read as 404 whether the symbol is unknown or the
    /// provider is down; the two cannot be told apart at this layer.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::UpstreamFetchFailed { .. } => 404,
            Self::InvalidArg(_) => 400,
            Self::Unauthorized => 401,
            _ => 500,
        }
    }

    /// The failed stage for upstream errors.
    #[must_use]
    pub const fn stage(&self) -> Option<FetchStage> {
        match self {
            Self::UpstreamFetchFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
