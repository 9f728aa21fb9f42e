use quotecache_core::{QuoteAggregator, QuoteCacheError, QuoteRecord, normalize_symbol};

use crate::QuoteCache;

impl QuoteCache {
    /// Resolve the full record for one symbol.
    ///
    /// Serves a fresh cached record without touching the provider. Otherwise
    /// fetches the quote and then the company overview, merges them, writes
    /// the result back and returns it. Both fetches must succeed: a detail
    /// lookup never yields a partial record built from this call.
    ///
    /// `symbol` is trimmed and upper-cased first.
    ///
    /// # Errors
    /// - `InvalidArg` for a blank symbol.
    /// - `UpstreamFetchFailed` when either fetch fails or times out. The
    ///   error's `stage` names the failing call. An unknown symbol and an
    ///   unavailable provider produce the same error.
    ///
    /// Cache read and write failures are logged and never returned.
    #[tracing::instrument(name = "quotecache::resolver::resolve_one", skip(self))]
    pub async fn resolve_one(&self, symbol: &str) -> Result<QuoteRecord, QuoteCacheError> {
        let symbol = normalize_symbol(symbol)
            .ok_or_else(|| QuoteCacheError::invalid_arg("symbol must not be empty"))?;

        if let Some(cached) = self.cached_fresh(&symbol).await {
            return Ok(cached);
        }

        let quote = self.fetch_quote(&symbol).await?;
        let overview = self.fetch_overview(&symbol).await?;

        let record = QuoteAggregator::merge(&symbol, &quote, Some(&overview), self.clock.now());
        self.write_back(&record).await;
        Ok(record)
    }
}
