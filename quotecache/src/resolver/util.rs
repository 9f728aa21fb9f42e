use quotecache_core::{
    FetchStage, QuoteCacheError, QuoteRecord, RawOverview, RawQuote, UpstreamError,
};

use crate::QuoteCache;

impl QuoteCache {
    /// Cached record for `symbol` if it is still fresh.
    ///
    /// Store failures are logged and read as a miss so the caller falls
    /// through to an upstream fetch.
    pub(crate) async fn cached_fresh(&self, symbol: &str) -> Option<QuoteRecord> {
        match self.store.get(symbol).await {
            Ok(Some(record)) => {
                let now = self.clock.now();
                if self.freshness.is_fresh(&record, now) {
                    tracing::debug!(symbol, partial = record.is_partial(), "cache hit");
                    Some(record)
                } else {
                    tracing::debug!(
                        symbol,
                        last_updated = %record.last_updated,
                        "cache stale"
                    );
                    None
                }
            }
            Ok(None) => {
                tracing::debug!(symbol, "cache miss");
                None
            }
            Err(e) => {
                let err = QuoteCacheError::CacheReadFailed {
                    symbol: symbol.to_string(),
                    msg: e.to_string(),
                };
                tracing::warn!(symbol, error = %err, "cache read failed; fetching upstream");
                None
            }
        }
    }

    /// Store `record`; a failure is logged and otherwise ignored.
    pub(crate) async fn write_back(&self, record: &QuoteRecord) {
        if let Err(e) = self.store.put(record).await {
            let err = QuoteCacheError::CacheWriteFailed {
                symbol: record.symbol.clone(),
                msg: e.to_string(),
            };
            tracing::warn!(symbol = %record.symbol, error = %err, "cache write failed");
        }
    }

    pub(crate) async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, QuoteCacheError> {
        let res = Self::provider_call_with_timeout(
            self.client.name(),
            FetchStage::Quote,
            self.cfg.provider_timeout,
            self.client.fetch_quote(symbol),
        )
        .await;
        res.map_err(|e| self.upstream_failed(symbol, FetchStage::Quote, e))
    }

    pub(crate) async fn fetch_overview(
        &self,
        symbol: &str,
    ) -> Result<RawOverview, QuoteCacheError> {
        let res = Self::provider_call_with_timeout(
            self.client.name(),
            FetchStage::Overview,
            self.cfg.provider_timeout,
            self.client.fetch_overview(symbol),
        )
        .await;
        res.map_err(|e| self.upstream_failed(symbol, FetchStage::Overview, e))
    }

    fn upstream_failed(
        &self,
        symbol: &str,
        stage: FetchStage,
        source: UpstreamError,
    ) -> QuoteCacheError {
        tracing::warn!(
            symbol,
            client = self.client.name(),
            stage = %stage,
            error = %source,
            "upstream fetch failed"
        );
        QuoteCacheError::upstream(symbol, stage, source)
    }
}
