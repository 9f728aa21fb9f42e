use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use quotecache_core::{QuoteAggregator, QuoteCacheError, QuoteRecord, normalize_symbol};

use crate::QuoteCache;

impl QuoteCache {
    /// Resolve quotes for several symbols.
    ///
    /// Behavior:
    /// - Returns one `(symbol, outcome)` per input slot, in input order, no
    ///   matter which lookup finishes first. Valid symbols are reported
    ///   normalized; blank ones keep their raw text and fail with `InvalidArg`.
    /// - Only the quote is fetched on a miss, so fetched records are partial.
    ///   A fresh cached record is served as-is, full or partial.
    /// - Up to `batch_concurrency` symbols are in flight at once. A failing
    ///   symbol only fails its own slot.
    /// - With `dedupe`, repeated symbols (after normalization) collapse to
    ///   their first occurrence; otherwise every slot is resolved on its own.
    #[tracing::instrument(
        name = "quotecache::resolver::resolve_many",
        skip(self, symbols),
        fields(count = symbols.len()),
    )]
    pub async fn resolve_many<S: AsRef<str>>(
        &self,
        symbols: &[S],
        dedupe: bool,
    ) -> Vec<(String, Result<QuoteRecord, QuoteCacheError>)> {
        if symbols.is_empty() {
            return vec![];
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut slots: Vec<(String, Option<String>)> = Vec::with_capacity(symbols.len());
        for raw in symbols {
            let raw = raw.as_ref();
            match normalize_symbol(raw) {
                Some(sym) => {
                    if dedupe && !seen.insert(sym.clone()) {
                        continue;
                    }
                    slots.push((sym.clone(), Some(sym)));
                }
                None => slots.push((raw.to_string(), None)),
            }
        }

        let tasks = slots.into_iter().map(|(label, sym)| async move {
            let res = match sym {
                Some(sym) => self.resolve_quote_only(&sym).await,
                None => Err(QuoteCacheError::invalid_arg("symbol must not be empty")),
            };
            (label, res)
        });

        stream::iter(tasks)
            .buffered(self.cfg.batch_concurrency.max(1))
            .collect()
            .await
    }

    /// Resolve the configured popular symbols, keeping only successes.
    ///
    /// Failed symbols are logged and left out; the remaining records keep the
    /// configured order.
    #[tracing::instrument(name = "quotecache::resolver::popular", skip(self))]
    pub async fn popular(&self) -> Vec<QuoteRecord> {
        let results = self.resolve_many(self.cfg.popular_symbols.as_slice(), true).await;
        let mut out = Vec::with_capacity(results.len());
        for (symbol, res) in results {
            match res {
                Ok(record) => out.push(record),
                Err(e) => tracing::warn!(symbol = %symbol, error = %e, "dropping popular symbol"),
            }
        }
        out
    }

    async fn resolve_quote_only(&self, symbol: &str) -> Result<QuoteRecord, QuoteCacheError> {
        if let Some(cached) = self.cached_fresh(symbol).await {
            return Ok(cached);
        }
        let quote = self.fetch_quote(symbol).await?;
        let record = QuoteAggregator::merge(symbol, &quote, None, self.clock.now());
        self.write_back(&record).await;
        Ok(record)
    }
}
