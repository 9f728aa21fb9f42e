use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::raw::{RawOverview, RawQuote};
use quotecache_types::{CompanyOverview, DEFAULT_CHANGE_PERCENT, DEFAULT_MARKET_CAP, QuoteRecord};

/// A numeric field that could not be parsed and was replaced by zero.
///
/// Degradations are diagnostics, not errors: the merge still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeDefaulted {
    /// Record field that was defaulted (`"price"`, `"change"`, `"peRatio"`).
    pub field: &'static str,
    /// Raw upstream value, `None` when the field was absent.
    pub raw: Option<String>,
}

/// Merges raw upstream payloads into a normalized [`QuoteRecord`].
///
/// Merging never fails. Missing or non-numeric numbers become zero, missing
/// text becomes the empty string, and an absent overview yields a partial
/// record.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuoteAggregator;

impl QuoteAggregator {
    /// Merge and emit a `debug` event for every defaulted field.
    #[must_use]
    pub fn merge(
        symbol: &str,
        quote: &RawQuote,
        overview: Option<&RawOverview>,
        fetched_at: DateTime<Utc>,
    ) -> QuoteRecord {
        let (record, defaulted) = Self::merge_reporting(symbol, quote, overview, fetched_at);
        for d in &defaulted {
            tracing::debug!(
                symbol,
                field = d.field,
                raw = d.raw.as_deref().unwrap_or("<absent>"),
                "merge defaulted numeric field to 0"
            );
        }
        record
    }

    /// Merge and return the list of defaulted fields alongside the record.
    #[must_use]
    pub fn merge_reporting(
        symbol: &str,
        quote: &RawQuote,
        overview: Option<&RawOverview>,
        fetched_at: DateTime<Utc>,
    ) -> (QuoteRecord, Vec<MergeDefaulted>) {
        let mut defaulted = Vec::new();

        let price = coerce("price", quote.price.as_deref(), &mut defaulted);
        let change = coerce("change", quote.change.as_deref(), &mut defaulted);
        let change_percent = non_empty(quote.change_percent.as_deref())
            .unwrap_or(DEFAULT_CHANGE_PERCENT)
            .to_string();

        let company = overview.map(|o| CompanyOverview {
            company_name: o.name.clone().unwrap_or_default(),
            industry: o.industry.clone().unwrap_or_default(),
            description: o.description.clone().unwrap_or_default(),
            pe_ratio: coerce("peRatio", o.pe_ratio.as_deref(), &mut defaulted),
            market_cap: non_empty(o.market_capitalization.as_deref())
                .unwrap_or(DEFAULT_MARKET_CAP)
                .to_string(),
        });

        let record = QuoteRecord {
            symbol: symbol.to_string(),
            price,
            change,
            change_percent,
            company,
            last_updated: fetched_at,
        };
        (record, defaulted)
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}

/// Parse a decimal, accepting plain and scientific notation.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn coerce(field: &'static str, raw: Option<&str>, defaulted: &mut Vec<MergeDefaulted>) -> Decimal {
    if let Some(v) = raw.and_then(parse_decimal) {
        return v;
    }
    defaulted.push(MergeDefaulted {
        field,
        raw: raw.map(ToString::to_string),
    });
    Decimal::ZERO
}
