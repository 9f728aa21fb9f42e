//! Alpha Vantage response bodies and their mapping onto provider-neutral payloads.

use serde::Deserialize;

use quotecache_core::{RawOverview, RawQuote, UpstreamError};

/// `GLOBAL_QUOTE` response. Error bodies share the same envelope.
#[derive(Debug, Deserialize)]
pub struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    pub global_quote: Option<GlobalQuote>,
    #[serde(flatten)]
    pub notices: Notices,
}

#[derive(Debug, Default, Deserialize)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "05. price")]
    pub price: Option<String>,
    #[serde(rename = "09. change")]
    pub change: Option<String>,
    #[serde(rename = "10. change percent")]
    pub change_percent: Option<String>,
}

/// `OVERVIEW` response. Only the fields the cache keeps are decoded.
#[derive(Debug, Deserialize)]
pub struct OverviewResponse {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    pub market_capitalization: Option<String>,
    #[serde(flatten)]
    pub notices: Notices,
}

/// Out-of-band messages Alpha Vantage returns with HTTP 200.
#[derive(Debug, Default, Deserialize)]
pub struct Notices {
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
}

fn mentions_rate_limit(msg: &str) -> bool {
    let m = msg.to_ascii_lowercase();
    m.contains("api call frequency") || m.contains("rate limit")
}

impl Notices {
    /// Turn error and rate-limit notices into errors; other notices are logged.
    pub fn check(&self, symbol: &str) -> Result<(), UpstreamError> {
        if let Some(msg) = &self.error_message {
            return Err(UpstreamError::Provider(msg.clone()));
        }
        for msg in [&self.note, &self.information].into_iter().flatten() {
            if mentions_rate_limit(msg) {
                return Err(UpstreamError::RateLimited(msg.clone()));
            }
            tracing::warn!(symbol, notice = %msg, "alpha vantage notice");
        }
        Ok(())
    }
}

impl GlobalQuoteResponse {
    pub fn into_raw(self, symbol: &str) -> Result<RawQuote, UpstreamError> {
        self.notices.check(symbol)?;
        let q = self
            .global_quote
            .filter(|q| q.price.is_some() || q.change.is_some() || q.change_percent.is_some())
            .ok_or_else(|| UpstreamError::Malformed(format!("empty Global Quote for {symbol}")))?;
        Ok(RawQuote {
            price: q.price,
            change: q.change,
            change_percent: q.change_percent,
        })
    }
}

impl OverviewResponse {
    pub fn into_raw(self, symbol: &str) -> Result<RawOverview, UpstreamError> {
        self.notices.check(symbol)?;
        Ok(RawOverview {
            name: self.name,
            industry: self.industry,
            description: self.description,
            pe_ratio: self.pe_ratio,
            market_capitalization: self.market_capitalization,
        })
    }
}
