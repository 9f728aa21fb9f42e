//! The canonical cached unit and its company-overview half.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `changePercent` used when upstream omits it.
pub const DEFAULT_CHANGE_PERCENT: &str = "0%";
/// `marketCap` used when upstream omits it.
pub const DEFAULT_MARKET_CAP: &str = "0";

fn default_change_percent() -> String {
    DEFAULT_CHANGE_PERCENT.to_string()
}

fn default_market_cap() -> String {
    DEFAULT_MARKET_CAP.to_string()
}

/// Decimal fields are written as strings so scale and precision survive a
/// store round trip. Reads also accept JSON numbers.
mod exact_decimal {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Text(String),
        Int(i64),
        Float(f64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        match Stored::deserialize(deserializer)? {
            Stored::Text(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .map_err(|e| de::Error::custom(format!("invalid decimal {s:?}: {e}")))
            }
            Stored::Int(i) => Ok(Decimal::from(i)),
            Stored::Float(f) => Decimal::from_str(&f.to_string())
                .map_err(|e| de::Error::custom(format!("invalid decimal {f}: {e}"))),
        }
    }
}

/// Company-overview fields carried by a full [`QuoteRecord`].
///
/// Persisted flattened into the record. `companyName` is the marker key: a
/// stored mapping without it deserializes as a partial record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOverview {
    /// Company display name, verbatim from upstream (empty if missing).
    pub company_name: String,
    /// Industry classification, verbatim from upstream (empty if missing).
    #[serde(default)]
    pub industry: String,
    /// Long-form description, verbatim from upstream (empty if missing).
    #[serde(default)]
    pub description: String,
    /// Price/earnings ratio; zero when unavailable or non-numeric upstream.
    ///
    /// Older records stored this under `pe`.
    #[serde(default, alias = "pe", with = "exact_decimal")]
    pub pe_ratio: Decimal,
    /// Market capitalization as a decimal string (may exceed 2^53).
    #[serde(default = "default_market_cap")]
    pub market_cap: String,
}

impl Default for CompanyOverview {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            industry: String::new(),
            description: String::new(),
            pe_ratio: Decimal::ZERO,
            market_cap: default_market_cap(),
        }
    }
}

/// A normalized quote for one symbol, as served and as cached.
///
/// A record is *full* when it carries a [`CompanyOverview`] and *partial*
/// when it was produced from quote data alone (batch and list lookups).
/// `last_updated` is always the time the record was produced locally, never
/// a timestamp reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Upper-case ticker; the record's sole identity.
    pub symbol: String,
    /// Latest traded price.
    #[serde(default, with = "exact_decimal")]
    pub price: Decimal,
    /// Absolute price delta since the prior close.
    #[serde(default, with = "exact_decimal")]
    pub change: Decimal,
    /// Percentage change, verbatim from upstream (e.g. `"1.19%"`).
    #[serde(default = "default_change_percent")]
    pub change_percent: String,
    /// Company fields; `None` for partial records.
    #[serde(flatten)]
    pub company: Option<CompanyOverview>,
    /// When this record was produced.
    pub last_updated: DateTime<Utc>,
}

impl QuoteRecord {
    /// True when the record lacks company-overview fields.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.company.is_none()
    }

    /// Company name, or the empty string for partial records.
    #[must_use]
    pub fn company_name(&self) -> &str {
        self.company.as_ref().map_or("", |c| c.company_name.as_str())
    }

    /// Industry, or the empty string for partial records.
    #[must_use]
    pub fn industry(&self) -> &str {
        self.company.as_ref().map_or("", |c| c.industry.as_str())
    }

    /// Description, or the empty string for partial records.
    #[must_use]
    pub fn description(&self) -> &str {
        self.company.as_ref().map_or("", |c| c.description.as_str())
    }

    /// P/E ratio, or zero for partial records.
    #[must_use]
    pub fn pe_ratio(&self) -> Decimal {
        self.company.as_ref().map_or(Decimal::ZERO, |c| c.pe_ratio)
    }

    /// Market capitalization string, or `"0"` for partial records.
    #[must_use]
    pub fn market_cap(&self) -> &str {
        self.company
            .as_ref()
            .map_or(DEFAULT_MARKET_CAP, |c| c.market_cap.as_str())
    }
}
