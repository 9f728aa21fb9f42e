use serde::{Deserialize, Serialize};

/// Quote payload as reported upstream, before any coercion.
///
/// Every field is optional text: providers omit fields, send placeholders such
/// as `"N/A"`, or encode numbers as strings. [`QuoteAggregator`] applies the
/// defaulting rules.
///
/// [`QuoteAggregator`]: crate::aggregate::QuoteAggregator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuote {
    /// Latest traded price.
    pub price: Option<String>,
    /// Absolute change since the prior close.
    pub change: Option<String>,
    /// Percentage change, e.g. `"1.19%"`.
    pub change_percent: Option<String>,
}

/// Company overview payload as reported upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOverview {
    /// Company display name.
    pub name: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// Price/earnings ratio as text (may be `"None"` or `"-"`).
    pub pe_ratio: Option<String>,
    /// Market capitalization as an integer string.
    pub market_capitalization: Option<String>,
}
