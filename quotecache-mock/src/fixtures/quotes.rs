use quotecache_core::RawQuote;

pub fn by_symbol(s: &str) -> Option<RawQuote> {
    match s {
        "AAPL" => Some(q("189.9800", "1.0200", "0.5398%")),
        "MSFT" => Some(q("420.5500", "-2.1100", "-0.4992%")),
        "GOOGL" => Some(q("150.2200", "0.8700", "0.5825%")),
        "AMZN" => Some(q("178.1500", "3.4000", "1.9456%")),
        "TSLA" => Some(q("171.0500", "-5.7500", "-3.2523%")),
        "NVDA" => Some(q("1000.0000", "10.0000", "1.0101%")),
        // Delisted-looking payload: every field is a placeholder.
        "GHOST" => Some(RawQuote {
            price: Some("N/A".to_string()),
            change: None,
            change_percent: None,
        }),
        _ => None,
    }
}

fn q(price: &str, change: &str, pct: &str) -> RawQuote {
    RawQuote {
        price: Some(price.to_string()),
        change: Some(change.to_string()),
        change_percent: Some(pct.to_string()),
    }
}
