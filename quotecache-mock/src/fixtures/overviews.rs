use quotecache_core::RawOverview;

pub fn by_symbol(s: &str) -> Option<RawOverview> {
    match s {
        "AAPL" => Some(o(
            "Apple Inc",
            "ELECTRONIC COMPUTERS",
            "Apple Inc. designs, manufactures, and markets smartphones and personal computers.",
            "29.45",
            "2935000000000",
        )),
        "MSFT" => Some(o(
            "Microsoft Corporation",
            "SERVICES-PREPACKAGED SOFTWARE",
            "Microsoft develops and supports software, services, devices and solutions.",
            "36.20",
            "3125000000000",
        )),
        "GOOGL" => Some(o(
            "Alphabet Inc Class A",
            "SERVICES-COMPUTER PROGRAMMING, DATA PROCESSING, ETC.",
            "Alphabet is the holding company of Google.",
            "25.10",
            "1870000000000",
        )),
        "AMZN" => Some(o(
            "Amazon.com Inc",
            "RETAIL-CATALOG & MAIL-ORDER HOUSES",
            "Amazon sells consumer products and subscriptions.",
            "51.30",
            "1850000000000",
        )),
        "TSLA" => Some(o(
            "Tesla Inc",
            "MOTOR VEHICLES & PASSENGER CAR BODIES",
            "Tesla designs and sells electric vehicles.",
            "41.80",
            "545000000000",
        )),
        // Loss-making issuer: Alpha Vantage reports PERatio as "None".
        "NVDA" => Some(o(
            "NVIDIA Corporation",
            "SEMICONDUCTORS & RELATED DEVICES",
            "NVIDIA designs graphics processors.",
            "None",
            "2460000000000",
        )),
        _ => None,
    }
}

fn o(name: &str, industry: &str, description: &str, pe: &str, cap: &str) -> RawOverview {
    RawOverview {
        name: Some(name.to_string()),
        industry: Some(industry.to_string()),
        description: Some(description.to_string()),
        pe_ratio: Some(pe.to_string()),
        market_capitalization: Some(cap.to_string()),
    }
}
