//! Display helpers shared by every view of a metrics snapshot.

use serde::{Deserialize, Serialize};

use crate::{Exchange, Trend};

/// Placeholder shown for any field the backend did not provide
pub const MISSING: &str = "-";

/// Whether a rising value is good news for a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Margins, growth
    FavorableUp,
    /// Cost ratios: SG&A, R&D, cost of risk
    FavorableDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn to_label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// One-character marker used by the text views
    pub fn marker(&self) -> &'static str {
        match self {
            Sentiment::Positive => "+",
            Sentiment::Negative => "!",
            Sentiment::Neutral => " ",
        }
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => MISSING.to_string(),
    }
}

/// Ratios are shown without a percent sign
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => MISSING.to_string(),
    }
}

pub fn format_price(symbol: &str, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}{:.2}", symbol, v),
        None => MISSING.to_string(),
    }
}

/// Large currency amounts (revenue, cash) in compact form: `$383.30B`
pub fn format_amount(currency: Option<&str>, value: Option<f64>) -> String {
    let Some(v) = value else {
        return MISSING.to_string();
    };
    let symbol = currency.map(currency_symbol).unwrap_or_default();
    let sign = if v < 0.0 { "-" } else { "" };
    let abs = v.abs();
    let compact = if abs >= 1_000_000_000_000.0 {
        format!("{:.2}T", abs / 1_000_000_000_000.0)
    } else if abs >= 1_000_000_000.0 {
        format!("{:.2}B", abs / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.2}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.2}K", abs / 1_000.0)
    } else {
        format!("{:.2}", abs)
    };
    format!("{}{}{}", sign, symbol, compact)
}

pub fn format_trend(trend: Option<Trend>) -> String {
    trend
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Glyph for an ISO currency code. Lookup is case-insensitive; unknown codes
/// come back uppercased.
pub fn currency_symbol(code: &str) -> String {
    let upper = code.trim().to_uppercase();
    let symbol = match upper.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CHF" => "CHF",
        "AUD" => "A$",
        "CAD" => "C$",
        "CNY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "SEK" => "kr",
        "NOK" => "kr",
        "MXN" => "$",
        "BRL" => "R$",
        "ZAR" => "R",
        _ => return upper,
    };
    symbol.to_string()
}

/// Glyph used in front of share prices. The exchange wins over the reporting
/// currency since a US listing trades in dollars whatever the company reports in.
pub fn price_symbol(exchange: Option<&Exchange>, currency: Option<&str>) -> String {
    match exchange {
        Some(Exchange::Us) => "$".to_string(),
        Some(Exchange::Tse) => "¥".to_string(),
        _ => currency.map(currency_symbol).unwrap_or_default(),
    }
}

pub fn classify_trend(trend: Option<Trend>, polarity: Polarity) -> Sentiment {
    match (trend, polarity) {
        (Some(Trend::Uptrend), Polarity::FavorableUp)
        | (Some(Trend::Downtrend), Polarity::FavorableDown) => Sentiment::Positive,
        (Some(Trend::Downtrend), Polarity::FavorableUp)
        | (Some(Trend::Uptrend), Polarity::FavorableDown) => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}
