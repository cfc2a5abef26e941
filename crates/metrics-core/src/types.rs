use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of change of a metric over a short- or long-term window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Uptrend,
    Downtrend,
    Flat,
    Irrelevant,
    /// Any label the backend sends that we do not recognize
    #[serde(other)]
    Unknown,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Uptrend => "Uptrend",
            Trend::Downtrend => "Downtrend",
            Trend::Flat => "Flat",
            Trend::Irrelevant => "Irrelevant",
            Trend::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Listing venue. The backend only distinguishes US listings from Tokyo ones,
/// anything else is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Exchange {
    Us,
    Tse,
    Other(String),
}

impl From<String> for Exchange {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "US" | "NASDAQ" | "NYSE" => Exchange::Us,
            "TSE" | "JP" => Exchange::Tse,
            _ => Exchange::Other(value),
        }
    }
}

impl From<Exchange> for String {
    fn from(value: Exchange) -> Self {
        match value {
            Exchange::Us => "US".to_string(),
            Exchange::Tse => "TSE".to_string(),
            Exchange::Other(s) => s,
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exchange::Us => f.write_str("US"),
            Exchange::Tse => f.write_str("TSE"),
            Exchange::Other(s) => f.write_str(s),
        }
    }
}

/// One metrics snapshot for a ticker, as computed by the backend.
///
/// Covers both the ratio-based and the nominal (absolute amount) payloads:
/// every field except `ticker` is optional and a missing field means
/// "no data", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub ticker: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub exchange: Option<Exchange>,
    pub currency: Option<String>,
    pub favorite: Option<bool>,
    pub next_earnings_date: Option<NaiveDate>,
    pub last_updated: Option<NaiveDate>,

    // Revenue and growth
    pub revenue_ttm: Option<f64>,
    pub revenue_growth_yoy_ttm: Option<f64>,
    pub revenue_growth_multi_year: Option<f64>,
    pub gross_profit_growth_yoy_ttm: Option<f64>,
    pub gross_profit_growth_multi_year: Option<f64>,
    pub revenue_next_year: Option<f64>,
    pub revenue_growth_next_year: Option<f64>,

    // Margins
    pub gross_margin_ttm: Option<f64>,
    pub gross_margin_short_term_trend: Option<Trend>,
    pub gross_margin_long_term_trend: Option<Trend>,
    pub operating_margin_ttm: Option<f64>,
    pub operating_margin_short_term_trend: Option<Trend>,
    pub operating_margin_long_term_trend: Option<Trend>,
    pub net_margin_ttm: Option<f64>,
    pub theoretical_net_margin: Option<f64>,
    pub is_net_margin_optimized: Option<bool>,
    pub operating_cash_flow_margin_ttm: Option<f64>,
    pub operating_cash_flow_margin_trend: Option<Trend>,
    pub free_cash_flow_margin_ttm: Option<f64>,

    // Cost ratios
    pub sga_ratio_ttm: Option<f64>,
    pub sga_short_term_trend: Option<Trend>,
    pub sga_long_term_trend: Option<Trend>,
    pub rnd_ratio_ttm: Option<f64>,
    pub rnd_short_term_trend: Option<Trend>,
    pub rnd_long_term_trend: Option<Trend>,
    pub interest_expense_ratio_ttm: Option<f64>,

    // Banks
    pub net_interest_margin_ttm: Option<f64>,
    pub net_interest_margin_short_term_trend: Option<Trend>,
    pub net_interest_margin_long_term_trend: Option<Trend>,
    pub cost_of_risk_ttm: Option<f64>,
    pub cost_of_risk_short_term_trend: Option<Trend>,
    pub cost_of_risk_long_term_trend: Option<Trend>,

    // Shares
    pub shares_outstanding_diluted_ttm: Option<f64>,
    pub shares_change_ttm: Option<f64>,
    pub shares_change_multi_year: Option<f64>,
    pub shares_change_trend: Option<Trend>,

    // Nominal amounts
    pub retained_earnings_ttm: Option<f64>,
    pub retained_earnings_trend: Option<Trend>,
    pub net_cash_ttm: Option<f64>,
    pub has_healthy_net_cash: Option<bool>,
    pub net_cash_trend: Option<Trend>,
    pub operating_cash_flow_ttm: Option<f64>,
    pub free_cash_flow_ttm: Option<f64>,

    // Prices
    pub latest_price: Option<f64>,
    pub price_current_revenue_growth: Option<f64>,
    pub price_multi_year_revenue_growth: Option<f64>,
    pub price_current_gp_growth: Option<f64>,
    pub price_multi_year_gp_growth: Option<f64>,
    pub price_next_year_revenue_growth: Option<f64>,
}

impl Metrics {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    /// Ticker as shown to users
    pub fn display_ticker(&self) -> String {
        self.ticker.to_uppercase()
    }
}
