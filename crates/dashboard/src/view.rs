//! Plain-text views of a metrics snapshot: the ticker report, the metric
//! cards it is built from, and the screener table.

use metrics_core::format::{
    classify_trend, format_amount, format_percent, format_price, format_ratio, format_trend,
    price_symbol, MISSING,
};
use metrics_core::{Metrics, Polarity, Sentiment, Trend};
use narrative::{dilution_flag, interest_burden_flag, NarrativeEngine, PriceTargets, Valuation};

use crate::state::SearchState;

/// A labelled trend next to a card's headline value
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub label: &'static str,
    pub value: String,
    pub sentiment: Sentiment,
}

impl Indicator {
    fn trend(label: &'static str, trend: Option<Trend>, polarity: Polarity) -> Self {
        Self {
            label,
            value: format_trend(trend),
            sentiment: classify_trend(trend, polarity),
        }
    }

    fn growth(label: &'static str, value: Option<f64>) -> Self {
        Self {
            label,
            value: format_percent(value),
            sentiment: Sentiment::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub indicators: Vec<Indicator>,
    /// Headline value crossed a red-flag threshold
    pub flagged: bool,
}

impl MetricCard {
    fn new(title: &'static str, value: String) -> Self {
        Self {
            title,
            value,
            indicators: Vec::new(),
            flagged: false,
        }
    }

    fn with(mut self, indicator: Indicator) -> Self {
        self.indicators.push(indicator);
        self
    }

    fn flagged(mut self, flagged: bool) -> Self {
        self.flagged = flagged;
        self
    }

    fn render(&self) -> String {
        let marker = if self.flagged { "!" } else { " " };
        let mut line = format!("{} {:<30} {:>12}", marker, self.title, self.value);
        for indicator in &self.indicators {
            line.push_str(&format!(
                "   {}: {} [{}]",
                indicator.label,
                indicator.value,
                indicator.sentiment.marker()
            ));
        }
        line.trim_end().to_string()
    }
}

/// Cards for the earnings section, in display order
pub fn earnings_cards(m: &Metrics) -> Vec<MetricCard> {
    use Polarity::{FavorableDown, FavorableUp};

    vec![
        MetricCard::new("Revenue (TTM)", format_amount(m.currency.as_deref(), m.revenue_ttm))
            .with(Indicator::growth("YoY", m.revenue_growth_yoy_ttm))
            .with(Indicator::growth("4yr", m.revenue_growth_multi_year)),
        MetricCard::new("Gross Margin (TTM)", format_percent(m.gross_margin_ttm))
            .with(Indicator::trend("Short Term", m.gross_margin_short_term_trend, FavorableUp))
            .with(Indicator::trend("Long Term", m.gross_margin_long_term_trend, FavorableUp)),
        MetricCard::new("Operating Margin (TTM)", format_percent(m.operating_margin_ttm))
            .with(Indicator::trend("Short Term", m.operating_margin_short_term_trend, FavorableUp))
            .with(Indicator::trend("Long Term", m.operating_margin_long_term_trend, FavorableUp)),
        MetricCard::new("SGA Ratio (TTM)", format_ratio(m.sga_ratio_ttm))
            .with(Indicator::trend("Short Term", m.sga_short_term_trend, FavorableDown))
            .with(Indicator::trend("Long Term", m.sga_long_term_trend, FavorableDown)),
        MetricCard::new("R&D Ratio (TTM)", format_ratio(m.rnd_ratio_ttm))
            .with(Indicator::trend("Short Term", m.rnd_short_term_trend, FavorableDown))
            .with(Indicator::trend("Long Term", m.rnd_long_term_trend, FavorableDown)),
        MetricCard::new("OCF Margin (TTM)", format_percent(m.operating_cash_flow_margin_ttm))
            .with(Indicator::trend("Trend", m.operating_cash_flow_margin_trend, FavorableUp)),
        MetricCard::new("Net Interest Margin (TTM)", format_percent(m.net_interest_margin_ttm))
            .with(Indicator::trend("Short Term", m.net_interest_margin_short_term_trend, FavorableUp))
            .with(Indicator::trend("Long Term", m.net_interest_margin_long_term_trend, FavorableUp)),
        MetricCard::new("Cost of Risk (TTM)", format_percent(m.cost_of_risk_ttm))
            .with(Indicator::trend("Short Term", m.cost_of_risk_short_term_trend, FavorableDown))
            .with(Indicator::trend("Long Term", m.cost_of_risk_long_term_trend, FavorableDown)),
        MetricCard::new("Interest Expense Ratio (TTM)", format_ratio(m.interest_expense_ratio_ttm))
            .flagged(interest_burden_flag(m.interest_expense_ratio_ttm)),
        MetricCard::new("Share Count Change", format_percent(m.shares_change_ttm))
            .with(Indicator::trend("Trend", m.shares_change_trend, FavorableDown))
            .flagged(dilution_flag(m.shares_change_ttm)),
        MetricCard::new("Net Margin (TTM)", format_percent(m.net_margin_ttm)),
        MetricCard::new("Theoretical Net Margin", format_percent(m.theoretical_net_margin)),
    ]
}

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

pub fn render_report(m: &Metrics, engine: &NarrativeEngine) -> String {
    let glyph = price_symbol(m.exchange.as_ref(), m.currency.as_deref());
    let targets = PriceTargets::from_metrics(m);
    let lowest = targets.lowest();
    let valuation = Valuation::assess(lowest, m.latest_price);
    let narrative = engine.evaluate(m);

    let mut out = format!(
        "{}  {}\n\n",
        m.display_ticker(),
        or_missing(m.company_name.as_deref())
    );

    out.push_str("Basic Information\n");
    out.push_str(&format!("  Industry: {}\n", or_missing(m.industry.as_deref())));
    out.push_str(&format!(
        "  Next Earnings Date: {}\n",
        m.next_earnings_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| MISSING.to_string())
    ));
    out.push_str(&format!(
        "  Revenue (TTM): {}\n",
        format_amount(m.currency.as_deref(), m.revenue_ttm)
    ));
    out.push_str(&format!(
        "  Revenue Growth YoY (TTM): {}\n",
        format_percent(m.revenue_growth_yoy_ttm)
    ));
    out.push_str(&format!(
        "  Gross Profit Growth YoY (TTM): {}\n",
        format_percent(m.gross_profit_growth_yoy_ttm)
    ));
    out.push_str(&format!(
        "  Revenue Growth YoY 4yr Average: {}\n\n",
        format_percent(m.revenue_growth_multi_year)
    ));

    out.push_str(&format!(
        "Current Stock Price: {} vs {} [{}] {}\n\n",
        format_price(&glyph, m.latest_price),
        format_price(&glyph, lowest),
        valuation.sentiment().marker(),
        valuation.to_label()
    ));

    out.push_str("Price Target\n");
    for target in &targets.targets {
        out.push_str(&format!(
            "  Using {} ({}): {}\n",
            target.label,
            format_percent(target.growth_rate),
            format_price(&glyph, target.price)
        ));
    }
    out.push('\n');

    out.push_str("Earnings\n");
    for card in earnings_cards(m) {
        out.push_str(&format!("{}\n", card.render()));
    }
    out.push('\n');

    out.push_str("Reasons to buy\n");
    for reason in narrative.favorable() {
        out.push_str(&format!("  - {}\n", reason));
    }
    out.push_str("Reasons to avoid\n");
    for reason in narrative.unfavorable() {
        out.push_str(&format!("  - {}\n", reason));
    }

    out
}

fn trend_cell(trend: Option<Trend>, polarity: Polarity) -> String {
    format!(
        "{}{}",
        classify_trend(trend, polarity).marker(),
        format_trend(trend)
    )
}

/// One row per company, trends classified with the polarity of their metric
pub fn render_screener(all: &[Metrics]) -> String {
    use Polarity::{FavorableDown, FavorableUp};

    let headers = [
        "Ticker", "Company Name", "Rev Growth", "Gross Mgn", "Op Mgn", "Net Mgn", "GM Short",
        "GM Long", "SGA Short", "SGA Long", "R&D Short", "R&D Long", "OM Short", "OM Long",
    ];
    let mut out = String::from("Screener\n");
    out.push_str(&headers.map(|h| format!("{:<12}", h)).join("").trim_end().to_string());
    out.push('\n');

    for m in all {
        let cells = [
            m.display_ticker(),
            or_missing(m.company_name.as_deref()).to_string(),
            format_percent(m.revenue_growth_yoy_ttm),
            format_percent(m.gross_margin_ttm),
            format_percent(m.operating_margin_ttm),
            format_percent(m.net_margin_ttm),
            trend_cell(m.gross_margin_short_term_trend, FavorableUp),
            trend_cell(m.gross_margin_long_term_trend, FavorableUp),
            trend_cell(m.sga_short_term_trend, FavorableDown),
            trend_cell(m.sga_long_term_trend, FavorableDown),
            trend_cell(m.rnd_short_term_trend, FavorableDown),
            trend_cell(m.rnd_long_term_trend, FavorableDown),
            trend_cell(m.operating_margin_short_term_trend, FavorableUp),
            trend_cell(m.operating_margin_long_term_trend, FavorableUp),
        ];
        let row: String = cells.iter().map(|c| format!("{:<12}", c)).collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

pub fn render_state(state: &SearchState, engine: &NarrativeEngine) -> String {
    match state {
        SearchState::Idle => "Search a ticker to see its metrics.\n".to_string(),
        SearchState::Loading { ticker, .. } => format!("Loading {}...\n", ticker.to_uppercase()),
        SearchState::Succeeded { metrics, .. } => render_report(metrics, engine),
        SearchState::Failed { message, .. } => format!("{}\n", message),
    }
}
