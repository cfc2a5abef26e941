pub mod price_target;

pub use price_target::{lowest_defined_target, PriceTarget, PriceTargets, Valuation};

use metrics_core::{Metrics, Sentiment, Trend};
use serde::Serialize;

/// Interest expense ratios below this are a burden
pub const INTEREST_EXPENSE_RATIO_FLOOR: f64 = -0.15;
/// Share count growth (percent, TTM) at or above this is dilution
pub const DILUTION_CEILING: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Favorable,
    Unfavorable,
}

/// A single predicate over a metrics snapshot. Returns `None` when the
/// data is missing or falls in the inconclusive zone.
pub struct Rule {
    pub name: &'static str,
    pub favorable: &'static str,
    pub unfavorable: &'static str,
    evaluate: fn(&Metrics) -> Option<Verdict>,
}

impl Rule {
    pub fn evaluate(&self, metrics: &Metrics) -> Option<Finding> {
        (self.evaluate)(metrics).map(|verdict| Finding {
            rule: self.name,
            verdict,
            statement: match verdict {
                Verdict::Favorable => self.favorable,
                Verdict::Unfavorable => self.unfavorable,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub rule: &'static str,
    pub verdict: Verdict,
    pub statement: &'static str,
}

/// Reasons to buy and reasons to avoid, in rule order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Narrative {
    pub findings: Vec<Finding>,
}

impl Narrative {
    pub fn favorable(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.with_verdict(Verdict::Favorable)
    }

    pub fn unfavorable(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.with_verdict(Verdict::Unfavorable)
    }

    fn with_verdict(&self, verdict: Verdict) -> impl Iterator<Item = &'static str> + '_ {
        self.findings
            .iter()
            .filter(move |f| f.verdict == verdict)
            .map(|f| f.statement)
    }

    pub fn sentiment(&self) -> Sentiment {
        let pros = self.favorable().count();
        let cons = self.unfavorable().count();
        match pros.cmp(&cons) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

fn gross_margin_trend(m: &Metrics) -> Option<Verdict> {
    let short = m.gross_margin_short_term_trend;
    let long = m.gross_margin_long_term_trend;
    if short == Some(Trend::Downtrend) || long == Some(Trend::Downtrend) {
        Some(Verdict::Unfavorable)
    } else if short == Some(Trend::Uptrend) && long == Some(Trend::Uptrend) {
        Some(Verdict::Favorable)
    } else {
        None
    }
}

/// Long-term trend of a metric where falling is good
fn falling_is_good(trend: Option<Trend>) -> Option<Verdict> {
    match trend {
        Some(Trend::Downtrend) => Some(Verdict::Favorable),
        Some(Trend::Uptrend) => Some(Verdict::Unfavorable),
        _ => None,
    }
}

fn sga_trend(m: &Metrics) -> Option<Verdict> {
    falling_is_good(m.sga_long_term_trend)
}

fn rnd_trend(m: &Metrics) -> Option<Verdict> {
    falling_is_good(m.rnd_long_term_trend)
}

fn operating_margin_trend(m: &Metrics) -> Option<Verdict> {
    match m.operating_margin_long_term_trend {
        Some(Trend::Uptrend) => Some(Verdict::Favorable),
        Some(Trend::Downtrend) => Some(Verdict::Unfavorable),
        _ => None,
    }
}

fn interest_expense(m: &Metrics) -> Option<Verdict> {
    let ratio = m.interest_expense_ratio_ttm.filter(|r| !r.is_nan())?;
    if ratio >= INTEREST_EXPENSE_RATIO_FLOOR {
        Some(Verdict::Favorable)
    } else {
        Some(Verdict::Unfavorable)
    }
}

fn share_dilution(m: &Metrics) -> Option<Verdict> {
    let change = m.shares_change_ttm?;
    if change <= 0.0 {
        Some(Verdict::Favorable)
    } else if change >= DILUTION_CEILING {
        Some(Verdict::Unfavorable)
    } else {
        None
    }
}

fn retained_earnings(m: &Metrics) -> Option<Verdict> {
    let earnings = m.retained_earnings_ttm?;
    if earnings > 0.0 {
        Some(Verdict::Favorable)
    } else if earnings < 0.0 {
        Some(Verdict::Unfavorable)
    } else {
        None
    }
}

fn net_cash(m: &Metrics) -> Option<Verdict> {
    m.has_healthy_net_cash.map(|healthy| {
        if healthy {
            Verdict::Favorable
        } else {
            Verdict::Unfavorable
        }
    })
}

static RULES: [Rule; 8] = [
    Rule {
        name: "gross_margin_trend",
        favorable: "Gross margin is improving.",
        unfavorable: "Gross margin is not improving.",
        evaluate: gross_margin_trend,
    },
    Rule {
        name: "sga_ratio_trend",
        favorable: "Customer acquisition effort is shrinking.",
        unfavorable: "Customer acquisition effort is expanding.",
        evaluate: sga_trend,
    },
    Rule {
        name: "rnd_ratio_trend",
        favorable: "R&D cost required is not high.",
        unfavorable: "The company is expanding R&D to survive.",
        evaluate: rnd_trend,
    },
    Rule {
        name: "operating_margin_trend",
        favorable: "The company has higher operating leverage.",
        unfavorable: "The company has lower operating leverage.",
        evaluate: operating_margin_trend,
    },
    Rule {
        name: "interest_expense_ratio",
        favorable: "Interest expense is low.",
        unfavorable: "Interest expense is high.",
        evaluate: interest_expense,
    },
    Rule {
        name: "share_count_change",
        favorable: "Share is not diluted.",
        unfavorable: "Share is excessively diluted.",
        evaluate: share_dilution,
    },
    Rule {
        name: "retained_earnings",
        favorable: "The company has excess money to use for share buybacks and dividends.",
        unfavorable: "The company doesn't have room for share buybacks and dividends.",
        evaluate: retained_earnings,
    },
    Rule {
        name: "net_cash",
        favorable: "Net cash position is healthy.",
        unfavorable: "Net cash position is not healthy.",
        evaluate: net_cash,
    },
];

/// Highlight for the interest expense card; same threshold as the narrative rule
pub fn interest_burden_flag(ratio: Option<f64>) -> bool {
    matches!(ratio, Some(r) if r < INTEREST_EXPENSE_RATIO_FLOOR)
}

/// Highlight for the share count card; same threshold as the narrative rule
pub fn dilution_flag(change: Option<f64>) -> bool {
    matches!(change, Some(c) if c >= DILUTION_CEILING)
}

pub struct NarrativeEngine {
    rules: &'static [Rule],
}

impl NarrativeEngine {
    pub fn new() -> Self {
        Self { rules: &RULES }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    pub fn evaluate(&self, metrics: &Metrics) -> Narrative {
        let findings: Vec<Finding> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(metrics))
            .collect();

        tracing::debug!(
            ticker = %metrics.ticker,
            favorable = findings.iter().filter(|f| f.verdict == Verdict::Favorable).count(),
            unfavorable = findings.iter().filter(|f| f.verdict == Verdict::Unfavorable).count(),
            "Narrative evaluated"
        );

        Narrative { findings }
    }
}

impl Default for NarrativeEngine {
    fn default() -> Self {
        Self::new()
    }
}
