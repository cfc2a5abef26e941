use metrics_core::{Metrics, Sentiment};
use serde::{Deserialize, Serialize};

/// Minimum of the defined candidates. `Some(0.0)` counts as defined; NaN does not.
pub fn lowest_defined_target(candidates: &[Option<f64>]) -> Option<f64> {
    candidates
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(f64::min)
}

/// One growth-based projection of a fair share price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTarget {
    pub label: &'static str,
    /// Growth rate the projection assumes, in percent
    pub growth_rate: Option<f64>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTargets {
    pub targets: Vec<PriceTarget>,
}

impl PriceTargets {
    pub fn from_metrics(metrics: &Metrics) -> Self {
        let targets = vec![
            PriceTarget {
                label: "current revenue growth",
                growth_rate: metrics.revenue_growth_yoy_ttm,
                price: metrics.price_current_revenue_growth,
            },
            PriceTarget {
                label: "multi-year revenue growth",
                growth_rate: metrics.revenue_growth_multi_year,
                price: metrics.price_multi_year_revenue_growth,
            },
            PriceTarget {
                label: "current gross profit growth",
                growth_rate: metrics.gross_profit_growth_yoy_ttm,
                price: metrics.price_current_gp_growth,
            },
            PriceTarget {
                label: "multi-year gross profit growth",
                growth_rate: metrics.gross_profit_growth_multi_year,
                price: metrics.price_multi_year_gp_growth,
            },
            PriceTarget {
                label: "next year revenue growth forecast",
                growth_rate: metrics.revenue_growth_next_year,
                price: metrics.price_next_year_revenue_growth,
            },
        ];
        Self { targets }
    }

    /// The conservative target the current price is compared against
    pub fn lowest(&self) -> Option<f64> {
        let prices: Vec<Option<f64>> = self.targets.iter().map(|t| t.price).collect();
        lowest_defined_target(&prices)
    }
}

/// Current price measured against the conservative target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Valuation {
    Undervalued,
    Overvalued,
    Undetermined,
}

impl Valuation {
    pub fn assess(target: Option<f64>, price: Option<f64>) -> Self {
        match (target, price) {
            (Some(t), Some(p)) if t > p => Valuation::Undervalued,
            (Some(t), Some(p)) if t < p => Valuation::Overvalued,
            _ => Valuation::Undetermined,
        }
    }

    pub fn for_metrics(metrics: &Metrics) -> Self {
        Self::assess(
            PriceTargets::from_metrics(metrics).lowest(),
            metrics.latest_price,
        )
    }

    pub fn sentiment(&self) -> Sentiment {
        match self {
            Valuation::Undervalued => Sentiment::Positive,
            Valuation::Overvalued => Sentiment::Negative,
            Valuation::Undetermined => Sentiment::Neutral,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Valuation::Undervalued => "below target",
            Valuation::Overvalued => "above target",
            Valuation::Undetermined => "no comparison",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_of_nothing() {
        assert_eq!(lowest_defined_target(&[]), None);
        assert_eq!(lowest_defined_target(&[None, None]), None);
    }

    #[test]
    fn test_zero_is_defined() {
        assert_eq!(lowest_defined_target(&[Some(0.0), Some(5.0), None]), Some(0.0));
    }

    #[test]
    fn test_lowest_ignores_nan() {
        assert_eq!(
            lowest_defined_target(&[Some(f64::NAN), Some(12.5), Some(9.75)]),
            Some(9.75)
        );
    }

    #[test]
    fn test_targets_from_metrics() {
        let metrics = Metrics {
            latest_price: Some(150.0),
            price_current_revenue_growth: Some(170.0),
            price_multi_year_gp_growth: Some(140.0),
            price_next_year_revenue_growth: Some(210.0),
            revenue_growth_yoy_ttm: Some(8.2),
            ..Metrics::new("aapl")
        };

        let targets = PriceTargets::from_metrics(&metrics);
        assert_eq!(targets.targets.len(), 5);
        assert_eq!(targets.targets[0].growth_rate, Some(8.2));
        assert_eq!(targets.lowest(), Some(140.0));
        assert_eq!(Valuation::for_metrics(&metrics), Valuation::Overvalued);
    }

    #[test]
    fn test_valuation() {
        assert_eq!(Valuation::assess(Some(120.0), Some(100.0)), Valuation::Undervalued);
        assert_eq!(Valuation::assess(Some(80.0), Some(100.0)), Valuation::Overvalued);
        assert_eq!(Valuation::assess(Some(100.0), Some(100.0)), Valuation::Undetermined);
        assert_eq!(Valuation::assess(None, Some(100.0)), Valuation::Undetermined);
        assert_eq!(Valuation::assess(Some(0.0), Some(1.0)), Valuation::Overvalued);
        assert_eq!(Valuation::Undervalued.sentiment(), Sentiment::Positive);
    }
}
