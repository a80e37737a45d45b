//! Repricing recommendations.
//!
//! A recommendation blends three sub-scores, each expressed in percentage
//! points of price movement:
//!
//! * sales impact, from recent sales performance against plan;
//! * market impact, from competitor price and demand direction, scaled by the
//!   observed price trend and damped by its volatility;
//! * positioning impact, from product uniqueness and customer perception.
//!
//! Each sub-score is multiplied by its weight (percentages summing to 100) and
//! the weighted scores are added into `total_impact`. The recommended price is
//! the base price moved by `total_impact` percent, with a band around it whose
//! half-width grows with volatility.
//!
//! Nothing here fails: malformed prices are skipped and a non-numeric current
//! price produces [`RepricingResult::zero`].

use crate::domain::model::{Metric, Summarize};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Deserializer, Serialize};

const WEIGHT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increasing,
    Stable,
    Decreasing,
}

impl Direction {
    fn signal(self) -> f64 {
        match self {
            Direction::Increasing => 5.0,
            Direction::Stable => 0.0,
            Direction::Decreasing => -5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: f64,
    pub volatility: f64,
}

impl TrendAnalysis {
    pub fn flat() -> Self {
        Self {
            trend: 0.0,
            volatility: 0.0,
        }
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Mean and population standard deviation of the period-over-period
/// percentage changes in `history` followed by `current`.
pub fn analyze_price_trend<S: AsRef<str>>(history: &[S], current: &str) -> TrendAnalysis {
    let prices: Vec<f64> = history
        .iter()
        .map(|p| p.as_ref())
        .chain(std::iter::once(current))
        .filter_map(parse_price)
        .collect();

    if prices.len() < 2 {
        return TrendAnalysis::flat();
    }

    let changes: Vec<f64> = prices
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
        .collect();

    if changes.is_empty() {
        return TrendAnalysis::flat();
    }

    let count = changes.len() as f64;
    let trend = changes.iter().sum::<f64>() / count;
    let variance = changes.iter().map(|c| (c - trend).powi(2)).sum::<f64>() / count;

    TrendAnalysis {
        trend,
        volatility: variance.sqrt(),
    }
}

/// Piecewise score for sales performance against plan, in percent.
pub fn calculate_sales_impact(sales_performance: f64) -> f64 {
    if sales_performance > 30.0 {
        10.0
    } else if sales_performance < -30.0 {
        -10.0
    } else if sales_performance > 10.0 {
        5.0
    } else if sales_performance < -10.0 {
        -5.0
    } else {
        sales_performance / 10.0
    }
}

pub fn calculate_market_impact(
    competitor_prices: Direction,
    market_demand: Direction,
    trend: &TrendAnalysis,
) -> f64 {
    let mut impact = competitor_prices.signal() + market_demand.signal();

    if trend.trend.abs() > 2.0 {
        impact *= (1.0 + trend.trend / 5.0).clamp(0.0, 2.0);
    }

    if trend.volatility > 5.0 {
        let damping = ((trend.volatility - 5.0) / 10.0).min(0.5);
        impact *= 1.0 - damping;
    }

    impact
}

pub fn calculate_positioning_impact(uniqueness: Level, perception: f64, trend: &TrendAnalysis) -> f64 {
    let uniqueness_term = match uniqueness {
        Level::High => 5.0,
        Level::Medium => 0.0,
        Level::Low => -5.0,
    };
    let perception_term = (perception - 50.0) / 10.0;
    let impact = uniqueness_term + perception_term;

    if trend.trend == 0.0 || perception_term == 0.0 {
        return impact;
    }

    if trend.trend.signum() == perception_term.signum() {
        impact * 1.2
    } else {
        impact * 0.8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightKind {
    Sales,
    Market,
    Positioning,
}

/// Percentage weights of the three sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactWeights {
    pub sales: f64,
    pub market: f64,
    pub positioning: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            sales: 40.0,
            market: 35.0,
            positioning: 25.0,
        }
    }
}

impl ImpactWeights {
    pub fn total(&self) -> f64 {
        self.sales + self.market + self.positioning
    }

    pub fn get(&self, kind: WeightKind) -> f64 {
        match kind {
            WeightKind::Sales => self.sales,
            WeightKind::Market => self.market,
            WeightKind::Positioning => self.positioning,
        }
    }

    fn slot(&mut self, kind: WeightKind) -> &mut f64 {
        match kind {
            WeightKind::Sales => &mut self.sales,
            WeightKind::Market => &mut self.market,
            WeightKind::Positioning => &mut self.positioning,
        }
    }

    /// Sets one weight and spreads the remainder over the other two in
    /// proportion to their current values, keeping the total at 100.
    pub fn rebalance(&mut self, changed: WeightKind, value: f64) {
        let value = value.clamp(0.0, 100.0);
        let remaining = 100.0 - value;
        let others: Vec<WeightKind> = [WeightKind::Sales, WeightKind::Market, WeightKind::Positioning]
            .into_iter()
            .filter(|k| *k != changed)
            .collect();

        let other_total: f64 = others.iter().map(|k| self.get(*k)).sum();
        *self.slot(changed) = value;

        for kind in others {
            let share = if other_total > 0.0 {
                self.get(kind) / other_total
            } else {
                0.5
            };
            *self.slot(kind) = remaining * share;
        }
    }

    pub fn rebalanced(mut self, changed: WeightKind, value: f64) -> Self {
        self.rebalance(changed, value);
        self
    }
}

impl Validate for ImpactWeights {
    fn validate(&self) -> Result<()> {
        validate_range("weights.sales", self.sales, 0.0, 100.0)?;
        validate_range("weights.market", self.market, 0.0, 100.0)?;
        validate_range("weights.positioning", self.positioning, 0.0, 100.0)?;

        if (self.total() - 100.0).abs() > WEIGHT_TOLERANCE {
            return Err(PricingError::invalid_input(
                "weights",
                self.total(),
                "Weights must add up to 100",
            ));
        }
        Ok(())
    }
}

fn price_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<PriceText> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(PriceText::into_string).collect())
}

fn price_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    PriceText::deserialize(deserializer).map(PriceText::into_string)
}

/// Prices are kept as text so unparseable entries degrade instead of failing.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceText {
    Number(f64),
    Text(String),
}

impl PriceText {
    fn into_string(self) -> String {
        match self {
            PriceText::Number(n) => n.to_string(),
            PriceText::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepricingInput {
    #[serde(deserialize_with = "price_string")]
    pub current_price: String,
    #[serde(default, deserialize_with = "price_strings")]
    pub price_history: Vec<String>,
    /// Sales against plan in percent, conventionally -50..=50.
    pub sales_performance: f64,
    pub competitor_prices: Direction,
    pub market_demand: Direction,
    pub uniqueness: Level,
    /// Customer perception score, 0..=100 with 50 as neutral.
    pub perception: f64,
    #[serde(default)]
    pub weights: ImpactWeights,
}

impl Validate for RepricingInput {
    fn validate(&self) -> Result<()> {
        validate_range("sales_performance", self.sales_performance, -50.0, 50.0)?;
        validate_range("perception", self.perception, 0.0, 100.0)?;
        self.weights.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub sales: f64,
    pub market: f64,
    pub positioning: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceAction {
    Increase,
    Hold,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepricingResult {
    pub base_price: f64,
    pub recommended_price: f64,
    pub price_range: PriceRange,
    pub total_impact: f64,
    pub impacts: SubScores,
    pub weighted_impacts: SubScores,
    pub trend: TrendAnalysis,
    pub confidence: Confidence,
    pub action: PriceAction,
}

impl RepricingResult {
    pub fn zero() -> Self {
        let zeros = SubScores {
            sales: 0.0,
            market: 0.0,
            positioning: 0.0,
        };
        Self {
            base_price: 0.0,
            recommended_price: 0.0,
            price_range: PriceRange { low: 0.0, high: 0.0 },
            total_impact: 0.0,
            impacts: zeros,
            weighted_impacts: zeros,
            trend: TrendAnalysis::flat(),
            confidence: Confidence::Low,
            action: PriceAction::Hold,
        }
    }
}

fn confidence_for(volatility: f64) -> Confidence {
    if volatility < 2.0 {
        Confidence::High
    } else if volatility < 5.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub fn recommend_price(input: &RepricingInput) -> RepricingResult {
    let Some(base_price) = parse_price(&input.current_price) else {
        tracing::debug!("Current price {:?} is not numeric", input.current_price);
        return RepricingResult::zero();
    };

    let trend = analyze_price_trend(&input.price_history, &input.current_price);

    let impacts = SubScores {
        sales: calculate_sales_impact(input.sales_performance),
        market: calculate_market_impact(input.competitor_prices, input.market_demand, &trend),
        positioning: calculate_positioning_impact(input.uniqueness, input.perception, &trend),
    };

    let weights = &input.weights;
    let weighted_impacts = SubScores {
        sales: impacts.sales * weights.sales / 100.0,
        market: impacts.market * weights.market / 100.0,
        positioning: impacts.positioning * weights.positioning / 100.0,
    };

    let total_impact = weighted_impacts.sales + weighted_impacts.market + weighted_impacts.positioning;
    let half_width = 2.0 + trend.volatility / 4.0;

    let action = if total_impact.abs() < 0.5 {
        PriceAction::Hold
    } else if total_impact > 0.0 {
        PriceAction::Increase
    } else {
        PriceAction::Decrease
    };

    RepricingResult {
        base_price,
        recommended_price: base_price * (1.0 + total_impact / 100.0),
        price_range: PriceRange {
            low: base_price * (1.0 + (total_impact - half_width) / 100.0),
            high: base_price * (1.0 + (total_impact + half_width) / 100.0),
        },
        total_impact,
        impacts,
        weighted_impacts,
        trend,
        confidence: confidence_for(trend.volatility),
        action,
    }
}

impl Summarize for RepricingResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("base_price", "Current price", self.base_price),
            Metric::currency("recommended_price", "Recommended price", self.recommended_price),
            Metric::currency("price_range_low", "Range low", self.price_range.low),
            Metric::currency("price_range_high", "Range high", self.price_range.high),
            Metric::percent("total_impact", "Total impact", self.total_impact),
            Metric::percent("sales_impact", "Sales impact", self.impacts.sales),
            Metric::percent("market_impact", "Market impact", self.impacts.market),
            Metric::percent("positioning_impact", "Positioning impact", self.impacts.positioning),
            Metric::percent("trend", "Price trend", self.trend.trend),
            Metric::percent("volatility", "Price volatility", self.trend.volatility),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn base_input() -> RepricingInput {
        RepricingInput {
            current_price: "100".to_string(),
            price_history: vec![],
            sales_performance: 0.0,
            competitor_prices: Direction::Stable,
            market_demand: Direction::Stable,
            uniqueness: Level::Medium,
            perception: 50.0,
            weights: ImpactWeights::default(),
        }
    }

    #[test]
    fn test_trend_of_steady_growth() {
        let trend = analyze_price_trend(&["100", "110"], "121");
        assert!(approx(trend.trend, 10.0));
        assert!(approx(trend.volatility, 0.0));
    }

    #[test]
    fn test_trend_with_insufficient_data() {
        let empty: [&str; 0] = [];
        assert_eq!(analyze_price_trend(&empty, "100"), TrendAnalysis::flat());
        assert_eq!(analyze_price_trend(&["abc"], "100"), TrendAnalysis::flat());
    }

    #[test]
    fn test_trend_skips_malformed_entries() {
        let trend = analyze_price_trend(&["100", "n/a", " 110 "], "121");
        assert!(approx(trend.trend, 10.0));
    }

    #[test]
    fn test_volatility_is_population_std_dev() {
        // +10% then -10%: mean 0, deviations of 10.
        let trend = analyze_price_trend(&["100", "110"], "99");
        assert!(approx(trend.trend, 0.0));
        assert!(approx(trend.volatility, 10.0));
    }

    #[test]
    fn test_sales_impact_bands() {
        assert_eq!(calculate_sales_impact(35.0), 10.0);
        assert_eq!(calculate_sales_impact(-45.0), -10.0);
        assert_eq!(calculate_sales_impact(30.0), 5.0);
        assert_eq!(calculate_sales_impact(-12.0), -5.0);
        assert!(approx(calculate_sales_impact(5.0), 0.5));
        assert!(approx(calculate_sales_impact(-10.0), -1.0));
    }

    #[test]
    fn test_market_impact_signals_and_scaling() {
        let flat = TrendAnalysis::flat();
        assert_eq!(calculate_market_impact(Direction::Increasing, Direction::Increasing, &flat), 10.0);
        assert_eq!(calculate_market_impact(Direction::Decreasing, Direction::Stable, &flat), -5.0);

        let rising = TrendAnalysis { trend: 5.0, volatility: 0.0 };
        assert!(approx(
            calculate_market_impact(Direction::Increasing, Direction::Stable, &rising),
            10.0
        ));

        let steep = TrendAnalysis { trend: 20.0, volatility: 0.0 };
        assert!(approx(
            calculate_market_impact(Direction::Increasing, Direction::Stable, &steep),
            10.0
        ));

        let falling = TrendAnalysis { trend: -2.5, volatility: 0.0 };
        assert!(approx(
            calculate_market_impact(Direction::Increasing, Direction::Increasing, &falling),
            5.0
        ));

        let collapsing = TrendAnalysis { trend: -10.0, volatility: 0.0 };
        assert_eq!(
            calculate_market_impact(Direction::Increasing, Direction::Increasing, &collapsing),
            0.0
        );

        let noisy = TrendAnalysis { trend: 0.0, volatility: 30.0 };
        assert!(approx(
            calculate_market_impact(Direction::Increasing, Direction::Increasing, &noisy),
            5.0
        ));
    }

    #[test]
    fn test_positioning_alignment() {
        let up = TrendAnalysis { trend: 3.0, volatility: 0.0 };
        let down = TrendAnalysis { trend: -3.0, volatility: 0.0 };
        assert!(approx(calculate_positioning_impact(Level::High, 70.0, &up), 8.4));
        assert!(approx(calculate_positioning_impact(Level::High, 70.0, &down), 5.6));
        assert!(approx(
            calculate_positioning_impact(Level::Low, 50.0, &up),
            -5.0
        ));
    }

    #[test]
    fn test_rebalance_keeps_total_at_100() {
        let weights = ImpactWeights::default().rebalanced(WeightKind::Sales, 60.0);
        assert!(approx(weights.sales, 60.0));
        assert!(approx(weights.market, 40.0 * 35.0 / 60.0));
        assert!(approx(weights.positioning, 40.0 * 25.0 / 60.0));
        assert!(approx(weights.total(), 100.0));
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_rebalance_splits_evenly_when_others_are_zero() {
        let weights = ImpactWeights {
            sales: 100.0,
            market: 0.0,
            positioning: 0.0,
        }
        .rebalanced(WeightKind::Sales, 40.0);
        assert!(approx(weights.market, 30.0));
        assert!(approx(weights.positioning, 30.0));
    }

    #[test]
    fn test_rebalance_clamps_value() {
        let weights = ImpactWeights::default().rebalanced(WeightKind::Market, 150.0);
        assert!(approx(weights.market, 100.0));
        assert!(approx(weights.sales, 0.0));
        assert!(approx(weights.positioning, 0.0));
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let weights = ImpactWeights {
            sales: 50.0,
            market: 30.0,
            positioning: 30.0,
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_non_finite_inputs_are_rejected() {
        let mut input = base_input();
        input.sales_performance = f64::NAN;
        assert!(input.validate().is_err());

        let mut input = base_input();
        input.perception = f64::INFINITY;
        assert!(input.validate().is_err());

        let mut input = base_input();
        input.weights.sales = f64::NAN;
        assert!(input.validate().is_err());

        let parsed: RepricingInput = toml::from_str(
            r#"
current_price = "100"
sales_performance = nan
competitor_prices = "stable"
market_demand = "stable"
uniqueness = "medium"
perception = 50.0
"#,
        )
        .unwrap();
        assert!(matches!(
            parsed.validate(),
            Err(PricingError::InvalidInput { field, .. }) if field == "sales_performance"
        ));
    }

    #[test]
    fn test_recommendation_blends_weighted_scores() {
        let input = RepricingInput {
            sales_performance: 35.0,
            competitor_prices: Direction::Increasing,
            market_demand: Direction::Increasing,
            uniqueness: Level::High,
            perception: 50.0,
            ..base_input()
        };
        let result = recommend_price(&input);

        // 10 * 0.40 + 10 * 0.35 + 5 * 0.25
        assert!(approx(result.total_impact, 8.75));
        assert!(approx(result.recommended_price, 108.75));
        assert!(approx(result.price_range.low, 106.75));
        assert!(approx(result.price_range.high, 110.75));
        assert_eq!(result.action, PriceAction::Increase);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_range_widens_with_volatility() {
        let input = RepricingInput {
            price_history: vec!["100".into(), "110".into()],
            current_price: "99".into(),
            ..base_input()
        };
        let result = recommend_price(&input);
        // volatility 10 gives a half-width of 4.5 points around base 99.
        let spread = result.price_range.high - result.price_range.low;
        assert!(approx(spread, 99.0 * 9.0 / 100.0));
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_non_numeric_current_price_yields_zero() {
        let input = RepricingInput {
            current_price: "abc".into(),
            sales_performance: 40.0,
            ..base_input()
        };
        assert_eq!(recommend_price(&input), RepricingResult::zero());
    }

    #[test]
    fn test_input_from_toml_accepts_numbers_and_text() {
        let input: RepricingInput = toml::from_str(
            r#"
current_price = 121
price_history = ["100", 110.0]
sales_performance = 5.0
competitor_prices = "stable"
market_demand = "increasing"
uniqueness = "medium"
perception = 50.0
"#,
        )
        .unwrap();
        assert_eq!(input.price_history, vec!["100".to_string(), "110".to_string()]);
        assert_eq!(input.weights, ImpactWeights::default());
        let trend = analyze_price_trend(&input.price_history, &input.current_price);
        assert!(approx(trend.trend, 10.0));
    }
}
