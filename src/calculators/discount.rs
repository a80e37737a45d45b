use crate::domain::model::{Metric, Summarize};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative, validate_percentage, validate_positive, Validate};
use serde::{Deserialize, Serialize};

/// Length of the period the expected sales figure is projected over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timespan {
    #[default]
    Month,
    Quarter,
    Year,
}

impl Timespan {
    pub fn multiplier(self) -> f64 {
        match self {
            Timespan::Month => 1.0,
            Timespan::Quarter => 3.0,
            Timespan::Year => 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountScenario {
    pub base_price: f64,
    pub discount_percentage: f64,
    /// Units sold per month at the discounted price.
    pub expected_sales: f64,
    pub cost_per_unit: f64,
    #[serde(default)]
    pub timespan: Timespan,
}

impl Validate for DiscountScenario {
    fn validate(&self) -> Result<()> {
        validate_positive("base_price", self.base_price)?;
        validate_percentage("discount_percentage", self.discount_percentage)?;
        validate_non_negative("expected_sales", self.expected_sales)?;
        validate_non_negative("cost_per_unit", self.cost_per_unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountResult {
    pub effective_price: f64,
    pub discount_amount: f64,
    pub revenue: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub profit_margin: Option<f64>,
    pub period_revenue: f64,
    pub period_profit: f64,
    /// Extra volume, in percent, needed to match the undiscounted profit.
    pub break_even_volume_increase: Option<f64>,
}

pub fn calculate_discount(scenario: &DiscountScenario) -> DiscountResult {
    let discount_amount = scenario.base_price * scenario.discount_percentage / 100.0;
    let effective_price = scenario.base_price - discount_amount;
    let revenue = effective_price * scenario.expected_sales;
    let total_cost = scenario.cost_per_unit * scenario.expected_sales;
    let profit = revenue - total_cost;

    let profit_margin = (revenue != 0.0).then(|| profit / revenue * 100.0);

    let full_unit_profit = scenario.base_price - scenario.cost_per_unit;
    let discounted_unit_profit = effective_price - scenario.cost_per_unit;
    let break_even_volume_increase = (discounted_unit_profit > 0.0)
        .then(|| (full_unit_profit / discounted_unit_profit - 1.0) * 100.0);

    let multiplier = scenario.timespan.multiplier();

    DiscountResult {
        effective_price,
        discount_amount,
        revenue,
        total_cost,
        profit,
        profit_margin,
        period_revenue: revenue * multiplier,
        period_profit: profit * multiplier,
        break_even_volume_increase,
    }
}

/// Indices of `scenarios` ordered from most to least profitable.
pub fn rank_scenarios(scenarios: &[DiscountScenario]) -> Vec<(usize, DiscountResult)> {
    let mut ranked: Vec<(usize, DiscountResult)> = scenarios
        .iter()
        .map(calculate_discount)
        .enumerate()
        .collect();
    ranked.sort_by(|a, b| b.1.period_profit.total_cmp(&a.1.period_profit));
    ranked
}

impl Summarize for DiscountResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("effective_price", "Effective price", self.effective_price),
            Metric::currency("discount_amount", "Discount per unit", self.discount_amount),
            Metric::currency("revenue", "Revenue", self.revenue),
            Metric::currency("total_cost", "Total cost", self.total_cost),
            Metric::currency("profit", "Profit", self.profit),
            Metric::percent("profit_margin", "Profit margin", self.profit_margin),
            Metric::currency("period_revenue", "Revenue over timespan", self.period_revenue),
            Metric::currency("period_profit", "Profit over timespan", self.period_profit),
            Metric::percent(
                "break_even_volume_increase",
                "Volume increase to break even",
                self.break_even_volume_increase,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(discount: f64) -> DiscountScenario {
        DiscountScenario {
            base_price: 100.0,
            discount_percentage: discount,
            expected_sales: 50.0,
            cost_per_unit: 40.0,
            timespan: Timespan::Month,
        }
    }

    #[test]
    fn test_twenty_percent_discount() {
        let result = calculate_discount(&scenario(20.0));
        assert_eq!(result.effective_price, 80.0);
        assert_eq!(result.revenue, 4000.0);
        assert_eq!(result.profit, 2000.0);
        assert_eq!(result.profit_margin, Some(50.0));
        assert_eq!(result.break_even_volume_increase, Some(50.0));
    }

    #[test]
    fn test_timespan_multiplies_totals() {
        let mut s = scenario(20.0);
        s.timespan = Timespan::Quarter;
        let result = calculate_discount(&s);
        assert_eq!(result.revenue, 4000.0);
        assert_eq!(result.period_revenue, 12000.0);
        assert_eq!(result.period_profit, 6000.0);
    }

    #[test]
    fn test_full_discount_has_no_margin() {
        let result = calculate_discount(&scenario(100.0));
        assert_eq!(result.revenue, 0.0);
        assert_eq!(result.profit_margin, None);
        assert_eq!(result.break_even_volume_increase, None);
    }

    #[test]
    fn test_out_of_range_discount_is_rejected() {
        assert!(scenario(120.0).validate().is_err());
        assert!(scenario(-5.0).validate().is_err());
        assert!(scenario(15.0).validate().is_ok());

        let mut free = scenario(10.0);
        free.base_price = 0.0;
        assert!(free.validate().is_err());
    }

    #[test]
    fn test_rank_scenarios_by_profit() {
        let scenarios = vec![scenario(50.0), scenario(10.0), scenario(20.0)];
        let order: Vec<usize> = rank_scenarios(&scenarios).into_iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }
}
