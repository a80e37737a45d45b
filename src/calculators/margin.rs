use crate::domain::model::{Metric, Summarize};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginInput {
    pub revenue: f64,
    pub beginning_inventory: f64,
    pub purchases: f64,
    pub ending_inventory: f64,
    #[serde(default)]
    pub operating_expenses: f64,
}

impl Validate for MarginInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("revenue", self.revenue)?;
        validate_non_negative("beginning_inventory", self.beginning_inventory)?;
        validate_non_negative("purchases", self.purchases)?;
        validate_non_negative("ending_inventory", self.ending_inventory)?;
        validate_non_negative("operating_expenses", self.operating_expenses)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginResult {
    pub cogs: f64,
    pub gross_profit: f64,
    pub gross_margin: Option<f64>,
    pub operating_profit: f64,
    pub operating_margin: Option<f64>,
    pub markup_on_cogs: Option<f64>,
    pub inventory_turnover: Option<f64>,
}

fn percent_of(part: f64, whole: f64) -> Option<f64> {
    (whole != 0.0).then(|| part / whole * 100.0)
}

pub fn calculate_margin(input: &MarginInput) -> MarginResult {
    let cogs = input.beginning_inventory + input.purchases - input.ending_inventory;
    let gross_profit = input.revenue - cogs;
    let operating_profit = gross_profit - input.operating_expenses;
    let average_inventory = (input.beginning_inventory + input.ending_inventory) / 2.0;

    MarginResult {
        cogs,
        gross_profit,
        gross_margin: percent_of(gross_profit, input.revenue),
        operating_profit,
        operating_margin: percent_of(operating_profit, input.revenue),
        markup_on_cogs: percent_of(gross_profit, cogs),
        inventory_turnover: (average_inventory != 0.0).then(|| cogs / average_inventory),
    }
}

/// Revenue at which `total_costs` leaves a margin of `target_margin` percent.
pub fn required_revenue_for_margin(total_costs: f64, target_margin: f64) -> Option<f64> {
    (target_margin < 100.0).then(|| total_costs / (1.0 - target_margin / 100.0))
}

/// Margin, in percent, earned on `revenue` after `total_costs`.
pub fn margin_for_revenue(revenue: f64, total_costs: f64) -> Option<f64> {
    percent_of(revenue - total_costs, revenue)
}

impl Summarize for MarginResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("cogs", "Cost of goods sold", self.cogs),
            Metric::currency("gross_profit", "Gross profit", self.gross_profit),
            Metric::percent("gross_margin", "Gross margin", self.gross_margin),
            Metric::currency("operating_profit", "Operating profit", self.operating_profit),
            Metric::percent("operating_margin", "Operating margin", self.operating_margin),
            Metric::percent("markup_on_cogs", "Markup on COGS", self.markup_on_cogs),
            Metric::ratio("inventory_turnover", "Inventory turnover", self.inventory_turnover),
        ]
    }
}
