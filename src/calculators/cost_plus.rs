use crate::domain::model::{Metric, Summarize};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative, validate_positive, Validate};
use serde::{Deserialize, Serialize};

fn default_units() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostPlusInput {
    pub material_cost: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub markup_percentage: f64,
    #[serde(default = "default_units")]
    pub units: f64,
}

impl Validate for CostPlusInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("material_cost", self.material_cost)?;
        validate_non_negative("labor_cost", self.labor_cost)?;
        validate_non_negative("overhead_cost", self.overhead_cost)?;
        validate_non_negative("markup_percentage", self.markup_percentage)?;
        validate_positive("units", self.units)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostPlusResult {
    pub unit_cost: f64,
    pub selling_price: f64,
    pub profit_per_unit: f64,
    pub margin_percentage: Option<f64>,
    pub total_revenue: f64,
    pub total_profit: f64,
}

pub fn calculate_cost_plus(input: &CostPlusInput) -> CostPlusResult {
    let unit_cost = input.material_cost + input.labor_cost + input.overhead_cost;
    let selling_price = unit_cost * (1.0 + input.markup_percentage / 100.0);
    let profit_per_unit = selling_price - unit_cost;

    CostPlusResult {
        unit_cost,
        selling_price,
        profit_per_unit,
        margin_percentage: (selling_price != 0.0).then(|| profit_per_unit / selling_price * 100.0),
        total_revenue: selling_price * input.units,
        total_profit: profit_per_unit * input.units,
    }
}

/// Markup on cost expressed as margin on price.
pub fn markup_to_margin(markup: f64) -> Option<f64> {
    let denominator = 100.0 + markup;
    (denominator != 0.0).then(|| markup / denominator * 100.0)
}

/// Margin on price expressed as markup on cost.
pub fn margin_to_markup(margin: f64) -> Option<f64> {
    let denominator = 100.0 - margin;
    (denominator != 0.0).then(|| margin / denominator * 100.0)
}

impl Summarize for CostPlusResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("unit_cost", "Unit cost", self.unit_cost),
            Metric::currency("selling_price", "Selling price", self.selling_price),
            Metric::currency("profit_per_unit", "Profit per unit", self.profit_per_unit),
            Metric::percent("margin_percentage", "Margin", self.margin_percentage),
            Metric::currency("total_revenue", "Total revenue", self.total_revenue),
            Metric::currency("total_profit", "Total profit", self.total_profit),
        ]
    }
}
