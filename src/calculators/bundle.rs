use crate::domain::model::{Metric, Summarize};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_non_negative, validate_percentage, Validate};
use serde::{Deserialize, Serialize};

fn default_quantity() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleItem {
    pub name: String,
    pub price: f64,
    pub cost: f64,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleInput {
    pub items: Vec<BundleItem>,
    pub bundle_discount_percentage: f64,
}

impl Validate for BundleInput {
    fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(PricingError::invalid_input(
                "items",
                "[]",
                "A bundle needs at least one item",
            ));
        }
        for item in &self.items {
            validate_non_empty_string("items.name", &item.name)?;
            validate_non_negative("items.price", item.price)?;
            validate_non_negative("items.cost", item.cost)?;
            validate_non_negative("items.quantity", item.quantity)?;
        }
        validate_percentage("bundle_discount_percentage", self.bundle_discount_percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleResult {
    pub individual_total: f64,
    pub bundle_price: f64,
    pub customer_savings: f64,
    pub total_cost: f64,
    pub bundle_profit: f64,
    pub bundle_margin: Option<f64>,
    pub individual_margin: Option<f64>,
    /// Bundle margin minus individual margin, in percentage points.
    pub margin_change: Option<f64>,
}

pub fn calculate_bundle(input: &BundleInput) -> BundleResult {
    let individual_total: f64 = input.items.iter().map(|i| i.price * i.quantity).sum();
    let total_cost: f64 = input.items.iter().map(|i| i.cost * i.quantity).sum();
    let bundle_price = individual_total * (1.0 - input.bundle_discount_percentage / 100.0);
    let bundle_profit = bundle_price - total_cost;

    let bundle_margin = (bundle_price != 0.0).then(|| bundle_profit / bundle_price * 100.0);
    let individual_margin =
        (individual_total != 0.0).then(|| (individual_total - total_cost) / individual_total * 100.0);

    BundleResult {
        individual_total,
        bundle_price,
        customer_savings: individual_total - bundle_price,
        total_cost,
        bundle_profit,
        bundle_margin,
        individual_margin,
        margin_change: bundle_margin.zip(individual_margin).map(|(b, i)| b - i),
    }
}

/// Lowest bundle price that still earns `target_margin` percent on the items' cost.
pub fn min_bundle_price_for_margin(items: &[BundleItem], target_margin: f64) -> Option<f64> {
    let total_cost: f64 = items.iter().map(|i| i.cost * i.quantity).sum();
    crate::calculators::margin::required_revenue_for_margin(total_cost, target_margin)
}

impl Summarize for BundleResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("individual_total", "Sum of individual prices", self.individual_total),
            Metric::currency("bundle_price", "Bundle price", self.bundle_price),
            Metric::currency("customer_savings", "Customer savings", self.customer_savings),
            Metric::currency("total_cost", "Total cost", self.total_cost),
            Metric::currency("bundle_profit", "Bundle profit", self.bundle_profit),
            Metric::percent("bundle_margin", "Bundle margin", self.bundle_margin),
            Metric::percent("individual_margin", "Individual margin", self.individual_margin),
            Metric::percent("margin_change", "Margin change (points)", self.margin_change),
        ]
    }
}
