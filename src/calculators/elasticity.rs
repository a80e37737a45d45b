use crate::domain::model::{Metric, Summarize};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative, validate_positive, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticityInput {
    pub initial_price: f64,
    pub new_price: f64,
    pub initial_quantity: f64,
    pub new_quantity: f64,
}

impl Validate for ElasticityInput {
    fn validate(&self) -> Result<()> {
        validate_positive("initial_price", self.initial_price)?;
        validate_positive("new_price", self.new_price)?;
        validate_non_negative("initial_quantity", self.initial_quantity)?;
        validate_non_negative("new_quantity", self.new_quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElasticityClass {
    Elastic,
    Unitary,
    Inelastic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticityResult {
    /// Midpoint (arc) elasticity of demand.
    pub elasticity: Option<f64>,
    pub classification: Option<ElasticityClass>,
    pub initial_revenue: f64,
    pub new_revenue: f64,
    pub revenue_change: f64,
    pub revenue_change_percentage: Option<f64>,
}

fn midpoint_change(from: f64, to: f64) -> Option<f64> {
    let midpoint = (from + to) / 2.0;
    (midpoint != 0.0).then(|| (to - from) / midpoint)
}

pub fn calculate_elasticity(input: &ElasticityInput) -> ElasticityResult {
    let price_change = midpoint_change(input.initial_price, input.new_price).filter(|c| *c != 0.0);
    let quantity_change = midpoint_change(input.initial_quantity, input.new_quantity);

    let elasticity = price_change
        .zip(quantity_change)
        .map(|(price, quantity)| quantity / price);

    let classification = elasticity.map(|e| {
        let magnitude = e.abs();
        if (magnitude - 1.0).abs() < 1e-9 {
            ElasticityClass::Unitary
        } else if magnitude > 1.0 {
            ElasticityClass::Elastic
        } else {
            ElasticityClass::Inelastic
        }
    });

    let initial_revenue = input.initial_price * input.initial_quantity;
    let new_revenue = input.new_price * input.new_quantity;
    let revenue_change = new_revenue - initial_revenue;

    ElasticityResult {
        elasticity,
        classification,
        initial_revenue,
        new_revenue,
        revenue_change,
        revenue_change_percentage: (initial_revenue != 0.0)
            .then(|| revenue_change / initial_revenue * 100.0),
    }
}

impl Summarize for ElasticityResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::ratio("elasticity", "Price elasticity", self.elasticity),
            Metric::currency("initial_revenue", "Revenue before", self.initial_revenue),
            Metric::currency("new_revenue", "Revenue after", self.new_revenue),
            Metric::currency("revenue_change", "Revenue change", self.revenue_change),
            Metric::percent(
                "revenue_change_percentage",
                "Revenue change",
                self.revenue_change_percentage,
            ),
        ]
    }
}
