pub mod bundle;
pub mod competitive;
pub mod cost_plus;
pub mod discount;
pub mod elasticity;
pub mod margin;
pub mod market_sizing;
pub mod repricing;
pub mod saas_metrics;
pub mod usage;

use crate::domain::model::{ScenarioOutcome, Summarize};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

/// Input of any calculator, selected by the `calculator` tag in scenario files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorInput {
    CostPlus(cost_plus::CostPlusInput),
    Margin(margin::MarginInput),
    Bundle(bundle::BundleInput),
    Usage(usage::UsageInput),
    Discount(discount::DiscountScenario),
    Repricing(repricing::RepricingInput),
    Churn(saas_metrics::ChurnInput),
    Ltv(saas_metrics::LtvInput),
    Cac(saas_metrics::CacInput),
    Nrr(saas_metrics::NrrInput),
    QuickRatio(saas_metrics::QuickRatioInput),
    MagicNumber(saas_metrics::MagicNumberInput),
    BurnMultiple(saas_metrics::BurnMultipleInput),
    MarketSizing(market_sizing::MarketSizingInput),
    Competitive(competitive::CompetitiveInput),
    Elasticity(elasticity::ElasticityInput),
}

impl CalculatorInput {
    pub fn calculator_name(&self) -> &'static str {
        match self {
            CalculatorInput::CostPlus(_) => "cost_plus",
            CalculatorInput::Margin(_) => "margin",
            CalculatorInput::Bundle(_) => "bundle",
            CalculatorInput::Usage(_) => "usage",
            CalculatorInput::Discount(_) => "discount",
            CalculatorInput::Repricing(_) => "repricing",
            CalculatorInput::Churn(_) => "churn",
            CalculatorInput::Ltv(_) => "ltv",
            CalculatorInput::Cac(_) => "cac",
            CalculatorInput::Nrr(_) => "nrr",
            CalculatorInput::QuickRatio(_) => "quick_ratio",
            CalculatorInput::MagicNumber(_) => "magic_number",
            CalculatorInput::BurnMultiple(_) => "burn_multiple",
            CalculatorInput::MarketSizing(_) => "market_sizing",
            CalculatorInput::Competitive(_) => "competitive",
            CalculatorInput::Elasticity(_) => "elasticity",
        }
    }

    /// Runs the selected calculator and labels the outcome with `scenario`.
    pub fn evaluate(&self, scenario: &str) -> Result<ScenarioOutcome> {
        let (metrics, details) = match self {
            CalculatorInput::CostPlus(input) => summarize(&cost_plus::calculate_cost_plus(input))?,
            CalculatorInput::Margin(input) => summarize(&margin::calculate_margin(input))?,
            CalculatorInput::Bundle(input) => summarize(&bundle::calculate_bundle(input))?,
            CalculatorInput::Usage(input) => summarize(&usage::calculate_usage(input))?,
            CalculatorInput::Discount(input) => summarize(&discount::calculate_discount(input))?,
            CalculatorInput::Repricing(input) => summarize(&repricing::recommend_price(input))?,
            CalculatorInput::Churn(input) => summarize(&saas_metrics::calculate_churn(input))?,
            CalculatorInput::Ltv(input) => summarize(&saas_metrics::calculate_ltv(input))?,
            CalculatorInput::Cac(input) => summarize(&saas_metrics::calculate_cac(input))?,
            CalculatorInput::Nrr(input) => summarize(&saas_metrics::calculate_nrr(input))?,
            CalculatorInput::QuickRatio(input) => {
                summarize(&saas_metrics::calculate_quick_ratio(input))?
            }
            CalculatorInput::MagicNumber(input) => {
                summarize(&saas_metrics::calculate_magic_number(input))?
            }
            CalculatorInput::BurnMultiple(input) => {
                summarize(&saas_metrics::calculate_burn_multiple(input))?
            }
            CalculatorInput::MarketSizing(input) => {
                summarize(&market_sizing::calculate_market_size(input))?
            }
            CalculatorInput::Competitive(input) => {
                summarize(&competitive::analyze_competition(input))?
            }
            CalculatorInput::Elasticity(input) => {
                summarize(&elasticity::calculate_elasticity(input))?
            }
        };

        Ok(ScenarioOutcome {
            scenario: scenario.to_string(),
            calculator: self.calculator_name().to_string(),
            metrics,
            details,
        })
    }
}

fn summarize<R: Summarize + Serialize>(
    result: &R,
) -> Result<(Vec<crate::domain::model::Metric>, serde_json::Value)> {
    Ok((result.metrics(), serde_json::to_value(result)?))
}

impl Validate for CalculatorInput {
    fn validate(&self) -> Result<()> {
        match self {
            CalculatorInput::CostPlus(input) => input.validate(),
            CalculatorInput::Margin(input) => input.validate(),
            CalculatorInput::Bundle(input) => input.validate(),
            CalculatorInput::Usage(input) => input.validate(),
            CalculatorInput::Discount(input) => input.validate(),
            CalculatorInput::Repricing(input) => input.validate(),
            CalculatorInput::Churn(input) => input.validate(),
            CalculatorInput::Ltv(input) => input.validate(),
            CalculatorInput::Cac(input) => input.validate(),
            CalculatorInput::Nrr(input) => input.validate(),
            CalculatorInput::QuickRatio(input) => input.validate(),
            CalculatorInput::MagicNumber(input) => input.validate(),
            CalculatorInput::BurnMultiple(input) => input.validate(),
            CalculatorInput::MarketSizing(input) => input.validate(),
            CalculatorInput::Competitive(input) => input.validate(),
            CalculatorInput::Elasticity(input) => input.validate(),
        }
    }
}
