use crate::calculators::CalculatorInput;
use crate::domain::model::ScenarioOutcome;
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};

/// A named calculator run, as listed under `[[scenarios]]` in a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(flatten)]
    pub input: CalculatorInput,
}

impl Scenario {
    pub fn new(name: impl Into<String>, input: CalculatorInput) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }

    pub fn evaluate(&self) -> Result<ScenarioOutcome> {
        self.input.evaluate(&self.name)
    }
}

impl Validate for Scenario {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("scenarios.name", &self.name)?;
        self.input.validate().map_err(|e| match e {
            PricingError::InvalidInput { field, value, reason } => PricingError::InvalidInput {
                field: format!("{}.{}", self.name, field),
                value,
                reason,
            },
            other => other,
        })
    }
}
