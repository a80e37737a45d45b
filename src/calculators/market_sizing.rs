use crate::domain::model::{Metric, Summarize};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative, validate_percentage, Validate};
use serde::{Deserialize, Serialize};

/// Top-down sizing starts from the whole market; bottom-up starts from the
/// customers the business can realistically win.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "approach", rename_all = "snake_case")]
pub enum MarketSizingInput {
    TopDown {
        total_customers: f64,
        annual_value_per_customer: f64,
        serviceable_percentage: f64,
        obtainable_percentage: f64,
    },
    BottomUp {
        target_customers: f64,
        price: f64,
        purchases_per_year: f64,
        serviceable_percentage: f64,
        obtainable_percentage: f64,
    },
}

impl Validate for MarketSizingInput {
    fn validate(&self) -> Result<()> {
        match self {
            MarketSizingInput::TopDown {
                total_customers,
                annual_value_per_customer,
                serviceable_percentage,
                obtainable_percentage,
            } => {
                validate_non_negative("total_customers", *total_customers)?;
                validate_non_negative("annual_value_per_customer", *annual_value_per_customer)?;
                validate_percentage("serviceable_percentage", *serviceable_percentage)?;
                validate_percentage("obtainable_percentage", *obtainable_percentage)
            }
            MarketSizingInput::BottomUp {
                target_customers,
                price,
                purchases_per_year,
                serviceable_percentage,
                obtainable_percentage,
            } => {
                validate_non_negative("target_customers", *target_customers)?;
                validate_non_negative("price", *price)?;
                validate_non_negative("purchases_per_year", *purchases_per_year)?;
                validate_percentage("serviceable_percentage", *serviceable_percentage)?;
                validate_percentage("obtainable_percentage", *obtainable_percentage)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSizingResult {
    pub tam: Option<f64>,
    pub sam: Option<f64>,
    pub som: f64,
}

pub fn calculate_market_size(input: &MarketSizingInput) -> MarketSizingResult {
    match *input {
        MarketSizingInput::TopDown {
            total_customers,
            annual_value_per_customer,
            serviceable_percentage,
            obtainable_percentage,
        } => {
            let tam = total_customers * annual_value_per_customer;
            let sam = tam * serviceable_percentage / 100.0;
            MarketSizingResult {
                tam: Some(tam),
                sam: Some(sam),
                som: sam * obtainable_percentage / 100.0,
            }
        }
        MarketSizingInput::BottomUp {
            target_customers,
            price,
            purchases_per_year,
            serviceable_percentage,
            obtainable_percentage,
        } => {
            let som = target_customers * price * purchases_per_year;
            let sam = (obtainable_percentage != 0.0).then(|| som / (obtainable_percentage / 100.0));
            let tam = sam.and_then(|sam| {
                (serviceable_percentage != 0.0).then(|| sam / (serviceable_percentage / 100.0))
            });
            MarketSizingResult { tam, sam, som }
        }
    }
}

impl Summarize for MarketSizingResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("tam", "Total addressable market", self.tam),
            Metric::currency("sam", "Serviceable addressable market", self.sam),
            Metric::currency("som", "Serviceable obtainable market", self.som),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_top_down() {
        let result = calculate_market_size(&MarketSizingInput::TopDown {
            total_customers: 1_000_000.0,
            annual_value_per_customer: 1_200.0,
            serviceable_percentage: 25.0,
            obtainable_percentage: 10.0,
        });
        assert_eq!(result.tam, Some(1_200_000_000.0));
        assert!(approx(result.sam.unwrap(), 300_000_000.0));
        assert!(approx(result.som, 30_000_000.0));
    }

    #[test]
    fn test_bottom_up_derives_wider_markets() {
        let result = calculate_market_size(&MarketSizingInput::BottomUp {
            target_customers: 500.0,
            price: 100.0,
            purchases_per_year: 12.0,
            serviceable_percentage: 20.0,
            obtainable_percentage: 5.0,
        });
        assert_eq!(result.som, 600_000.0);
        assert!(approx(result.sam.unwrap(), 12_000_000.0));
        assert!(approx(result.tam.unwrap(), 60_000_000.0));
    }

    #[test]
    fn test_bottom_up_without_share_leaves_tam_unknown() {
        let result = calculate_market_size(&MarketSizingInput::BottomUp {
            target_customers: 10.0,
            price: 10.0,
            purchases_per_year: 1.0,
            serviceable_percentage: 20.0,
            obtainable_percentage: 0.0,
        });
        assert_eq!(result.sam, None);
        assert_eq!(result.tam, None);
    }

    #[test]
    fn test_percentages_are_validated() {
        let input = MarketSizingInput::TopDown {
            total_customers: 10.0,
            annual_value_per_customer: 10.0,
            serviceable_percentage: 140.0,
            obtainable_percentage: 10.0,
        };
        assert!(input.validate().is_err());
    }
}
