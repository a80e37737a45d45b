//! Usage-based pricing: bills a set of metered line items, each under its own
//! charge model.
//!
//! Tiered charges are graduated (each band is billed at its own rate), while
//! volume charges bill every unit at the rate of the band the total usage
//! lands in.

use crate::domain::model::{Metric, Summarize};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_non_negative, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Inclusive upper bound of the band; `None` for the open-ended last band.
    #[serde(default)]
    pub up_to: Option<f64>,
    pub unit_price: f64,
    #[serde(default)]
    pub flat_fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ChargeModel {
    Flat {
        fee: f64,
    },
    PerUnit {
        unit_price: f64,
        #[serde(default)]
        included_units: f64,
    },
    Tiered {
        tiers: Vec<Tier>,
    },
    Volume {
        tiers: Vec<Tier>,
    },
}

impl ChargeModel {
    pub fn name(&self) -> &'static str {
        match self {
            ChargeModel::Flat { .. } => "flat",
            ChargeModel::PerUnit { .. } => "per_unit",
            ChargeModel::Tiered { .. } => "tiered",
            ChargeModel::Volume { .. } => "volume",
        }
    }

    pub fn charge(&self, usage: f64) -> f64 {
        match self {
            ChargeModel::Flat { fee } => *fee,
            ChargeModel::PerUnit {
                unit_price,
                included_units,
            } => (usage - included_units).max(0.0) * unit_price,
            ChargeModel::Tiered { tiers } => graduated_charge(tiers, usage),
            ChargeModel::Volume { tiers } => volume_charge(tiers, usage),
        }
    }
}

fn graduated_charge(tiers: &[Tier], usage: f64) -> f64 {
    let mut lower = 0.0;
    let mut total = 0.0;

    for tier in tiers {
        if usage <= lower {
            break;
        }
        let upper = tier.up_to.map_or(usage, |bound| bound.min(usage));
        total += (upper - lower) * tier.unit_price + tier.flat_fee;
        match tier.up_to {
            Some(bound) => lower = bound,
            None => break,
        }
    }

    total
}

fn volume_charge(tiers: &[Tier], usage: f64) -> f64 {
    tiers
        .iter()
        .find(|tier| tier.up_to.map_or(true, |bound| usage <= bound))
        .or_else(|| tiers.last())
        .map_or(0.0, |tier| usage * tier.unit_price + tier.flat_fee)
}

fn validate_tiers(field: &str, tiers: &[Tier]) -> Result<()> {
    if tiers.is_empty() {
        return Err(PricingError::invalid_input(field, "[]", "At least one tier is required"));
    }

    let mut previous: Option<f64> = None;
    for (index, tier) in tiers.iter().enumerate() {
        validate_non_negative(field, tier.unit_price)?;
        validate_non_negative(field, tier.flat_fee)?;

        match tier.up_to {
            None if index + 1 != tiers.len() => {
                return Err(PricingError::invalid_input(
                    field,
                    index,
                    "Only the last tier may be unbounded",
                ));
            }
            Some(bound) if previous.is_some_and(|p| bound <= p) => {
                return Err(PricingError::invalid_input(
                    field,
                    bound,
                    "Tier bounds must be strictly ascending",
                ));
            }
            Some(bound) => previous = Some(bound),
            None => {}
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLineItem {
    pub name: String,
    pub charge_model: ChargeModel,
    #[serde(default)]
    pub usage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageInput {
    pub line_items: Vec<UsageLineItem>,
}

impl Validate for UsageInput {
    fn validate(&self) -> Result<()> {
        if self.line_items.is_empty() {
            return Err(PricingError::invalid_input(
                "line_items",
                "[]",
                "At least one line item is required",
            ));
        }

        for item in &self.line_items {
            validate_non_empty_string("line_items.name", &item.name)?;
            validate_non_negative("line_items.usage", item.usage)?;
            match &item.charge_model {
                ChargeModel::Flat { fee } => validate_non_negative("charge_model.fee", *fee)?,
                ChargeModel::PerUnit {
                    unit_price,
                    included_units,
                } => {
                    validate_non_negative("charge_model.unit_price", *unit_price)?;
                    validate_non_negative("charge_model.included_units", *included_units)?;
                }
                ChargeModel::Tiered { tiers } | ChargeModel::Volume { tiers } => {
                    validate_tiers("charge_model.tiers", tiers)?
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCharge {
    pub name: String,
    pub model: String,
    pub usage: f64,
    pub charge: f64,
    pub effective_unit_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageResult {
    pub lines: Vec<LineCharge>,
    pub total_charge: f64,
    pub total_usage: f64,
    pub blended_unit_price: Option<f64>,
    pub charge_by_model: BTreeMap<String, f64>,
}

pub fn calculate_usage(input: &UsageInput) -> UsageResult {
    let lines: Vec<LineCharge> = input
        .line_items
        .iter()
        .map(|item| {
            let charge = item.charge_model.charge(item.usage);
            LineCharge {
                name: item.name.clone(),
                model: item.charge_model.name().to_string(),
                usage: item.usage,
                charge,
                effective_unit_price: (item.usage > 0.0).then(|| charge / item.usage),
            }
        })
        .collect();

    let mut charge_by_model = BTreeMap::new();
    for line in &lines {
        *charge_by_model.entry(line.model.clone()).or_insert(0.0) += line.charge;
    }

    let total_charge: f64 = lines.iter().map(|l| l.charge).sum();
    let total_usage: f64 = lines.iter().map(|l| l.usage).sum();

    UsageResult {
        lines,
        total_charge,
        total_usage,
        blended_unit_price: (total_usage > 0.0).then(|| total_charge / total_usage),
        charge_by_model,
    }
}

impl Summarize for UsageResult {
    fn metrics(&self) -> Vec<Metric> {
        let mut metrics = vec![
            Metric::currency("total_charge", "Total charge", self.total_charge),
            Metric::count("total_usage", "Total usage", self.total_usage),
            Metric::currency("blended_unit_price", "Blended unit price", self.blended_unit_price),
        ];
        for line in &self.lines {
            metrics.push(Metric::currency(
                &format!("charge.{}", line.name),
                &format!("{} ({})", line.name, line.model),
                line.charge,
            ));
        }
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> Vec<Tier> {
        vec![
            Tier {
                up_to: Some(100.0),
                unit_price: 1.0,
                flat_fee: 0.0,
            },
            Tier {
                up_to: Some(1000.0),
                unit_price: 0.5,
                flat_fee: 0.0,
            },
            Tier {
                up_to: None,
                unit_price: 0.25,
                flat_fee: 0.0,
            },
        ]
    }

    #[test]
    fn test_graduated_tiers() {
        let model = ChargeModel::Tiered { tiers: tiers() };
        assert_eq!(model.charge(50.0), 50.0);
        assert_eq!(model.charge(300.0), 100.0 + 100.0);
        assert_eq!(model.charge(1200.0), 100.0 + 450.0 + 50.0);
        assert_eq!(model.charge(0.0), 0.0);
    }

    #[test]
    fn test_volume_tiers() {
        let model = ChargeModel::Volume { tiers: tiers() };
        assert_eq!(model.charge(50.0), 50.0);
        assert_eq!(model.charge(300.0), 150.0);
        assert_eq!(model.charge(1200.0), 300.0);
    }

    #[test]
    fn test_per_unit_with_allowance() {
        let model = ChargeModel::PerUnit {
            unit_price: 0.1,
            included_units: 1000.0,
        };
        assert_eq!(model.charge(500.0), 0.0);
        assert!((model.charge(1500.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_and_breakdown() {
        let input = UsageInput {
            line_items: vec![
                UsageLineItem {
                    name: "platform".to_string(),
                    charge_model: ChargeModel::Flat { fee: 99.0 },
                    usage: 0.0,
                },
                UsageLineItem {
                    name: "api_calls".to_string(),
                    charge_model: ChargeModel::Tiered { tiers: tiers() },
                    usage: 300.0,
                },
            ],
        };
        assert!(input.validate().is_ok());

        let result = calculate_usage(&input);
        assert_eq!(result.total_charge, 299.0);
        assert_eq!(result.total_usage, 300.0);
        assert_eq!(result.charge_by_model.get("flat"), Some(&99.0));
        assert_eq!(result.lines[0].effective_unit_price, None);
        assert_eq!(result.lines[1].effective_unit_price, Some(200.0 / 300.0));
    }

    #[test]
    fn test_unbounded_tier_must_be_last() {
        let mut bad = tiers();
        bad.swap(1, 2);
        let input = UsageInput {
            line_items: vec![UsageLineItem {
                name: "storage".to_string(),
                charge_model: ChargeModel::Volume { tiers: bad },
                usage: 10.0,
            }],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_charge_model_from_toml() {
        let item: UsageLineItem = toml::from_str(
            r#"
name = "seats"
usage = 12.0

[charge_model]
model = "per_unit"
unit_price = 8.0
"#,
        )
        .unwrap();
        assert_eq!(item.charge_model.charge(item.usage), 96.0);
    }
}
