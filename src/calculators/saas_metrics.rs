//! Subscription growth and efficiency metrics.
//!
//! Every ratio is `None` when its denominator is zero.

use crate::domain::model::{Metric, Summarize};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative, validate_percentage, Validate};
use serde::{Deserialize, Serialize};

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}

fn percent(numerator: f64, denominator: f64) -> Option<f64> {
    ratio(numerator, denominator).map(|r| r * 100.0)
}

// ---------------------------------------------------------------------------
// Churn
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnInput {
    pub starting_customers: f64,
    pub ending_customers: f64,
    #[serde(default)]
    pub new_customers: f64,
    pub starting_mrr: f64,
    pub churned_mrr: f64,
    #[serde(default)]
    pub expansion_mrr: f64,
}

impl Validate for ChurnInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("starting_customers", self.starting_customers)?;
        validate_non_negative("ending_customers", self.ending_customers)?;
        validate_non_negative("new_customers", self.new_customers)?;
        validate_non_negative("starting_mrr", self.starting_mrr)?;
        validate_non_negative("churned_mrr", self.churned_mrr)?;
        validate_non_negative("expansion_mrr", self.expansion_mrr)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnResult {
    pub churned_customers: f64,
    pub customer_churn_rate: Option<f64>,
    pub retention_rate: Option<f64>,
    pub revenue_churn_rate: Option<f64>,
    pub net_revenue_churn_rate: Option<f64>,
}

pub fn calculate_churn(input: &ChurnInput) -> ChurnResult {
    let churned_customers = input.starting_customers + input.new_customers - input.ending_customers;
    let customer_churn_rate = percent(churned_customers, input.starting_customers);

    ChurnResult {
        churned_customers,
        customer_churn_rate,
        retention_rate: customer_churn_rate.map(|rate| 100.0 - rate),
        revenue_churn_rate: percent(input.churned_mrr, input.starting_mrr),
        net_revenue_churn_rate: percent(input.churned_mrr - input.expansion_mrr, input.starting_mrr),
    }
}

impl Summarize for ChurnResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::count("churned_customers", "Churned customers", self.churned_customers),
            Metric::percent("customer_churn_rate", "Customer churn rate", self.customer_churn_rate),
            Metric::percent("retention_rate", "Customer retention rate", self.retention_rate),
            Metric::percent("revenue_churn_rate", "Revenue churn rate", self.revenue_churn_rate),
            Metric::percent(
                "net_revenue_churn_rate",
                "Net revenue churn rate",
                self.net_revenue_churn_rate,
            ),
        ]
    }
}

// ---------------------------------------------------------------------------
// Lifetime value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LtvInput {
    /// Average revenue per account, per month.
    pub arpa: f64,
    pub gross_margin: f64,
    /// Monthly churn rate in percent.
    pub churn_rate: f64,
    #[serde(default)]
    pub cac: Option<f64>,
}

impl Validate for LtvInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("arpa", self.arpa)?;
        validate_percentage("gross_margin", self.gross_margin)?;
        validate_percentage("churn_rate", self.churn_rate)?;
        if let Some(cac) = self.cac {
            validate_non_negative("cac", cac)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtvResult {
    pub monthly_gross_profit: f64,
    pub customer_lifetime_months: Option<f64>,
    pub ltv: Option<f64>,
    pub ltv_to_cac: Option<f64>,
}

pub fn calculate_ltv(input: &LtvInput) -> LtvResult {
    let monthly_gross_profit = input.arpa * input.gross_margin / 100.0;
    let ltv = ratio(monthly_gross_profit, input.churn_rate / 100.0);

    LtvResult {
        monthly_gross_profit,
        customer_lifetime_months: ratio(100.0, input.churn_rate),
        ltv,
        ltv_to_cac: ltv.zip(input.cac).and_then(|(ltv, cac)| ratio(ltv, cac)),
    }
}

impl Summarize for LtvResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("monthly_gross_profit", "Monthly gross profit", self.monthly_gross_profit),
            Metric::months(
                "customer_lifetime_months",
                "Customer lifetime",
                self.customer_lifetime_months,
            ),
            Metric::currency("ltv", "Lifetime value", self.ltv),
            Metric::ratio("ltv_to_cac", "LTV:CAC", self.ltv_to_cac),
        ]
    }
}

// ---------------------------------------------------------------------------
// Acquisition cost
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacInput {
    pub sales_marketing_spend: f64,
    pub new_customers: f64,
    pub arpa: f64,
    pub gross_margin: f64,
}

impl Validate for CacInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("sales_marketing_spend", self.sales_marketing_spend)?;
        validate_non_negative("new_customers", self.new_customers)?;
        validate_non_negative("arpa", self.arpa)?;
        validate_percentage("gross_margin", self.gross_margin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacResult {
    pub cac: Option<f64>,
    pub payback_months: Option<f64>,
}

pub fn calculate_cac(input: &CacInput) -> CacResult {
    let cac = ratio(input.sales_marketing_spend, input.new_customers);
    let monthly_gross_profit = input.arpa * input.gross_margin / 100.0;

    CacResult {
        cac,
        payback_months: cac.and_then(|cac| ratio(cac, monthly_gross_profit)),
    }
}

impl Summarize for CacResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("cac", "Customer acquisition cost", self.cac),
            Metric::months("payback_months", "CAC payback", self.payback_months),
        ]
    }
}

// ---------------------------------------------------------------------------
// Net revenue retention
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NrrInput {
    pub starting_mrr: f64,
    #[serde(default)]
    pub expansion_mrr: f64,
    #[serde(default)]
    pub contraction_mrr: f64,
    #[serde(default)]
    pub churned_mrr: f64,
}

impl Validate for NrrInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("starting_mrr", self.starting_mrr)?;
        validate_non_negative("expansion_mrr", self.expansion_mrr)?;
        validate_non_negative("contraction_mrr", self.contraction_mrr)?;
        validate_non_negative("churned_mrr", self.churned_mrr)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NrrResult {
    pub ending_mrr: f64,
    pub nrr: Option<f64>,
    pub grr: Option<f64>,
}

pub fn calculate_nrr(input: &NrrInput) -> NrrResult {
    let ending_mrr =
        input.starting_mrr + input.expansion_mrr - input.contraction_mrr - input.churned_mrr;
    let retained = input.starting_mrr - input.contraction_mrr - input.churned_mrr;

    NrrResult {
        ending_mrr,
        nrr: percent(ending_mrr, input.starting_mrr),
        grr: percent(retained, input.starting_mrr).map(|grr| grr.min(100.0)),
    }
}

impl Summarize for NrrResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("ending_mrr", "Ending MRR", self.ending_mrr),
            Metric::percent("nrr", "Net revenue retention", self.nrr),
            Metric::percent("grr", "Gross revenue retention", self.grr),
        ]
    }
}

// ---------------------------------------------------------------------------
// Quick ratio
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickRatioInput {
    pub new_mrr: f64,
    #[serde(default)]
    pub expansion_mrr: f64,
    #[serde(default)]
    pub churn_mrr: f64,
    #[serde(default)]
    pub contraction_mrr: f64,
}

impl Validate for QuickRatioInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("new_mrr", self.new_mrr)?;
        validate_non_negative("expansion_mrr", self.expansion_mrr)?;
        validate_non_negative("churn_mrr", self.churn_mrr)?;
        validate_non_negative("contraction_mrr", self.contraction_mrr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthHealth {
    Declining,
    Healthy,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickRatioResult {
    pub quick_ratio: Option<f64>,
    pub net_mrr: f64,
    /// `None` when there is no churn or contraction to compare against.
    pub health: Option<GrowthHealth>,
}

pub fn calculate_quick_ratio(input: &QuickRatioInput) -> QuickRatioResult {
    let gained = input.new_mrr + input.expansion_mrr;
    let lost = input.churn_mrr + input.contraction_mrr;
    let quick_ratio = ratio(gained, lost);

    QuickRatioResult {
        quick_ratio,
        net_mrr: gained - lost,
        health: quick_ratio.map(|q| {
            if q < 1.0 {
                GrowthHealth::Declining
            } else if q < 4.0 {
                GrowthHealth::Healthy
            } else {
                GrowthHealth::Excellent
            }
        }),
    }
}

impl Summarize for QuickRatioResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::ratio("quick_ratio", "Quick ratio", self.quick_ratio),
            Metric::currency("net_mrr", "Net new MRR", self.net_mrr),
        ]
    }
}

// ---------------------------------------------------------------------------
// Magic number
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagicNumberInput {
    pub current_quarter_revenue: f64,
    pub previous_quarter_revenue: f64,
    pub previous_quarter_sales_marketing_spend: f64,
}

impl Validate for MagicNumberInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("current_quarter_revenue", self.current_quarter_revenue)?;
        validate_non_negative("previous_quarter_revenue", self.previous_quarter_revenue)?;
        validate_non_negative(
            "previous_quarter_sales_marketing_spend",
            self.previous_quarter_sales_marketing_spend,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesEfficiency {
    Inefficient,
    Moderate,
    Efficient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicNumberResult {
    pub annualized_revenue_growth: f64,
    pub magic_number: Option<f64>,
    pub efficiency: Option<SalesEfficiency>,
}

pub fn calculate_magic_number(input: &MagicNumberInput) -> MagicNumberResult {
    let annualized_revenue_growth =
        (input.current_quarter_revenue - input.previous_quarter_revenue) * 4.0;
    let magic_number = ratio(
        annualized_revenue_growth,
        input.previous_quarter_sales_marketing_spend,
    );

    MagicNumberResult {
        annualized_revenue_growth,
        magic_number,
        efficiency: magic_number.map(|m| {
            if m < 0.5 {
                SalesEfficiency::Inefficient
            } else if m < 0.75 {
                SalesEfficiency::Moderate
            } else {
                SalesEfficiency::Efficient
            }
        }),
    }
}

impl Summarize for MagicNumberResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency(
                "annualized_revenue_growth",
                "Annualized revenue growth",
                self.annualized_revenue_growth,
            ),
            Metric::ratio("magic_number", "Magic number", self.magic_number),
        ]
    }
}

// ---------------------------------------------------------------------------
// Burn multiple
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnMultipleInput {
    pub net_burn: f64,
    pub net_new_arr: f64,
}

impl Validate for BurnMultipleInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("net_burn", self.net_burn)?;
        crate::utils::validation::validate_finite("net_new_arr", self.net_new_arr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnRating {
    Amazing,
    Great,
    Good,
    Suspect,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnMultipleResult {
    pub burn_multiple: Option<f64>,
    pub rating: Option<BurnRating>,
}

pub fn calculate_burn_multiple(input: &BurnMultipleInput) -> BurnMultipleResult {
    let burn_multiple = ratio(input.net_burn, input.net_new_arr);

    BurnMultipleResult {
        burn_multiple,
        rating: burn_multiple.map(|b| {
            if b < 0.0 {
                // Burning cash while ARR shrinks.
                BurnRating::Bad
            } else if b < 1.0 {
                BurnRating::Amazing
            } else if b < 1.5 {
                BurnRating::Great
            } else if b < 2.0 {
                BurnRating::Good
            } else if b < 3.0 {
                BurnRating::Suspect
            } else {
                BurnRating::Bad
            }
        }),
    }
}

impl Summarize for BurnMultipleResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![Metric::ratio("burn_multiple", "Burn multiple", self.burn_multiple)]
    }
}
