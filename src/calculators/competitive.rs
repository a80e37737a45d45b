use crate::domain::model::{Metric, Summarize};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_positive, validate_range, Validate};
use serde::{Deserialize, Serialize};

const PREMIUM_INDEX: f64 = 110.0;
const DISCOUNT_INDEX: f64 = 90.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub price: f64,
    /// Perceived quality on a 1..=10 scale.
    #[serde(default)]
    pub quality: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitiveInput {
    pub our_price: f64,
    #[serde(default)]
    pub our_quality: Option<f64>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

impl Validate for CompetitiveInput {
    fn validate(&self) -> Result<()> {
        validate_positive("our_price", self.our_price)?;
        if let Some(quality) = self.our_quality {
            validate_range("our_quality", quality, 1.0, 10.0)?;
        }
        for competitor in &self.competitors {
            validate_non_empty_string("competitors.name", &competitor.name)?;
            validate_positive("competitors.price", competitor.price)?;
            if let Some(quality) = competitor.quality {
                validate_range("competitors.quality", quality, 1.0, 10.0)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    Premium,
    Parity,
    Discount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPrice {
    pub name: String,
    pub price: f64,
    pub value_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveResult {
    pub average_price: Option<f64>,
    pub median_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_index: Option<f64>,
    /// Share of competitors priced below us, in percent.
    pub percentile: Option<f64>,
    pub position: Option<MarketPosition>,
    pub our_value_score: Option<f64>,
    /// 1-based position of our price in the ascending price ladder.
    pub our_rank: usize,
    pub ladder: Vec<RankedPrice>,
}

pub const OUR_LABEL: &str = "us";

fn value_score(quality: Option<f64>, price: f64) -> Option<f64> {
    quality.filter(|_| price > 0.0).map(|q| q / price * 100.0)
}

fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

pub fn analyze_competition(input: &CompetitiveInput) -> CompetitiveResult {
    let mut prices: Vec<f64> = input.competitors.iter().map(|c| c.price).collect();
    prices.sort_by(f64::total_cmp);

    let count = prices.len();
    let average_price = (count > 0).then(|| prices.iter().sum::<f64>() / count as f64);
    let price_index = average_price
        .filter(|avg| *avg != 0.0)
        .map(|avg| input.our_price / avg * 100.0);

    let position = price_index.map(|index| {
        if index > PREMIUM_INDEX {
            MarketPosition::Premium
        } else if index < DISCOUNT_INDEX {
            MarketPosition::Discount
        } else {
            MarketPosition::Parity
        }
    });

    let cheaper = prices.iter().filter(|p| **p < input.our_price).count();
    let percentile = (count > 0).then(|| cheaper as f64 / count as f64 * 100.0);

    let mut ladder: Vec<RankedPrice> = input
        .competitors
        .iter()
        .map(|c| RankedPrice {
            name: c.name.clone(),
            price: c.price,
            value_score: value_score(c.quality, c.price),
        })
        .collect();
    let our_value_score = value_score(input.our_quality, input.our_price);
    ladder.push(RankedPrice {
        name: OUR_LABEL.to_string(),
        price: input.our_price,
        value_score: our_value_score,
    });
    // Stable sort keeps us after competitors at the same price.
    ladder.sort_by(|a, b| a.price.total_cmp(&b.price));

    let our_rank = ladder
        .iter()
        .position(|r| r.name == OUR_LABEL && r.price == input.our_price)
        .map_or(ladder.len(), |i| i + 1);

    CompetitiveResult {
        average_price,
        median_price: median(&prices),
        min_price: prices.first().copied(),
        max_price: prices.last().copied(),
        price_index,
        percentile,
        position,
        our_value_score,
        our_rank,
        ladder,
    }
}

impl Summarize for CompetitiveResult {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::currency("average_price", "Average competitor price", self.average_price),
            Metric::currency("median_price", "Median competitor price", self.median_price),
            Metric::currency("min_price", "Lowest competitor price", self.min_price),
            Metric::currency("max_price", "Highest competitor price", self.max_price),
            Metric::ratio("price_index", "Price index (100 = market average)", self.price_index),
            Metric::percent("percentile", "Competitors priced below us", self.percentile),
            Metric::ratio("our_value_score", "Value score", self.our_value_score),
            Metric::count("our_rank", "Rank by price", self.our_rank as f64),
        ]
    }
}
