use clap::{Parser, ValueEnum};
use pricing_calc::calculators::repricing::{
    recommend_price, Direction, ImpactWeights, Level, RepricingInput, RepricingResult, WeightKind,
};
use pricing_calc::utils::error::{PricingError, Result};
use pricing_calc::utils::{logger, validation::Validate};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Increasing,
    Stable,
    Decreasing,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Increasing => Direction::Increasing,
            DirectionArg::Stable => Direction::Stable,
            DirectionArg::Decreasing => Direction::Decreasing,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
    High,
    Medium,
    Low,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::High => Level::High,
            LevelArg::Medium => Level::Medium,
            LevelArg::Low => Level::Low,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "reprice")]
#[command(about = "Recommend a new price from sales, market and positioning signals")]
struct Args {
    /// Current price
    #[arg(long)]
    current_price: String,

    /// Historical prices, oldest first
    #[arg(long, value_delimiter = ',')]
    history: Vec<String>,

    /// Sales against plan, in percent (-50 to 50)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    sales_performance: f64,

    #[arg(long, value_enum, default_value = "stable")]
    competitor_prices: DirectionArg,

    #[arg(long, value_enum, default_value = "stable")]
    market_demand: DirectionArg,

    #[arg(long, value_enum, default_value = "medium")]
    uniqueness: LevelArg,

    /// Customer perception score (0 to 100, 50 is neutral)
    #[arg(long, default_value = "50")]
    perception: f64,

    #[arg(long)]
    sales_weight: Option<f64>,

    #[arg(long)]
    market_weight: Option<f64>,

    #[arg(long)]
    positioning_weight: Option<f64>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// One weight flag is rebalanced against the defaults. Two flags are kept
    /// and the third weight takes the remainder. Three are taken as given.
    fn weights(&self) -> Result<ImpactWeights> {
        let given = [
            (WeightKind::Sales, self.sales_weight),
            (WeightKind::Market, self.market_weight),
            (WeightKind::Positioning, self.positioning_weight),
        ];
        let set: Vec<(WeightKind, f64)> = given
            .into_iter()
            .filter_map(|(kind, value)| value.map(|v| (kind, v)))
            .collect();

        match set.as_slice() {
            [] => Ok(ImpactWeights::default()),
            [(kind, value)] => Ok(ImpactWeights::default().rebalanced(*kind, *value)),
            [(_, a), (_, b)] => {
                let remainder = 100.0 - a - b;
                if remainder < 0.0 {
                    return Err(PricingError::invalid_input(
                        "weights",
                        a + b,
                        "Two weights cannot add up to more than 100",
                    ));
                }
                Ok(ImpactWeights {
                    sales: self.sales_weight.unwrap_or(remainder),
                    market: self.market_weight.unwrap_or(remainder),
                    positioning: self.positioning_weight.unwrap_or(remainder),
                })
            }
            _ => Ok(ImpactWeights {
                sales: self.sales_weight.unwrap_or_default(),
                market: self.market_weight.unwrap_or_default(),
                positioning: self.positioning_weight.unwrap_or_default(),
            }),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let weights = match args.weights() {
        Ok(weights) => weights,
        Err(e) => {
            tracing::error!("❌ Invalid weights: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let input = RepricingInput {
        current_price: args.current_price.clone(),
        price_history: args.history.clone(),
        sales_performance: args.sales_performance,
        competitor_prices: args.competitor_prices.into(),
        market_demand: args.market_demand.into(),
        uniqueness: args.uniqueness.into(),
        perception: args.perception,
        weights,
    };
    tracing::debug!("Repricing input: {:?}", input);

    if let Err(e) = input.validate() {
        tracing::error!("❌ Invalid input: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let result = recommend_price(&input);
    if result == RepricingResult::zero() {
        tracing::warn!("Current price '{}' is not a number", input.current_price);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, &input.weights);
    }

    Ok(())
}

fn print_result(result: &RepricingResult, weights: &ImpactWeights) {
    println!("💰 Repricing Recommendation:");
    println!("  Current price:      {:.2}", result.base_price);
    println!("  Recommended price:  {:.2} ({:?})", result.recommended_price, result.action);
    println!(
        "  Range:              {:.2} - {:.2}",
        result.price_range.low, result.price_range.high
    );
    println!("  Total impact:       {:+.2}%", result.total_impact);
    println!("  Confidence:         {:?}", result.confidence);
    println!();
    println!("📊 Contributions:");
    println!(
        "  Sales        {:+6.2} x {:>5.1}% = {:+.2}",
        result.impacts.sales, weights.sales, result.weighted_impacts.sales
    );
    println!(
        "  Market       {:+6.2} x {:>5.1}% = {:+.2}",
        result.impacts.market, weights.market, result.weighted_impacts.market
    );
    println!(
        "  Positioning  {:+6.2} x {:>5.1}% = {:+.2}",
        result.impacts.positioning, weights.positioning, result.weighted_impacts.positioning
    );
    println!();
    println!(
        "📈 Trend {:+.2}% per period, volatility {:.2}",
        result.trend.trend, result.trend.volatility
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["reprice", "--current-price", "100"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_single_weight_is_rebalanced() {
        let weights = args(&["--sales-weight", "60"]).weights().unwrap();
        assert_eq!(weights.sales, 60.0);
        assert!((weights.market - 40.0 * 35.0 / 60.0).abs() < 1e-9);
        assert!((weights.positioning - 40.0 * 25.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_weights_are_kept_and_third_takes_remainder() {
        let weights = args(&["--sales-weight", "50", "--market-weight", "30"])
            .weights()
            .unwrap();
        assert_eq!(
            weights,
            ImpactWeights {
                sales: 50.0,
                market: 30.0,
                positioning: 20.0
            }
        );

        assert!(args(&["--sales-weight", "70", "--positioning-weight", "40"])
            .weights()
            .is_err());
    }

    #[test]
    fn test_three_weights_are_taken_as_given() {
        let weights = args(&[
            "--sales-weight",
            "20",
            "--market-weight",
            "30",
            "--positioning-weight",
            "50",
        ])
        .weights()
        .unwrap();
        assert_eq!(weights.sales, 20.0);
        assert_eq!(weights.market, 30.0);
        assert_eq!(weights.positioning, 50.0);
        assert!(weights.validate().is_ok());
    }
}
