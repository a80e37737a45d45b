use clap::Parser;
use pricing_calc::calculators::discount::rank_scenarios;
use pricing_calc::calculators::CalculatorInput;
use pricing_calc::utils::{logger, validation::Validate};
use pricing_calc::{CliConfig, LocalStorage, PricingEngine, ScenarioConfig, ScenarioPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.json_logs);

    tracing::info!("🚀 Starting pricing-calc");
    tracing::info!("📁 Loading scenarios from: {}", cli.config);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match ScenarioConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load scenario file '{}': {}", cli.config, e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    config.apply_cli_overrides(&cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Scenario validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Scenario file loaded and validated successfully");
    display_summary(&config, &cli);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        perform_dry_run(&config);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output.output_path.clone());
    let pipeline = ScenarioPipeline::new(storage, config);
    let engine = PricingEngine::new(pipeline);

    match engine.run().await {
        Ok(written) => {
            tracing::info!("✅ Pricing run completed successfully!");
            println!("✅ Pricing run completed successfully!");
            for path in written {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Pricing run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_summary(config: &ScenarioConfig, cli: &CliConfig) {
    println!("📋 Report Summary:");
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Scenarios: {}", config.scenarios.len());
    println!("  Output: {}", config.output.output_path);
    println!("  Formats: {}", config.output.output_formats.join(", "));
    println!("  Compressed: {}", config.output.compress);

    if cli.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &ScenarioConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    for scenario in &config.scenarios {
        let detail = match &scenario.input {
            CalculatorInput::Repricing(input) => format!(
                "current price {}, {} historical prices",
                input.current_price,
                input.price_history.len()
            ),
            CalculatorInput::Bundle(input) => format!("{} items", input.items.len()),
            CalculatorInput::Usage(input) => format!("{} line items", input.line_items.len()),
            CalculatorInput::Competitive(input) => {
                format!("{} competitors", input.competitors.len())
            }
            _ => String::new(),
        };

        if detail.is_empty() {
            println!("  • {} [{}]", scenario.name, scenario.input.calculator_name());
        } else {
            println!(
                "  • {} [{}] - {}",
                scenario.name,
                scenario.input.calculator_name(),
                detail
            );
        }
    }

    let (names, discounts): (Vec<&str>, Vec<_>) = config
        .scenarios
        .iter()
        .filter_map(|s| match &s.input {
            CalculatorInput::Discount(input) => Some((s.name.as_str(), input.clone())),
            _ => None,
        })
        .unzip();
    if discounts.len() > 1 {
        println!();
        println!("🏷️  Discount scenarios by profit over timespan:");
        for (rank, (index, result)) in rank_scenarios(&discounts).into_iter().enumerate() {
            println!("  {}. {} - {:.2}", rank + 1, names[index], result.period_profit);
        }
    }

    println!();
    let stem = config.file_stem();
    if config.output.compress {
        println!("💾 Would write: {}/{}.zip", config.output.output_path, stem);
    } else {
        for format in &config.output.output_formats {
            println!("💾 Would write: {}/{}.{}", config.output.output_path, stem, format);
        }
    }

    println!();
    println!("✅ Dry run analysis complete.");
}
