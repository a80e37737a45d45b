use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "pricing-calc")]
#[command(about = "Run pricing scenarios and write the results as CSV, TSV or JSON")]
pub struct CliConfig {
    /// Path to the TOML scenario file
    #[arg(short, long, default_value = "pricing.toml")]
    pub config: String,

    /// Override the output directory from the scenario file
    #[arg(long)]
    pub output_path: Option<String>,

    /// Override the output formats from the scenario file
    #[arg(long, value_delimiter = ',')]
    pub formats: Option<Vec<String>>,

    /// Zip all outputs into a single archive
    #[arg(long)]
    pub compress: bool,

    /// Validate the scenarios and print the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
