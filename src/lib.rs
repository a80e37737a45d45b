pub mod calculators;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, ScenarioConfig};

pub use core::{engine::PricingEngine, pipeline::ScenarioPipeline};
pub use domain::scenario::Scenario;
pub use utils::error::{PricingError, Result};
