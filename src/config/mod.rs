#[cfg(feature = "cli")]
pub mod cli;
pub mod scenario_config;
pub mod storage;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use scenario_config::ScenarioConfig;
pub use storage::LocalStorage;
