use crate::domain::ports::ConfigProvider;
use crate::domain::scenario::Scenario;
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_output_formats, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub report: ReportConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    #[serde(default)]
    pub compress: bool,
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            compress: false,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

impl ScenarioConfig {
    /// Loads and parses a scenario file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("report.name", &self.report.name)?;
        validate_path("output.output_path", &self.output.output_path)?;
        validate_output_formats("output.output_formats", &self.output.output_formats, &OUTPUT_FORMATS)?;

        if self.scenarios.is_empty() {
            return Err(PricingError::ConfigError {
                message: "The scenario file does not define any [[scenarios]]".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if !seen.insert(scenario.name.as_str()) {
                return Err(PricingError::ConfigError {
                    message: format!("Scenario name '{}' is used more than once", scenario.name),
                });
            }
            scenario.validate()?;
        }

        Ok(())
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli_overrides(&mut self, cli: &crate::config::CliConfig) {
        if let Some(path) = &cli.output_path {
            tracing::info!("🔧 Output path overridden to: {}", path);
            self.output.output_path = path.clone();
        }
        if let Some(formats) = &cli.formats {
            tracing::info!("🔧 Output formats overridden to: {}", formats.join(", "));
            self.output.output_formats = formats.clone();
        }
        if cli.compress {
            self.output.compress = true;
        }
    }

    /// Stem used for every output file, derived from the report name.
    pub fn file_stem(&self) -> String {
        crate::core::report::file_stem(&self.report.name)
    }
}

impl ConfigProvider for ScenarioConfig {
    fn report_name(&self) -> &str {
        &self.report.name
    }

    fn description(&self) -> Option<&str> {
        self.report.description.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.output_formats
    }

    fn compress(&self) -> bool {
        self.output.compress
    }

    fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
