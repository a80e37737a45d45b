use crate::core::report::{file_stem, render_delimited, render_json};
use crate::domain::model::CalculationReport;
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::domain::scenario::Scenario;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub struct ScenarioPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ScenarioPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn outputs(&self, report: &CalculationReport) -> Result<Vec<(String, Vec<u8>)>> {
        let stem = file_stem(self.config.report_name());
        let mut files = Vec::new();

        for format in self.config.output_formats() {
            let data = match format.as_str() {
                "csv" => report.csv_output.clone().into_bytes(),
                "tsv" => report.tsv_output.clone().into_bytes(),
                "json" => render_json(report)?.into_bytes(),
                other => {
                    tracing::warn!("Skipping unsupported output format: {}", other);
                    continue;
                }
            };
            files.push((format!("{}.{}", stem, format), data));
        }

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ScenarioPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Scenario>> {
        let scenarios = self.config.scenarios().to_vec();
        for scenario in &scenarios {
            tracing::debug!(
                "Validating scenario '{}' ({})",
                scenario.name,
                scenario.input.calculator_name()
            );
            scenario.validate()?;
        }
        Ok(scenarios)
    }

    async fn transform(&self, scenarios: Vec<Scenario>) -> Result<CalculationReport> {
        let mut outcomes = Vec::with_capacity(scenarios.len());

        for scenario in &scenarios {
            let outcome = scenario.evaluate()?;
            let undefined = outcome.metrics.iter().filter(|m| m.value.is_none()).count();
            if undefined > 0 {
                tracing::warn!(
                    "Scenario '{}' has {} undefined metric(s) (zero denominator)",
                    scenario.name,
                    undefined
                );
            }
            tracing::debug!("Scenario '{}' produced {} metrics", scenario.name, outcome.metrics.len());
            outcomes.push(outcome);
        }

        Ok(CalculationReport {
            name: self.config.report_name().to_string(),
            description: self.config.description().map(str::to_string),
            generated_at: chrono::Utc::now().to_rfc3339(),
            csv_output: render_delimited(&outcomes, b',')?,
            tsv_output: render_delimited(&outcomes, b'\t')?,
            outcomes,
        })
    }

    async fn load(&self, report: CalculationReport) -> Result<Vec<String>> {
        let files = self.outputs(&report)?;
        let base = self.config.output_path().trim_end_matches('/');

        if !self.config.compress() {
            let mut written = Vec::with_capacity(files.len());
            for (name, data) in files {
                tracing::debug!("Writing {} ({} bytes)", name, data.len());
                self.storage.write_file(&name, &data).await?;
                written.push(format!("{}/{}", base, name));
            }
            return Ok(written);
        }

        let archive_name = format!("{}.zip", file_stem(self.config.report_name()));
        tracing::debug!("Creating ZIP file with {} files", files.len());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&archive_name, &zip_data).await?;
        Ok(vec![format!("{}/{}", base, archive_name)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::saas_metrics::QuickRatioInput;
    use crate::calculators::CalculatorInput;
    use crate::utils::error::PricingError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                PricingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        output_formats: Vec<String>,
        compress: bool,
        scenarios: Vec<Scenario>,
    }

    impl MockConfig {
        fn new(formats: &[&str], compress: bool) -> Self {
            Self {
                output_formats: formats.iter().map(|f| f.to_string()).collect(),
                compress,
                scenarios: vec![Scenario::new(
                    "growth",
                    CalculatorInput::QuickRatio(QuickRatioInput {
                        new_mrr: 100.0,
                        expansion_mrr: 50.0,
                        churn_mrr: 30.0,
                        contraction_mrr: 20.0,
                    }),
                )],
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn report_name(&self) -> &str {
            "Mock Report"
        }

        fn description(&self) -> Option<&str> {
            Some("Growth check")
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn compress(&self) -> bool {
            self.compress
        }

        fn scenarios(&self) -> &[Scenario] {
            &self.scenarios
        }
    }

    #[tokio::test]
    async fn test_transform_builds_report() {
        let pipeline = ScenarioPipeline::new(MockStorage::new(), MockConfig::new(&["csv"], false));

        let scenarios = pipeline.extract().await.unwrap();
        let report = pipeline.transform(scenarios).await.unwrap();

        assert_eq!(report.name, "Mock Report");
        assert_eq!(report.description.as_deref(), Some("Growth check"));
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].value("quick_ratio"), Some(3.0));
        assert!(report.csv_output.contains("growth,quick_ratio,quick_ratio,Quick ratio,3,ratio"));
        assert!(report.tsv_output.contains("growth\tquick_ratio\tnet_mrr"));
    }

    #[tokio::test]
    async fn test_load_writes_each_format() {
        let storage = MockStorage::new();
        let pipeline = ScenarioPipeline::new(storage.clone(), MockConfig::new(&["csv", "json"], false));

        let scenarios = pipeline.extract().await.unwrap();
        let report = pipeline.transform(scenarios).await.unwrap();
        let written = pipeline.load(report).await.unwrap();

        assert_eq!(
            written,
            vec!["test_output/mock_report.csv", "test_output/mock_report.json"]
        );
        assert!(storage.get_file("mock_report.csv").await.is_some());
        assert!(storage.get_file("mock_report.tsv").await.is_none());

        let json = storage.get_file("mock_report.json").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed["outcomes"][0]["details"]["net_mrr"], 100.0);
    }

    #[tokio::test]
    async fn test_load_compresses_outputs() {
        let storage = MockStorage::new();
        let pipeline = ScenarioPipeline::new(storage.clone(), MockConfig::new(&["csv", "tsv"], true));

        let scenarios = pipeline.extract().await.unwrap();
        let report = pipeline.transform(scenarios).await.unwrap();
        let written = pipeline.load(report).await.unwrap();

        assert_eq!(written, vec!["test_output/mock_report.zip"]);
        let zip_data = storage.get_file("mock_report.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(names, vec!["mock_report.csv", "mock_report.tsv"]);
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_scenario() {
        let mut config = MockConfig::new(&["csv"], false);
        config.scenarios.push(Scenario::new(
            "negative",
            CalculatorInput::QuickRatio(QuickRatioInput {
                new_mrr: -1.0,
                expansion_mrr: 0.0,
                churn_mrr: 0.0,
                contraction_mrr: 0.0,
            }),
        ));
        let pipeline = ScenarioPipeline::new(MockStorage::new(), config);

        match pipeline.extract().await {
            Err(PricingError::InvalidInput { field, .. }) => assert_eq!(field, "negative.new_mrr"),
            other => panic!("expected invalid input, got {:?}", other.map(|s| s.len())),
        }
    }
}
