use crate::domain::model::{CalculationReport, ScenarioOutcome};
use crate::utils::error::{PricingError, Result};

pub const REPORT_HEADER: [&str; 6] = ["scenario", "calculator", "metric", "label", "value", "unit"];

/// Lower-case, underscore-separated file name stem for a report title.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "pricing_report".to_string()
    } else {
        stem.to_string()
    }
}

/// One row per metric, in the long format shared by the CSV and TSV outputs.
pub fn render_delimited(outcomes: &[ScenarioOutcome], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(REPORT_HEADER)?;
    for outcome in outcomes {
        for metric in &outcome.metrics {
            writer.write_record([
                outcome.scenario.as_str(),
                outcome.calculator.as_str(),
                metric.key.as_str(),
                metric.label.as_str(),
                metric.display_value().as_str(),
                metric.unit.as_str(),
            ])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| PricingError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| PricingError::CalculationError {
        message: format!("report is not valid UTF-8: {}", e),
    })
}

pub fn render_json(report: &CalculationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Metric;

    fn outcome() -> ScenarioOutcome {
        ScenarioOutcome {
            scenario: "spring, sale".to_string(),
            calculator: "discount".to_string(),
            metrics: vec![
                Metric::currency("effective_price", "Effective price", 80.0),
                Metric::percent("profit_margin", "Profit margin", None::<f64>),
            ],
            details: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Q3 Pricing Review"), "q3_pricing_review");
        assert_eq!(file_stem("  --  "), "pricing_report");
    }

    #[test]
    fn test_csv_quotes_and_blank_undefined_values() {
        let csv = render_delimited(&[outcome()], b',').unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "scenario,calculator,metric,label,value,unit");
        assert_eq!(lines[1], "\"spring, sale\",discount,effective_price,Effective price,80,currency");
        assert_eq!(lines[2], "\"spring, sale\",discount,profit_margin,Profit margin,,percent");
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let tsv = render_delimited(&[outcome()], b'\t').unwrap();
        assert!(tsv.starts_with("scenario\tcalculator\tmetric"));
        assert!(tsv.contains("spring, sale\tdiscount\teffective_price"));
    }
}
