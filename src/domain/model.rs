use serde::{Deserialize, Serialize};

/// How a metric value should be read when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    Currency,
    Percent,
    Ratio,
    Count,
    Months,
}

impl MetricUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricUnit::Currency => "currency",
            MetricUnit::Percent => "percent",
            MetricUnit::Ratio => "ratio",
            MetricUnit::Count => "count",
            MetricUnit::Months => "months",
        }
    }
}

/// One labelled number in a calculator result. `value` is `None` when the
/// underlying ratio has a zero denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub label: String,
    pub value: Option<f64>,
    pub unit: MetricUnit,
}

impl Metric {
    pub fn new(key: &str, label: &str, value: impl Into<Option<f64>>, unit: MetricUnit) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value: value.into(),
            unit,
        }
    }

    pub fn currency(key: &str, label: &str, value: impl Into<Option<f64>>) -> Self {
        Self::new(key, label, value, MetricUnit::Currency)
    }

    pub fn percent(key: &str, label: &str, value: impl Into<Option<f64>>) -> Self {
        Self::new(key, label, value, MetricUnit::Percent)
    }

    pub fn ratio(key: &str, label: &str, value: impl Into<Option<f64>>) -> Self {
        Self::new(key, label, value, MetricUnit::Ratio)
    }

    pub fn count(key: &str, label: &str, value: impl Into<Option<f64>>) -> Self {
        Self::new(key, label, value, MetricUnit::Count)
    }

    pub fn months(key: &str, label: &str, value: impl Into<Option<f64>>) -> Self {
        Self::new(key, label, value, MetricUnit::Months)
    }

    /// Rendered value for CSV/TSV cells; undefined ratios become an empty cell.
    pub fn display_value(&self) -> String {
        match self.value {
            Some(v) => format!("{:.4}", v)
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string(),
            None => String::new(),
        }
    }
}

/// Flattens a calculator result into labelled metrics for reporting.
pub trait Summarize {
    fn metrics(&self) -> Vec<Metric>;
}

/// Result of running one named scenario through its calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub scenario: String,
    pub calculator: String,
    pub metrics: Vec<Metric>,
    pub details: serde_json::Value,
}

impl ScenarioOutcome {
    pub fn metric(&self, key: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.metric(key).and_then(|m| m.value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationReport {
    pub name: String,
    pub description: Option<String>,
    pub generated_at: String,
    pub outcomes: Vec<ScenarioOutcome>,
    #[serde(skip)]
    pub csv_output: String,
    #[serde(skip)]
    pub tsv_output: String,
}
