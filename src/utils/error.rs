use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Calculation error: {message}")]
    CalculationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Io,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PricingError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::ConfigError { .. } | PricingError::TomlError(_) => {
                ErrorCategory::Configuration
            }
            PricingError::InvalidInput { .. } | PricingError::CalculationError { .. } => {
                ErrorCategory::Input
            }
            PricingError::IoError(_) => ErrorCategory::Io,
            PricingError::ZipError(_)
            | PricingError::CsvError(_)
            | PricingError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PricingError::ConfigError { .. }
            | PricingError::TomlError(_)
            | PricingError::InvalidInput { .. } => ErrorSeverity::High,
            PricingError::IoError(_)
            | PricingError::ZipError(_)
            | PricingError::CsvError(_)
            | PricingError::SerializationError(_) => ErrorSeverity::Medium,
            PricingError::CalculationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PricingError::TomlError(_) => {
                "Check the scenario file syntax; every [[scenarios]] entry needs a name and a calculator".to_string()
            }
            PricingError::ConfigError { .. } => {
                "Review the scenario file and command-line flags".to_string()
            }
            PricingError::InvalidInput { field, .. } => {
                format!("Correct the value of '{}' and run again", field)
            }
            PricingError::IoError(_) => {
                "Make sure the input file exists and the output directory is writable".to_string()
            }
            PricingError::ZipError(_)
            | PricingError::CsvError(_)
            | PricingError::SerializationError(_) => {
                "Try a different output format or disable compression".to_string()
            }
            PricingError::CalculationError { .. } => {
                "Report this scenario together with its inputs".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PricingError::InvalidInput { field, reason, .. } => {
                format!("Input '{}' is not valid: {}", field, reason)
            }
            PricingError::TomlError(e) => format!("The scenario file could not be read: {}", e),
            PricingError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }

    /// Process exit code derived from severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
