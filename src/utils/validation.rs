use crate::utils::error::{PricingError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PricingError::invalid_input(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(PricingError::invalid_input(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PricingError::invalid_input(
            field_name,
            value,
            "Value must be a finite number",
        ));
    }
    Ok(())
}

/// Strictly greater than zero.
pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    validate_finite(field_name, value)?;
    if value <= 0.0 {
        return Err(PricingError::invalid_input(
            field_name,
            value,
            "Value must be greater than 0",
        ));
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    validate_finite(field_name, value)?;
    if value < 0.0 {
        return Err(PricingError::invalid_input(
            field_name,
            value,
            "Value cannot be negative",
        ));
    }
    Ok(())
}

/// Finite and within `[min, max]`.
pub fn validate_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    validate_finite(field_name, value)?;
    if value < min || value > max {
        return Err(PricingError::invalid_input(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_percentage(field_name: &str, value: f64) -> Result<()> {
    validate_range(field_name, value, 0.0, 100.0)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PricingError::invalid_input(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();

    if formats.is_empty() {
        return Err(PricingError::invalid_input(
            field_name,
            "[]",
            "At least one output format is required",
        ));
    }

    for format in formats {
        if !allowed_set.contains(format.as_str()) {
            return Err(PricingError::invalid_input(
                field_name,
                format,
                format!("Unsupported format. Valid formats: {}", allowed.join(", ")),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("base_price", 10.0).is_ok());
        assert!(validate_positive("base_price", 0.0).is_err());
        assert!(validate_positive("base_price", -1.0).is_err());
        assert!(validate_positive("base_price", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage("discount_percentage", 0.0).is_ok());
        assert!(validate_percentage("discount_percentage", 100.0).is_ok());
        assert!(validate_percentage("discount_percentage", 100.5).is_err());
        assert!(validate_percentage("discount_percentage", -3.0).is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_output_formats("output_formats", &formats, &["csv", "tsv", "json"]).is_ok());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_output_formats("output_formats", &invalid, &["csv", "tsv", "json"]).is_err());
        assert!(validate_output_formats("output_formats", &[], &["csv"]).is_err());
    }

    #[test]
    fn test_validate_range_rejects_non_finite() {
        assert!(validate_range("perception", 50.0, 0.0, 100.0).is_ok());
        assert!(validate_range("perception", f64::NAN, 0.0, 100.0).is_err());
        assert!(validate_range("perception", f64::INFINITY, 0.0, 100.0).is_err());
        assert!(validate_range("sales_performance", -50.0, -50.0, 50.0).is_ok());
        assert!(validate_percentage("discount_percentage", f64::NAN).is_err());
    }
}
