//! Configuration value validation utilities.
//!
//! This module provides comprehensive validation for configuration values,
//! ensuring type safety and constraint compliance.

use crate::error::{TdseError, TdseResult};

/// Validate a string value against a list of allowed values.
pub fn validate_enum(value: &str, allowed: &[&str]) -> TdseResult<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(TdseError::config(format!(
            "Invalid value '{}'. Allowed values: {}",
            value,
            allowed.join(", ")
        )))
    }
}

/// Validate a float value within a specified range.
pub fn validate_float_range(value: f32, min: f32, max: f32) -> TdseResult<f32> {
    if value < min || value > max {
        return Err(TdseError::config(format!(
            "Value {} is out of range [{}, {}]",
            value, min, max
        )));
    }
    Ok(value)
}

/// Validate a usize value within a specified range.
pub fn validate_usize_range(value: usize, min: usize, max: usize) -> TdseResult<usize> {
    if value < min || value > max {
        return Err(TdseError::config(format!(
            "Value {} is out of range [{}, {}]",
            value, min, max
        )));
    }
    Ok(value)
}

/// Validate a u64 value within a specified range.
pub fn validate_u64_range(value: u64, min: u64, max: u64) -> TdseResult<u64> {
    if value < min || value > max {
        return Err(TdseError::config(format!(
            "Value {} is out of range [{}, {}]",
            value, min, max
        )));
    }
    Ok(value)
}

/// Validate URL format.
pub fn validate_url(value: &str) -> TdseResult<()> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(TdseError::config(format!(
            "Invalid URL format: {}. Must start with http:// or https://",
            value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_enum() {
        assert!(validate_enum("whisper", &["whisper", "azure"]).is_ok());
        assert!(validate_enum("bogus", &["whisper", "azure"]).is_err());
    }

    #[test]
    fn test_validate_float_range() {
        assert!(validate_float_range(0.5, 0.0, 1.0).is_ok());
        assert!(validate_float_range(1.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("ftp://example.com").is_err());
    }
}
