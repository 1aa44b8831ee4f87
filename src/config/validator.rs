//! Whole-configuration validation.
//!
//! This module validates a fully-assembled [`Config`](crate::config::Config)
//! after it has been loaded from files, environment variables, and defaults,
//! catching combinations that are individually well-typed but jointly invalid
//! (e.g. a stretch clamp with `min > max`).

use crate::config::Config;
use crate::error::{TdseError, TdseResult};

/// Validate an assembled configuration.
///
/// # Errors
///
/// Returns `TdseError::Config` describing the first invalid field found.
pub fn validate_config(config: &Config) -> TdseResult<()> {
    let dub = &config.dub;

    if dub.stretch_clamp_min <= 0.0 || dub.stretch_clamp_min >= dub.stretch_clamp_max {
        return Err(TdseError::config(format!(
            "dub.stretch_clamp_min ({}) must be positive and less than stretch_clamp_max ({})",
            dub.stretch_clamp_min, dub.stretch_clamp_max
        )));
    }

    if dub.rate_clamp_pct <= 0 || dub.rate_clamp_pct > 100 {
        return Err(TdseError::config(format!(
            "dub.rate_clamp_pct ({}) must be in (0, 100]",
            dub.rate_clamp_pct
        )));
    }

    if !(0.0..=1.0).contains(&dub.calibration_fraction) {
        return Err(TdseError::config(format!(
            "dub.calibration_fraction ({}) must be in [0.0, 1.0]",
            dub.calibration_fraction
        )));
    }

    if dub.calibration_variance_gate <= 0.0 {
        return Err(TdseError::config(
            "dub.calibration_variance_gate must be positive".to_string(),
        ));
    }

    if dub.final_trim_tolerance <= 0.0 || dub.proportional_trim_tolerance <= 0.0 {
        return Err(TdseError::config(
            "trim tolerances must be positive".to_string(),
        ));
    }

    if config.tts.channels != 1 {
        return Err(TdseError::config(
            "tts.channels must be 1 (mono); the assembler's internal format is mono PCM"
                .to_string(),
        ));
    }

    if config.tts.sample_rate == 0 {
        return Err(TdseError::config(
            "tts.sample_rate must be nonzero".to_string(),
        ));
    }

    if config.general.max_concurrent_jobs == 0 {
        return Err(TdseError::config(
            "general.max_concurrent_jobs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_stretch_clamp() {
        let mut config = Config::default();
        config.dub.stretch_clamp_min = 3.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_rate_clamp() {
        let mut config = Config::default();
        config.dub.rate_clamp_pct = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_channels() {
        let mut config = Config::default();
        config.tts.channels = 2;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_max_concurrent_jobs() {
        let mut config = Config::default();
        config.general.max_concurrent_jobs = 0;
        assert!(validate_config(&config).is_err());
    }
}
