//! Configuration builder for fluent test configuration creation.
//!
//! This module provides a fluent API for building test configurations,
//! making it easy to create specific configuration scenarios for testing.

use crate::config::Config;

/// Fluent builder for creating test configurations.
///
/// # Examples
///
/// ```rust
/// use tdse_cli::config::TestConfigBuilder;
///
/// let config = TestConfigBuilder::new()
///     .with_crossfade_ms(15)
///     .with_rate_clamp_pct(80)
///     .build_config();
/// assert_eq!(config.dub.crossfade_ms, 15);
/// ```
pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // Dub engine knobs

    /// Set the cross-fade length, in milliseconds.
    pub fn with_crossfade_ms(mut self, crossfade_ms: u64) -> Self {
        self.config.dub.crossfade_ms = crossfade_ms;
        self
    }

    /// Set the minimum materialized silence duration, in milliseconds.
    pub fn with_min_silence_ms(mut self, min_silence_ms: u64) -> Self {
        self.config.dub.min_silence_ms = min_silence_ms;
        self
    }

    /// Set the calibration population cap and fraction.
    pub fn with_calibration_population(mut self, max_samples: usize, fraction: f32) -> Self {
        self.config.dub.calibration_max_samples = max_samples;
        self.config.dub.calibration_fraction = fraction;
        self
    }

    /// Set the calibration variance gate.
    pub fn with_calibration_variance_gate(mut self, gate: f32) -> Self {
        self.config.dub.calibration_variance_gate = gate;
        self
    }

    /// Set the symmetric rate clamp, in percentage points.
    pub fn with_rate_clamp_pct(mut self, clamp: i32) -> Self {
        self.config.dub.rate_clamp_pct = clamp;
        self
    }

    /// Set the time-stretch tempo clamp range.
    pub fn with_stretch_clamp(mut self, min: f32, max: f32) -> Self {
        self.config.dub.stretch_clamp_min = min;
        self.config.dub.stretch_clamp_max = max;
        self
    }

    /// Set the final-trim and proportional-trim tolerances.
    pub fn with_trim_tolerances(mut self, final_tolerance: f32, proportional_tolerance: f32) -> Self {
        self.config.dub.final_trim_tolerance = final_tolerance;
        self.config.dub.proportional_trim_tolerance = proportional_tolerance;
        self
    }

    /// Enable or disable concurrent calibration.
    pub fn with_calibrate_concurrently(mut self, enabled: bool) -> Self {
        self.config.dub.calibrate_concurrently = enabled;
        self
    }

    /// Add a voice override for a language code.
    pub fn with_voice_override(mut self, language: &str, voice_id: &str) -> Self {
        self.config
            .dub
            .voice_overrides
            .insert(language.to_string(), voice_id.to_string());
        self
    }

    // Collaborator settings

    /// Set the translator provider, model, and API key.
    pub fn with_translator(mut self, provider: &str, model: &str, api_key: &str) -> Self {
        self.config.translator.provider = provider.to_string();
        self.config.translator.model = model.to_string();
        self.config.translator.api_key = Some(api_key.to_string());
        self
    }

    /// Set the recognizer provider and model.
    pub fn with_recognizer(mut self, provider: &str, model: &str) -> Self {
        self.config.recognizer.provider = provider.to_string();
        self.config.recognizer.model = model.to_string();
        self
    }

    // General settings

    /// Set the maximum number of concurrent jobs.
    pub fn with_max_concurrent_jobs(mut self, max_jobs: usize) -> Self {
        self.config.general.max_concurrent_jobs = max_jobs;
        self
    }

    /// Finalize the builder and return the assembled configuration.
    pub fn build_config(self) -> Config {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = TestConfigBuilder::new().build_config();
        assert_eq!(config.dub.crossfade_ms, 10);
    }

    #[test]
    fn test_builder_overrides_dub_knobs() {
        let config = TestConfigBuilder::new()
            .with_crossfade_ms(20)
            .with_rate_clamp_pct(50)
            .with_stretch_clamp(0.6, 1.5)
            .build_config();

        assert_eq!(config.dub.crossfade_ms, 20);
        assert_eq!(config.dub.rate_clamp_pct, 50);
        assert_eq!(config.dub.stretch_clamp_min, 0.6);
        assert_eq!(config.dub.stretch_clamp_max, 1.5);
    }

    #[test]
    fn test_builder_voice_override() {
        let config = TestConfigBuilder::new()
            .with_voice_override("it", "it-IT-CustomNeural")
            .build_config();

        assert_eq!(
            config.dub.voice_overrides.get("it").map(String::as_str),
            Some("it-IT-CustomNeural")
        );
    }

    #[test]
    fn test_builder_translator_settings() {
        let config = TestConfigBuilder::new()
            .with_translator("openai", "gpt-4o", "sk-test")
            .build_config();

        assert_eq!(config.translator.provider, "openai");
        assert_eq!(config.translator.model, "gpt-4o");
        assert_eq!(config.translator.api_key, Some("sk-test".to_string()));
    }
}
