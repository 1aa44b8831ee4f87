//! Test configuration service for isolated testing.
//!
//! This module provides a configuration service implementation specifically
//! designed for testing environments, offering complete isolation and
//! predictable configuration states.

use crate::config::service::ConfigService;
use crate::{Result, config::Config};
use std::path::{Path, PathBuf};

/// Test configuration service implementation.
///
/// This service provides a fixed configuration for testing purposes,
/// ensuring complete isolation between tests and predictable behavior.
/// It does not load from external sources or cache.
pub struct TestConfigService {
    fixed_config: Config,
}

impl TestConfigService {
    /// Create a new test configuration service with the provided configuration.
    pub fn new(config: Config) -> Self {
        Self {
            fixed_config: config,
        }
    }

    /// Create a test configuration service with default settings.
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    /// Create a test configuration service with specific dub tolerances.
    pub fn with_dub_tolerances(final_trim_tolerance: f32, proportional_trim_tolerance: f32) -> Self {
        let mut config = Config::default();
        config.dub.final_trim_tolerance = final_trim_tolerance;
        config.dub.proportional_trim_tolerance = proportional_trim_tolerance;
        Self::new(config)
    }

    /// Create a test configuration service with specific translator settings.
    pub fn with_translator_settings(provider: &str, model: &str, api_key: &str) -> Self {
        let mut config = Config::default();
        config.translator.provider = provider.to_string();
        config.translator.model = model.to_string();
        config.translator.api_key = Some(api_key.to_string());
        Self::new(config)
    }

    /// Create a test configuration service with a specific concurrent job limit.
    pub fn with_max_concurrent_jobs(max_concurrent_jobs: usize) -> Self {
        let mut config = Config::default();
        config.general.max_concurrent_jobs = max_concurrent_jobs;
        Self::new(config)
    }

    /// Get the underlying configuration.
    pub fn config(&self) -> &Config {
        &self.fixed_config
    }

    /// Get a mutable reference to the underlying configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.fixed_config
    }
}

impl ConfigService for TestConfigService {
    fn get_config(&self) -> Result<Config> {
        Ok(self.fixed_config.clone())
    }

    fn reload(&self) -> Result<()> {
        Ok(())
    }

    fn save_config(&self) -> Result<()> {
        Ok(())
    }

    fn save_config_to_file(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/tmp/tdse_test_config.toml"))
    }

    fn reset_to_defaults(&self) -> Result<()> {
        Ok(())
    }
}

impl Default for TestConfigService {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_service_with_defaults() {
        let service = TestConfigService::with_defaults();
        let config = service.get_config().unwrap();

        assert_eq!(config.recognizer.provider, "whisper");
        assert_eq!(config.translator.provider, "openai");
    }

    #[test]
    fn test_config_service_with_dub_tolerances() {
        let service = TestConfigService::with_dub_tolerances(0.02, 0.05);
        let config = service.get_config().unwrap();

        assert_eq!(config.dub.final_trim_tolerance, 0.02);
        assert_eq!(config.dub.proportional_trim_tolerance, 0.05);
    }

    #[test]
    fn test_config_service_with_translator_settings() {
        let service =
            TestConfigService::with_translator_settings("openai", "gpt-4.1", "test-api-key");
        let config = service.get_config().unwrap();

        assert_eq!(config.translator.provider, "openai");
        assert_eq!(config.translator.model, "gpt-4.1");
        assert_eq!(config.translator.api_key, Some("test-api-key".to_string()));
    }

    #[test]
    fn test_config_service_with_max_concurrent_jobs() {
        let service = TestConfigService::with_max_concurrent_jobs(8);
        let config = service.get_config().unwrap();

        assert_eq!(config.general.max_concurrent_jobs, 8);
    }

    #[test]
    fn test_config_service_reload() {
        let service = TestConfigService::with_defaults();
        assert!(service.reload().is_ok());
    }

    #[test]
    fn test_config_service_direct_access() {
        let mut service = TestConfigService::with_defaults();

        assert_eq!(service.config().recognizer.provider, "whisper");

        service.config_mut().recognizer.provider = "modified".to_string();
        assert_eq!(service.config().recognizer.provider, "modified");

        let config = service.get_config().unwrap();
        assert_eq!(config.recognizer.provider, "modified");
    }
}
