//! Configuration service system for dependency injection and test isolation.
//!
//! This module provides a clean abstraction for configuration management
//! that enables dependency injection and complete test isolation without
//! requiring unsafe code or global state resets.

use crate::config::{EnvironmentProvider, SystemEnvironmentProvider};
use crate::{Result, config::Config, error::TdseError};
use config::{Config as ConfigCrate, ConfigBuilder, Environment, File, builder::DefaultState};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service trait for dependency injection.
///
/// This trait abstracts configuration loading and reloading operations,
/// allowing different implementations for production and testing environments.
pub trait ConfigService: Send + Sync {
    /// Get the current configuration.
    ///
    /// Returns the current [`Config`] instance loaded from files,
    /// environment variables, and defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or validation fails.
    fn get_config(&self) -> Result<Config>;

    /// Reload configuration from sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration reloading fails.
    fn reload(&self) -> Result<()>;

    /// Save current configuration to the default file location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be determined or written.
    fn save_config(&self) -> Result<()>;

    /// Save configuration to a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if TOML serialization or the file write fails.
    fn save_config_to_file(&self, path: &Path) -> Result<()>;

    /// Get the default configuration file path.
    fn get_config_file_path(&self) -> Result<PathBuf>;

    /// Reset configuration to default values.
    ///
    /// # Errors
    ///
    /// Returns an error if save or reload fails.
    fn reset_to_defaults(&self) -> Result<()>;
}

/// Production configuration service implementation.
///
/// This service loads configuration from multiple sources in order of priority:
/// 1. Environment variables (highest priority)
/// 2. User configuration file
/// 3. Default configuration file (lowest priority)
///
/// Configuration is cached after first load for performance.
pub struct ProductionConfigService {
    config_builder: ConfigBuilder<DefaultState>,
    cached_config: Arc<RwLock<Option<Config>>>,
    env_provider: Arc<dyn EnvironmentProvider>,
}

impl ProductionConfigService {
    /// Create a new production configuration service.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration builder cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_env_provider(Arc::new(SystemEnvironmentProvider::new()))
    }

    /// Create a configuration service using the specified environment variable provider.
    pub fn with_env_provider(env_provider: Arc<dyn EnvironmentProvider>) -> Result<Self> {
        let config_file_path = if let Some(custom_path) = env_provider.get_var("TDSE_CONFIG_PATH")
        {
            PathBuf::from(custom_path)
        } else {
            Self::user_config_path()
        };

        let config_builder = ConfigCrate::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::from(config_file_path).required(false))
            .add_source(Environment::with_prefix("TDSE").separator("_"));

        Ok(Self {
            config_builder,
            cached_config: Arc::new(RwLock::new(None)),
            env_provider,
        })
    }

    /// Create a configuration service with an additional custom source file.
    pub fn with_custom_file(mut self, file_path: PathBuf) -> Result<Self> {
        self.config_builder = self.config_builder.add_source(File::from(file_path));
        Ok(self)
    }

    /// Get the user configuration file path.
    fn user_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tdse")
            .join("config.toml")
    }

    /// Load and validate configuration from all sources.
    fn load_and_validate(&self) -> Result<Config> {
        debug!("ProductionConfigService: loading configuration from sources");

        let config_crate = self.config_builder.build_cloned().map_err(|e| {
            debug!("ProductionConfigService: config build failed: {}", e);
            TdseError::config(format!("Failed to build configuration: {}", e))
        })?;

        let mut app_config = match config_crate.clone().try_deserialize::<Config>() {
            Ok(config) => {
                debug!("ProductionConfigService: configuration loaded successfully");
                config
            }
            Err(e) => {
                debug!(
                    "ProductionConfigService: full deserialization failed ({}), using defaults",
                    e
                );
                Config::default()
            }
        };

        if app_config.translator.api_key.is_none() {
            if let Some(api_key) = self.env_provider.get_var("OPENAI_API_KEY") {
                debug!("ProductionConfigService: found OPENAI_API_KEY environment variable");
                app_config.translator.api_key = Some(api_key);
            }
        }

        crate::config::validator::validate_config(&app_config).map_err(|e| {
            debug!("ProductionConfigService: config validation failed: {}", e);
            TdseError::config(format!("Configuration validation failed: {}", e))
        })?;

        debug!("ProductionConfigService: configuration loaded and validated successfully");
        Ok(app_config)
    }

    fn save_config_to_file_with_config(&self, path: &Path, config: &Config) -> Result<()> {
        let toml_content = toml::to_string_pretty(config)
            .map_err(|e| TdseError::config(format!("TOML serialization error: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TdseError::config(format!("Failed to create config directory: {}", e)))?;
        }
        std::fs::write(path, toml_content)
            .map_err(|e| TdseError::config(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }
}

impl ConfigService for ProductionConfigService {
    fn get_config(&self) -> Result<Config> {
        {
            let cache = self.cached_config.read().unwrap();
            if let Some(config) = cache.as_ref() {
                return Ok(config.clone());
            }
        }

        let app_config = self.load_and_validate()?;

        {
            let mut cache = self.cached_config.write().unwrap();
            *cache = Some(app_config.clone());
        }

        Ok(app_config)
    }

    fn reload(&self) -> Result<()> {
        {
            let mut cache = self.cached_config.write().unwrap();
            *cache = None;
        }
        self.get_config()?;
        Ok(())
    }

    fn save_config(&self) -> Result<()> {
        let path = self.get_config_file_path()?;
        self.save_config_to_file(&path)
    }

    fn save_config_to_file(&self, path: &Path) -> Result<()> {
        let config = self.get_config()?;
        self.save_config_to_file_with_config(path, &config)
    }

    fn get_config_file_path(&self) -> Result<PathBuf> {
        if let Some(custom) = self.env_provider.get_var("TDSE_CONFIG_PATH") {
            return Ok(PathBuf::from(custom));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TdseError::config("Unable to determine config directory"))?;
        Ok(config_dir.join("tdse").join("config.toml"))
    }

    fn reset_to_defaults(&self) -> Result<()> {
        let default_config = Config::default();
        let path = self.get_config_file_path()?;
        self.save_config_to_file_with_config(&path, &default_config)?;
        self.reload()
    }
}

impl Default for ProductionConfigService {
    fn default() -> Self {
        Self::new().expect("Failed to create default ProductionConfigService")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestEnvironmentProvider;
    use std::sync::Arc;

    #[test]
    fn test_production_config_service_creation() {
        let service = ProductionConfigService::new();
        assert!(service.is_ok());
    }

    #[test]
    fn test_production_config_service_with_custom_file() {
        let service = ProductionConfigService::new()
            .unwrap()
            .with_custom_file(PathBuf::from("test.toml"));
        assert!(service.is_ok());
    }

    #[test]
    fn test_production_service_implements_config_service_trait() {
        let service = ProductionConfigService::new().unwrap();

        let config1 = service.get_config();
        assert!(config1.is_ok());

        assert!(service.reload().is_ok());

        let config2 = service.get_config();
        assert!(config2.is_ok());
    }

    #[test]
    fn test_production_config_service_openai_api_key_loading() {
        let mut env_provider = TestEnvironmentProvider::new();
        env_provider.set_var("OPENAI_API_KEY", "sk-test-openai-key-env");
        env_provider.set_var(
            "TDSE_CONFIG_PATH",
            "/tmp/tdse_test_config_that_does_not_exist.toml",
        );

        let service = ProductionConfigService::with_env_provider(Arc::new(env_provider))
            .expect("Failed to create config service");

        let config = service.get_config().expect("Failed to get config");

        assert_eq!(
            config.translator.api_key,
            Some("sk-test-openai-key-env".to_string())
        );
    }

    #[test]
    fn test_production_config_service_no_openai_env_vars() {
        let mut env_provider = TestEnvironmentProvider::new();
        env_provider.set_var(
            "TDSE_CONFIG_PATH",
            "/tmp/tdse_test_config_no_openai_that_does_not_exist.toml",
        );

        let service = ProductionConfigService::with_env_provider(Arc::new(env_provider))
            .expect("Failed to create config service");

        let config = service.get_config().expect("Failed to get config");

        assert_eq!(config.translator.api_key, None);
    }
}
