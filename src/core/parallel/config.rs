//! Batch job-pool configuration.

use crate::config::Config;
use crate::error::{TdseError, TdseResult};

/// Configuration for the outer batch job pool that fans a directory of
/// independent dub jobs out across bounded concurrency.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Maximum number of [`crate::core::dub::SynthesisJob`]s run concurrently.
    pub max_concurrent_jobs: usize,
}

impl ParallelConfig {
    /// Builds a `ParallelConfig` from the application configuration's
    /// `general.max_concurrent_jobs` knob.
    pub fn from_app_config(config: &Config) -> Self {
        Self {
            max_concurrent_jobs: config.general.max_concurrent_jobs,
        }
    }

    /// Validates the configuration values for correctness.
    pub fn validate(&self) -> TdseResult<()> {
        if self.max_concurrent_jobs == 0 {
            return Err(TdseError::config("max_concurrent_jobs must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_app_config_reads_general_section() {
        let app_cfg = Config::default();
        let pc = ParallelConfig::from_app_config(&app_cfg);
        assert_eq!(pc.max_concurrent_jobs, app_cfg.general.max_concurrent_jobs);
    }

    #[test]
    fn rejects_zero_concurrency() {
        let pc = ParallelConfig { max_concurrent_jobs: 0 };
        assert!(pc.validate().is_err());
    }

    #[test]
    fn accepts_positive_concurrency() {
        let pc = ParallelConfig { max_concurrent_jobs: 4 };
        assert!(pc.validate().is_ok());
    }
}
