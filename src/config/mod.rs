//! Configuration management for the TDSE CLI.
//!
//! This module provides the complete configuration service system with
//! dependency injection support and comprehensive type definitions.
//!
//! # Key Components
//!
//! - [`Config`] - Main configuration structure containing all settings
//! - [`ConfigService`] - Service interface for configuration management
//! - [`ProductionConfigService`] - Production implementation with file I/O
//! - [`TestConfigService`] - Test implementation with controlled behavior
//! - [`TestConfigBuilder`] - Builder pattern for test configurations
//!
//! # Examples
//!
//! ```rust
//! use tdse_cli::config::{Config, ConfigService, ProductionConfigService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config_service = ProductionConfigService::new()?;
//! let config = config_service.get_config()?;
//! println!("Recognizer provider: {}", config.recognizer.provider);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub mod builder;
pub mod environment;
pub mod service;
pub mod test_service;
pub mod validation;
pub mod validator;

// ============================================================================
// Configuration Type Definitions
// ============================================================================

/// Full application configuration for the TDSE CLI.
///
/// # Examples
///
/// ```rust
/// use tdse_cli::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.dub.crossfade_ms, 10);
/// assert!(config.general.max_concurrent_jobs > 0);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Temporal Dub Synthesis Engine numeric knobs.
    pub dub: DubConfig,
    /// Speech recognizer collaborator settings.
    pub recognizer: RecognizerConfig,
    /// Translator collaborator settings.
    pub translator: TranslatorConfig,
    /// Neural voice synthesizer collaborator settings.
    pub tts: TtsConfig,
    /// General runtime options.
    pub general: GeneralConfig,
    /// Source path of the loaded configuration file, if any.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

/// Temporal Dub Synthesis Engine configuration.
///
/// These knobs correspond directly to the constants named in the engine's
/// component design: cross-fade length, silence threshold, calibration
/// population size, rate and stretch clamps, and trim tolerances.
///
/// # Examples
///
/// ```rust
/// use tdse_cli::config::DubConfig;
///
/// let dub = DubConfig::default();
/// assert_eq!(dub.crossfade_ms, 10);
/// assert_eq!(dub.min_silence_ms, 20);
/// assert_eq!(dub.rate_clamp_pct, 100);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DubConfig {
    /// Triangular cross-fade length between adjacent artifacts, in milliseconds.
    pub crossfade_ms: u64,
    /// Minimum silence duration that is ever materialized as its own artifact, in milliseconds.
    pub min_silence_ms: u64,
    /// Upper bound on the calibration sample population (`K <= this`).
    pub calibration_max_samples: usize,
    /// Fraction of the segment count used to size the calibration population (`K ~= fraction * N`).
    pub calibration_fraction: f32,
    /// Standard-deviation gate above which calibration is disabled and the rate stays at `+0%`.
    pub calibration_variance_gate: f32,
    /// Symmetric clamp, in percentage points, on the calibrated synthesis rate.
    pub rate_clamp_pct: i32,
    /// Lower bound of a single chainable time-stretch tempo factor.
    pub stretch_clamp_min: f32,
    /// Upper bound of a single chainable time-stretch tempo factor.
    pub stretch_clamp_max: f32,
    /// Fractional tolerance for the final micro-trim under the timestamp strategy.
    pub final_trim_tolerance: f32,
    /// Fractional tolerance for the final trim under the proportional fallback strategy.
    pub proportional_trim_tolerance: f32,
    /// Gap, in seconds, above which the aligner logs a warning instead of silently proceeding.
    pub gap_warn_threshold_s: f32,
    /// Deadline for a single synthesizer call, in seconds.
    pub synth_timeout_s: u64,
    /// Fractional window (of `|T|/N`) searched around each ideal splitter cut point.
    pub splitter_window_fraction: f32,
    /// Opt-in: run the calibration phase's synthesizer calls concurrently instead of by index order.
    pub calibrate_concurrently: bool,
    /// Per-language voice overrides layered on top of the built-in voice table.
    pub voice_overrides: HashMap<String, String>,
}

impl Default for DubConfig {
    fn default() -> Self {
        Self {
            crossfade_ms: 10,
            min_silence_ms: 20,
            calibration_max_samples: 15,
            calibration_fraction: 0.20,
            calibration_variance_gate: 0.3,
            rate_clamp_pct: 100,
            stretch_clamp_min: 0.5,
            stretch_clamp_max: 2.0,
            final_trim_tolerance: 0.01,
            proportional_trim_tolerance: 0.02,
            gap_warn_threshold_s: 5.0,
            synth_timeout_s: 30,
            splitter_window_fraction: 0.2,
            calibrate_concurrently: false,
            voice_overrides: HashMap::new(),
        }
    }
}

/// Speech recognizer collaborator configuration.
///
/// # Examples
///
/// ```rust
/// use tdse_cli::config::RecognizerConfig;
///
/// let recognizer = RecognizerConfig::default();
/// assert_eq!(recognizer.provider, "whisper");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecognizerConfig {
    /// Recognizer provider name (e.g. "whisper").
    pub provider: String,
    /// API key for authentication.
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Recognizer model name.
    pub model: String,
    /// Source language hint, or "auto" to let the recognizer detect it.
    pub language: String,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Number of retries on request failure.
    pub max_retries: u32,
    /// Retry interval in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            provider: "whisper".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "whisper-1".to_string(),
            language: "auto".to_string(),
            timeout_seconds: 120,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

/// Translator collaborator configuration.
///
/// # Examples
///
/// ```rust
/// use tdse_cli::config::TranslatorConfig;
///
/// let translator = TranslatorConfig::default();
/// assert_eq!(translator.provider, "openai");
/// assert_eq!(translator.temperature, 0.3);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslatorConfig {
    /// Translator provider name (e.g. "openai").
    pub provider: String,
    /// API key for authentication.
    pub api_key: Option<String>,
    /// Translator model name.
    pub model: String,
    /// API base URL.
    pub base_url: String,
    /// Generation creativity parameter (0.0-1.0).
    pub temperature: f32,
    /// Maximum tokens in a translation response.
    pub max_tokens: u32,
    /// Number of retries on request failure.
    pub retry_attempts: u32,
    /// Retry interval in milliseconds.
    pub retry_delay_ms: u64,
    /// HTTP request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.3,
            max_tokens: 4000,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            request_timeout_seconds: 120,
        }
    }
}

/// Neural voice synthesizer collaborator configuration.
///
/// # Examples
///
/// ```rust
/// use tdse_cli::config::TtsConfig;
///
/// let tts = TtsConfig::default();
/// assert_eq!(tts.sample_rate, 44100);
/// assert_eq!(tts.channels, 1);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TtsConfig {
    /// Synthesizer provider name.
    pub provider: String,
    /// API key for authentication.
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// HTTP request timeout in seconds (distinct from the per-segment synth deadline in `DubConfig`).
    pub request_timeout_seconds: u64,
    /// Number of retries on request failure.
    pub retry_attempts: u32,
    /// Retry interval in milliseconds.
    pub retry_delay_ms: u64,
    /// Output sample rate fed into the audio toolkit; must match the assembler's internal format (44.1 kHz).
    pub sample_rate: u32,
    /// Output channel count; must be mono (1) to match the assembler's internal format.
    pub channels: u16,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: "azure-speech".to_string(),
            api_key: None,
            base_url: "https://api.tdse-voice.example.com/v1".to_string(),
            request_timeout_seconds: 60,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            sample_rate: 44100,
            channels: 1,
        }
    }
}

/// General application configuration.
///
/// # Examples
///
/// ```rust
/// use tdse_cli::config::GeneralConfig;
///
/// let config = GeneralConfig::default();
/// assert!(config.max_concurrent_jobs > 0);
/// assert_eq!(config.ffmpeg_path, "ffmpeg");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Maximum number of concurrent dub jobs (outer batch fan-out).
    pub max_concurrent_jobs: usize,
    /// Whole-job timeout in seconds.
    pub task_timeout_seconds: u64,
    /// Whether to show a progress bar in the terminal.
    pub enable_progress_bar: bool,
    /// Workspace directory for CLI commands (override current working directory).
    pub workspace: PathBuf,
    /// Path or name of the `ffmpeg` binary used by the audio toolkit.
    pub ffmpeg_path: String,
    /// Path or name of the `ffprobe` binary used by the audio toolkit.
    pub ffprobe_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: num_cpus::get(),
            task_timeout_seconds: 3600,
            enable_progress_bar: true,
            workspace: PathBuf::from("."),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default();
        assert_eq!(config.recognizer.provider, "whisper");
        assert_eq!(config.translator.provider, "openai");
        assert!(config.general.max_concurrent_jobs > 0);
    }

    #[test]
    fn test_dub_config_defaults_match_spec_constants() {
        let dub = DubConfig::default();
        assert_eq!(dub.crossfade_ms, 10);
        assert_eq!(dub.min_silence_ms, 20);
        assert_eq!(dub.calibration_max_samples, 15);
        assert_eq!(dub.rate_clamp_pct, 100);
        assert_eq!(dub.stretch_clamp_min, 0.5);
        assert_eq!(dub.stretch_clamp_max, 2.0);
        assert!(!dub.calibrate_concurrently);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[dub]"));
        assert!(toml_str.contains("[recognizer]"));
        assert!(toml_str.contains("[translator]"));
        assert!(toml_str.contains("[tts]"));
        assert!(toml_str.contains("[general]"));

        let round_tripped: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(round_tripped.dub.crossfade_ms, config.dub.crossfade_ms);
    }
}

// ============================================================================
// Public API Re-exports
// ============================================================================

pub use builder::TestConfigBuilder;
pub use environment::{EnvironmentProvider, SystemEnvironmentProvider, TestEnvironmentProvider};
pub use service::{ConfigService, ProductionConfigService};
pub use test_service::TestConfigService;
pub use validator::validate_config;
