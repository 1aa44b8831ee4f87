//! Error types for the TDSE CLI application.
//!
//! This module defines the `TdseError` enum covering every failure surface
//! of the dubbing pipeline: recognizer ingest, alignment, synthesis,
//! audio-tool invocation, collaborator adapters, and configuration.
//!
//! It also provides helper constructors and user-friendly messages used by
//! the CLI's exit path.
use thiserror::Error;

/// Represents all possible errors in the TDSE application.
///
/// # Examples
///
/// ```rust
/// use tdse_cli::error::{TdseError, TdseResult};
///
/// fn example() -> TdseResult<()> {
///     Err(TdseError::bad_timestamp("not a timestamp"))
/// }
/// ```
#[derive(Error, Debug)]
pub enum TdseError {
    /// I/O operation failed during file system access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error due to invalid or missing settings.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Recognizer segment bounds were non-numeric or non-finite.
    ///
    /// Non-retryable within the current strategy; triggers fallback to the
    /// proportional strategy.
    #[error("Invalid recognizer timestamps: {message}")]
    InvalidTimestamps {
        /// Description of which segment(s) were invalid
        message: String,
    },

    /// A timestamp string failed to parse during recognizer ingest.
    #[error("Bad timestamp: {0}")]
    BadTimestamp(String),

    /// A segment's voice synthesis call failed or returned an empty stream.
    ///
    /// Triggers a full-job fallback to the next lower strategy.
    #[error("Synthesis failed for segment {0}")]
    SynthesisFailed(usize),

    /// An ffmpeg/ffprobe-class audio tool invocation failed.
    ///
    /// Non-retryable; surfaced as a job failure.
    #[error("Audio tool failed: {message}")]
    AudioToolFailed {
        /// Description of the failed operation
        message: String,
    },

    /// Cooperative cancellation was observed between segments.
    #[error("Job cancelled")]
    Cancelled,

    /// The video acquirer collaborator (download or local-file resolution) failed.
    #[error("Video acquisition failed: {message}")]
    AcquisitionFailed {
        /// Description of the acquisition failure
        message: String,
    },

    /// The audio demuxer collaborator failed to extract PCM from the container.
    #[error("Audio demux failed: {message}")]
    DemuxFailed {
        /// Description of the demux failure
        message: String,
    },

    /// The video remuxer collaborator failed to splice the dubbed track back in.
    #[error("Video remux failed: {message}")]
    RemuxFailed {
        /// Description of the remux failure
        message: String,
    },

    /// The speech recognizer collaborator failed.
    #[error("Recognition failed: {message}")]
    RecognitionFailed {
        /// Description of the recognition failure
        message: String,
    },

    /// The translator collaborator failed.
    #[error("Translation failed: {message}")]
    TranslationFailed {
        /// Description of the translation failure
        message: String,
    },

    /// Catch-all error variant wrapping any other failure.
    #[error("Unknown error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Specialized `Result` type for TDSE operations.
pub type TdseResult<T> = Result<T, TdseError>;

impl TdseError {
    /// Create a configuration error with the given message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tdse_cli::error::TdseError;
    /// let err = TdseError::config("invalid setting");
    /// assert_eq!(err.to_string(), "Configuration error: invalid setting");
    /// ```
    pub fn config<S: Into<String>>(message: S) -> Self {
        TdseError::Config {
            message: message.into(),
        }
    }

    /// Create an `InvalidTimestamps` error with the given message.
    pub fn invalid_timestamps<S: Into<String>>(message: S) -> Self {
        TdseError::InvalidTimestamps {
            message: message.into(),
        }
    }

    /// Create a `BadTimestamp` error for the given raw input.
    pub fn bad_timestamp<S: Into<String>>(raw: S) -> Self {
        TdseError::BadTimestamp(raw.into())
    }

    /// Create an `AudioToolFailed` error with the given message.
    pub fn audio_tool_failed<S: Into<String>>(message: S) -> Self {
        TdseError::AudioToolFailed {
            message: message.into(),
        }
    }

    /// Create an `AcquisitionFailed` error with the given message.
    pub fn acquisition_failed<S: Into<String>>(message: S) -> Self {
        TdseError::AcquisitionFailed {
            message: message.into(),
        }
    }

    /// Create a `DemuxFailed` error with the given message.
    pub fn demux_failed<S: Into<String>>(message: S) -> Self {
        TdseError::DemuxFailed {
            message: message.into(),
        }
    }

    /// Create a `RemuxFailed` error with the given message.
    pub fn remux_failed<S: Into<String>>(message: S) -> Self {
        TdseError::RemuxFailed {
            message: message.into(),
        }
    }

    /// Create a `RecognitionFailed` error with the given message.
    pub fn recognition_failed<S: Into<String>>(message: S) -> Self {
        TdseError::RecognitionFailed {
            message: message.into(),
        }
    }

    /// Create a `TranslationFailed` error with the given message.
    pub fn translation_failed<S: Into<String>>(message: S) -> Self {
        TdseError::TranslationFailed {
            message: message.into(),
        }
    }

    /// Returns true if this error should degrade the job to the next lower
    /// fallback strategy rather than abort the whole job outright.
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            TdseError::InvalidTimestamps { .. } | TdseError::SynthesisFailed(_)
        )
    }

    /// Return the corresponding process exit code for this error variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tdse_cli::error::TdseError;
    /// assert_eq!(TdseError::config("x").exit_code(), 2);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            TdseError::Io(_) => 1,
            TdseError::Config { .. } => 2,
            TdseError::InvalidTimestamps { .. } | TdseError::BadTimestamp(_) => 3,
            TdseError::SynthesisFailed(_) => 4,
            TdseError::AudioToolFailed { .. } => 5,
            TdseError::AcquisitionFailed { .. } => 6,
            TdseError::DemuxFailed { .. } => 7,
            TdseError::RemuxFailed { .. } => 8,
            TdseError::RecognitionFailed { .. } => 9,
            TdseError::TranslationFailed { .. } => 10,
            TdseError::Cancelled => 130,
            TdseError::Other(_) => 1,
        }
    }

    /// Return a user-friendly error message with suggested remedies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tdse_cli::error::TdseError;
    /// let msg = TdseError::config("missing key").user_friendly_message();
    /// assert!(msg.contains("Configuration error:"));
    /// ```
    pub fn user_friendly_message(&self) -> String {
        match self {
            TdseError::Io(e) => format!("File operation error: {}", e),
            TdseError::Config { message } => format!(
                "Configuration error: {}\nHint: run 'tdse-cli config --help' for details",
                message
            ),
            TdseError::InvalidTimestamps { message } => format!(
                "Invalid recognizer timestamps: {}\nHint: falling back to proportional segmentation",
                message
            ),
            TdseError::BadTimestamp(raw) => format!(
                "Could not parse timestamp '{}'\nHint: expected milliseconds or HH:MM:SS,mmm",
                raw
            ),
            TdseError::SynthesisFailed(i) => format!(
                "Synthesis failed for segment {}\nHint: check voice synthesizer credentials and connectivity",
                i
            ),
            TdseError::AudioToolFailed { message } => format!(
                "Audio tool failed: {}\nHint: verify ffmpeg/ffprobe are installed and on PATH",
                message
            ),
            TdseError::Cancelled => "Job cancelled".to_string(),
            TdseError::AcquisitionFailed { message } => {
                format!("Video acquisition failed: {}\nHint: check the source URL or path", message)
            }
            TdseError::DemuxFailed { message } => {
                format!("Audio demux failed: {}\nHint: verify the video container is readable", message)
            }
            TdseError::RemuxFailed { message } => {
                format!("Video remux failed: {}\nHint: verify the original video stream is copyable", message)
            }
            TdseError::RecognitionFailed { message } => format!(
                "Recognition failed: {}\nHint: check recognizer credentials and connectivity",
                message
            ),
            TdseError::TranslationFailed { message } => format!(
                "Translation failed: {}\nHint: check translator credentials and connectivity",
                message
            ),
            TdseError::Other(err) => {
                format!("Unknown error: {}\nHint: please report this issue", err)
            }
        }
    }
}

impl From<reqwest::Error> for TdseError {
    fn from(err: reqwest::Error) -> Self {
        TdseError::Other(anyhow::anyhow!(err))
    }
}

impl From<config::ConfigError> for TdseError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(path) => TdseError::Config {
                message: format!("Configuration file not found: {}", path),
            },
            config::ConfigError::Message(msg) => TdseError::Config { message: msg },
            _ => TdseError::Config {
                message: format!("Configuration error: {}", err),
            },
        }
    }
}

impl From<serde_json::Error> for TdseError {
    fn from(err: serde_json::Error) -> Self {
        TdseError::Config {
            message: format!("JSON serialization/deserialization error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_error_creation() {
        let error = TdseError::config("test config error");
        assert!(matches!(error, TdseError::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_invalid_timestamps_triggers_fallback() {
        let error = TdseError::invalid_timestamps("start >= end");
        assert!(error.triggers_fallback());
    }

    #[test]
    fn test_synthesis_failed_triggers_fallback() {
        let error = TdseError::SynthesisFailed(3);
        assert!(error.triggers_fallback());
        assert_eq!(error.to_string(), "Synthesis failed for segment 3");
    }

    #[test]
    fn test_audio_tool_failed_does_not_trigger_fallback() {
        let error = TdseError::audio_tool_failed("ffmpeg exited with 1");
        assert!(!error.triggers_fallback());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let tdse_error: TdseError = io_error.into();
        assert!(matches!(tdse_error, TdseError::Io(_)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(TdseError::config("test").exit_code(), 2);
        assert_eq!(TdseError::SynthesisFailed(0).exit_code(), 4);
        assert_eq!(TdseError::audio_tool_failed("test").exit_code(), 5);
        assert_eq!(TdseError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_user_friendly_messages() {
        let config_error = TdseError::config("missing key");
        let message = config_error.user_friendly_message();
        assert!(message.contains("Configuration error:"));
        assert!(message.contains("tdse-cli config --help"));

        let bad_ts = TdseError::bad_timestamp("not-a-time");
        let message = bad_ts.user_friendly_message();
        assert!(message.contains("not-a-time"));
    }
}
