//! Shared data types for the temporal dub synthesis engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// A speech-to-text segment as reported by a [`SpeechRecognizer`](crate::services::recognizer::SpeechRecognizer).
///
/// Times are in seconds. The recognizer is allowed to produce overlaps or
/// zero-duration items; callers normalize via [`RecognizerSegment::normalized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerSegment {
    pub start_s: f64,
    pub end_s: f64,
    pub text: String,
}

impl RecognizerSegment {
    /// Returns a copy with `end_s` repaired to `start_s + 0.1` if the segment
    /// is inverted or zero-duration.
    pub fn normalized(&self) -> Self {
        if self.start_s >= self.end_s {
            Self {
                start_s: self.start_s,
                end_s: self.start_s + 0.1,
                text: self.text.clone(),
            }
        } else {
            self.clone()
        }
    }

    pub fn duration_s(&self) -> f64 {
        self.end_s - self.start_s
    }
}

/// The output of the Segment Aligner: a translated string paired with a timing interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    pub text: String,
    pub start_s: f64,
    pub end_s: f64,
}

impl TimedSegment {
    pub fn target_duration_s(&self) -> f64 {
        self.end_s - self.start_s
    }
}

/// One observed (target, actual) duration pair gathered during the calibration phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSample {
    pub target_s: f64,
    pub actual_s: f64,
}

impl CalibrationSample {
    pub fn ratio(&self) -> f64 {
        if self.target_s == 0.0 {
            1.0
        } else {
            self.actual_s / self.target_s
        }
    }
}

/// A synthesis-rate bias, in percentage points, clamped to `[-100, 100]`.
///
/// `0` is nominal speed. Positive values mean "speak faster."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveRate(i32);

impl AdaptiveRate {
    pub const ZERO: AdaptiveRate = AdaptiveRate(0);

    pub fn clamped(pct: i32, clamp: i32) -> Self {
        Self(pct.clamp(-clamp, clamp))
    }

    pub fn pct(&self) -> i32 {
        self.0
    }

    /// Formats the rate as the `"+N%" | "-N%"` string the synthesizer RPC expects.
    pub fn as_rpc_string(&self) -> String {
        if self.0 >= 0 {
            format!("+{}%", self.0)
        } else {
            format!("{}%", self.0)
        }
    }
}

impl Default for AdaptiveRate {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Either a remote video to download or a file already on disk.
#[derive(Debug, Clone)]
pub enum VideoSource {
    Url(Url),
    LocalPath(PathBuf),
}

/// Top-level input to a single dub job.
#[derive(Debug, Clone)]
pub struct DubRequest {
    pub source: VideoSource,
    pub target_language: String,
    pub source_language: Option<String>,
    pub output_path: PathBuf,
}

/// The speech recognizer's contract result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionOutput {
    pub text: String,
    pub language: String,
    pub segments: Vec<RecognizerSegment>,
}

/// End-of-job structured report, handed back to the CLI and to library callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DubReport {
    pub original_duration_s: f64,
    pub final_duration_s: f64,
    pub difference_s: f64,
    pub difference_percent: f64,
    pub segments: usize,
    pub accuracy_percent: f64,
    pub files_concatenated: usize,
    pub output_path: PathBuf,
    pub strategy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_inverted_segment() {
        let seg = RecognizerSegment {
            start_s: 5.0,
            end_s: 4.0,
            text: "invalid".to_string(),
        };
        let fixed = seg.normalized();
        assert_eq!(fixed.start_s, 5.0);
        assert_eq!(fixed.end_s, 5.1);
    }

    #[test]
    fn leaves_valid_segment_untouched() {
        let seg = RecognizerSegment {
            start_s: 0.0,
            end_s: 2.0,
            text: "hello".to_string(),
        };
        assert_eq!(seg.normalized(), seg);
    }

    #[test]
    fn adaptive_rate_clamps_and_formats() {
        assert_eq!(AdaptiveRate::clamped(150, 100).pct(), 100);
        assert_eq!(AdaptiveRate::clamped(-150, 100).pct(), -100);
        assert_eq!(AdaptiveRate::clamped(-20, 100).as_rpc_string(), "-20%");
        assert_eq!(AdaptiveRate::clamped(0, 100).as_rpc_string(), "+0%");
    }

    #[test]
    fn calibration_sample_ratio() {
        let sample = CalibrationSample {
            target_s: 2.0,
            actual_s: 1.6,
        };
        assert!((sample.ratio() - 0.8).abs() < 1e-9);
    }
}
