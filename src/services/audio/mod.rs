//! Audio toolkit: conversion, time-stretch, cross-fade concatenation,
//! duration probing, and silence generation.
//!
//! The production implementation shells out to `ffmpeg`/`ffprobe` as an
//! async child process for everything that needs real signal processing, and
//! generates silence directly in-process with `hound`, since an exact,
//! specified-duration, specified-format silent buffer needs no external tool.

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{TdseError, TdseResult};

/// Internal audio format the Sequence Assembler requires of every buffer.
pub const SAMPLE_RATE_HZ: u32 = 44_100;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

/// Audio processing primitives the dub engine depends on.
#[async_trait]
pub trait AudioToolkit: Send + Sync {
    /// Decodes an arbitrary input file to mono 44.1 kHz 16-bit PCM WAV at `output`.
    async fn convert_to_pcm(&self, input: &Path, output: &Path) -> TdseResult<()>;

    /// Applies a pitch-invariant tempo change. `tempo` must already be within
    /// the engine's per-link clamp; callers chain multiple calls for factors
    /// outside ffmpeg's native `atempo` range.
    async fn time_stretch(&self, input: &Path, output: &Path, tempo: f64) -> TdseResult<()>;

    /// Concatenates `inputs` in order with a triangular cross-fade of
    /// `crossfade_ms` between each adjacent pair. A single input is copied
    /// through untouched.
    async fn concat_with_crossfade(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        crossfade_ms: u64,
    ) -> TdseResult<()>;

    /// Probes a file's duration in seconds.
    async fn probe_duration(&self, input: &Path) -> TdseResult<f64>;

    /// Generates `duration_s` seconds of silence at the internal PCM format.
    async fn generate_silence(&self, output: &Path, duration_s: f64) -> TdseResult<()>;
}

/// Production `AudioToolkit` backed by the system `ffmpeg`/`ffprobe` binaries.
pub struct FfmpegAudioToolkit {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegAudioToolkit {
    pub fn new(ffmpeg_path: impl Into<String>, ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    fn path_str(path: &Path) -> TdseResult<&str> {
        path.to_str().ok_or_else(|| {
            TdseError::audio_tool_failed("path contains invalid UTF-8".to_string())
        })
    }

    async fn run(&self, mut command: Command) -> TdseResult<()> {
        let output = command
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TdseError::audio_tool_failed(format!("failed to spawn process: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TdseError::audio_tool_failed(format!(
                "process exited with {}: {}",
                output.status, stderr
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AudioToolkit for FfmpegAudioToolkit {
    async fn convert_to_pcm(&self, input: &Path, output: &Path) -> TdseResult<()> {
        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(["-y", "-i"])
            .arg(Self::path_str(input)?)
            .args([
                "-ar",
                &SAMPLE_RATE_HZ.to_string(),
                "-ac",
                &CHANNELS.to_string(),
                "-sample_fmt",
                "s16",
            ])
            .arg(Self::path_str(output)?);
        self.run(command).await
    }

    async fn time_stretch(&self, input: &Path, output: &Path, tempo: f64) -> TdseResult<()> {
        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(["-y", "-i"])
            .arg(Self::path_str(input)?)
            .args(["-filter:a", &format!("atempo={:.6}", tempo)])
            .arg(Self::path_str(output)?);
        self.run(command).await
    }

    async fn concat_with_crossfade(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        crossfade_ms: u64,
    ) -> TdseResult<()> {
        if inputs.is_empty() {
            return Err(TdseError::audio_tool_failed(
                "concat_with_crossfade called with no inputs".to_string(),
            ));
        }
        if inputs.len() == 1 {
            tokio::fs::copy(&inputs[0], output)
                .await
                .map_err(|e| TdseError::audio_tool_failed(format!("copy failed: {}", e)))?;
            return Ok(());
        }

        let crossfade_s = crossfade_ms as f64 / 1000.0;
        let mut command = Command::new(&self.ffmpeg_path);
        command.arg("-y");
        for input in inputs {
            command.arg("-i").arg(Self::path_str(input)?);
        }

        let mut filter = String::new();
        let mut prev_label = "0".to_string();
        for i in 1..inputs.len() {
            let out_label = format!("x{}", i);
            filter.push_str(&format!(
                "[{}][{}]acrossfade=d={:.3}:c1=tri:c2=tri[{}];",
                prev_label, i, crossfade_s, out_label
            ));
            prev_label = out_label;
        }
        filter.pop();

        command
            .args(["-filter_complex", &filter])
            .args(["-map", &format!("[{}]", prev_label)])
            .arg(Self::path_str(output)?);
        self.run(command).await
    }

    async fn probe_duration(&self, input: &Path) -> TdseResult<f64> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(Self::path_str(input)?)
            .output()
            .await
            .map_err(|e| TdseError::audio_tool_failed(format!("failed to spawn ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TdseError::audio_tool_failed(format!(
                "ffprobe exited with {}: {}",
                output.status, stderr
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        text.trim()
            .parse::<f64>()
            .map_err(|e| TdseError::audio_tool_failed(format!("failed to parse duration: {}", e)))
    }

    async fn generate_silence(&self, output: &Path, duration_s: f64) -> TdseResult<()> {
        let output = output.to_path_buf();
        tokio::task::spawn_blocking(move || write_silence(&output, duration_s))
            .await
            .map_err(|e| TdseError::audio_tool_failed(format!("silence task panicked: {}", e)))?
    }
}

fn write_silence(output: &Path, duration_s: f64) -> TdseResult<()> {
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE_HZ,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(output, spec)
        .map_err(|e| TdseError::audio_tool_failed(format!("failed to create wav writer: {}", e)))?;

    let sample_count = (duration_s * SAMPLE_RATE_HZ as f64).round() as usize;
    for _ in 0..sample_count {
        writer
            .write_sample(0i16)
            .map_err(|e| TdseError::audio_tool_failed(format!("failed to write sample: {}", e)))?;
    }
    writer
        .finalize()
        .map_err(|e| TdseError::audio_tool_failed(format!("failed to finalize wav: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn generate_silence_writes_expected_sample_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        let toolkit = FfmpegAudioToolkit::new("ffmpeg", "ffprobe");
        toolkit.generate_silence(&path, 0.5).await.unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, CHANNELS);
        assert_eq!(spec.sample_rate, SAMPLE_RATE_HZ);
        assert_eq!(reader.len(), (0.5 * SAMPLE_RATE_HZ as f64).round() as u32);
    }

    #[tokio::test]
    async fn concat_with_crossfade_rejects_empty_input() {
        let dir = tempdir().unwrap();
        let toolkit = FfmpegAudioToolkit::new("ffmpeg", "ffprobe");
        let result = toolkit
            .concat_with_crossfade(&[], &dir.path().join("out.wav"), 10)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn concat_with_crossfade_single_input_copies_through() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("only.wav");
        let toolkit = FfmpegAudioToolkit::new("ffmpeg", "ffprobe");
        toolkit.generate_silence(&input, 0.1).await.unwrap();

        let output = dir.path().join("out.wav");
        toolkit
            .concat_with_crossfade(&[input.clone()], &output, 10)
            .await
            .unwrap();
        assert!(output.exists());
    }
}
