//! Audio demuxer collaborator: extracts a mono PCM waveform from a video container.

use crate::error::TdseError;
use crate::services::audio::{CHANNELS, SAMPLE_RATE_HZ};
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Audio demux collaborator contract.
#[async_trait]
pub trait AudioDemuxer: Send + Sync {
    /// Extracts the audio track of `video_path` to a mono 44.1 kHz PCM WAV
    /// file at `output_path`.
    async fn demux(&self, video_path: &Path, output_path: &Path) -> Result<()>;
}

/// Production demuxer backed by the `ffmpeg` binary.
pub struct FfmpegAudioDemuxer {
    ffmpeg_path: String,
}

impl FfmpegAudioDemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    fn path_str(path: &Path) -> Result<&str> {
        path.to_str()
            .ok_or_else(|| TdseError::demux_failed("path contains invalid UTF-8".to_string()))
    }
}

#[async_trait]
impl AudioDemuxer for FfmpegAudioDemuxer {
    async fn demux(&self, video_path: &Path, output_path: &Path) -> Result<()> {
        let output = Command::new(&self.ffmpeg_path)
            .args(["-y", "-i"])
            .arg(Self::path_str(video_path)?)
            .args([
                "-vn",
                "-ar",
                &SAMPLE_RATE_HZ.to_string(),
                "-ac",
                &CHANNELS.to_string(),
                "-sample_fmt",
                "s16",
            ])
            .arg(Self::path_str(output_path)?)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TdseError::demux_failed(format!("failed to spawn ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TdseError::demux_failed(format!(
                "ffmpeg exited with {}: {}",
                output.status, stderr
            )));
        }
        Ok(())
    }
}
