//! Video remuxer collaborator: copies the original video stream and replaces
//! the audio track with the dubbed one.

use crate::error::TdseError;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Video remux collaborator contract.
#[async_trait]
pub trait VideoRemuxer: Send + Sync {
    /// Produces `output_path` containing `video_path`'s video stream
    /// stream-copied and `dubbed_audio_path`'s audio track.
    async fn remux(
        &self,
        video_path: &Path,
        dubbed_audio_path: &Path,
        output_path: &Path,
    ) -> Result<()>;
}

/// Production remuxer backed by the `ffmpeg` binary.
pub struct FfmpegVideoRemuxer {
    ffmpeg_path: String,
}

impl FfmpegVideoRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    fn path_str(path: &Path) -> Result<&str> {
        path.to_str()
            .ok_or_else(|| TdseError::remux_failed("path contains invalid UTF-8".to_string()))
    }
}

#[async_trait]
impl VideoRemuxer for FfmpegVideoRemuxer {
    async fn remux(
        &self,
        video_path: &Path,
        dubbed_audio_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        let output = Command::new(&self.ffmpeg_path)
            .args(["-y", "-i"])
            .arg(Self::path_str(video_path)?)
            .arg("-i")
            .arg(Self::path_str(dubbed_audio_path)?)
            .args([
                "-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac", "-shortest",
            ])
            .arg(Self::path_str(output_path)?)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TdseError::remux_failed(format!("failed to spawn ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TdseError::remux_failed(format!(
                "ffmpeg exited with {}: {}",
                output.status, stderr
            )));
        }
        Ok(())
    }
}
