//! Video acquirer collaborator: yields a local file path for either a remote
//! URL download or a local file already on disk.

use crate::core::dub::types::VideoSource;
use crate::error::TdseError;
use crate::Result;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Video acquisition collaborator contract.
#[async_trait]
pub trait VideoAcquirer: Send + Sync {
    /// Resolves `source` to a local file path under `workspace`, downloading
    /// it first if it is a remote URL.
    async fn acquire(&self, source: &VideoSource, workspace: &Path) -> Result<PathBuf>;
}

/// Production acquirer: downloads via `reqwest` or passes local paths through.
pub struct HttpVideoAcquirer {
    client: reqwest::Client,
}

impl HttpVideoAcquirer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpVideoAcquirer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoAcquirer for HttpVideoAcquirer {
    async fn acquire(&self, source: &VideoSource, workspace: &Path) -> Result<PathBuf> {
        match source {
            VideoSource::LocalPath(path) => {
                if !path.exists() {
                    return Err(TdseError::acquisition_failed(format!(
                        "local video file not found: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            VideoSource::Url(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| TdseError::acquisition_failed(format!("download failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(TdseError::acquisition_failed(format!(
                        "download returned status {}",
                        response.status()
                    )));
                }

                let filename = url
                    .path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .filter(|s| !s.is_empty())
                    .unwrap_or("source_video")
                    .to_string();
                let dest = workspace.join(filename);

                let mut file = tokio::fs::File::create(&dest)
                    .await
                    .map_err(|e| TdseError::acquisition_failed(format!("failed to create file: {}", e)))?;

                let mut stream = response.bytes_stream();
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk.map_err(|e| {
                        TdseError::acquisition_failed(format!("download stream error: {}", e))
                    })?;
                    file.write_all(&chunk).await.map_err(|e| {
                        TdseError::acquisition_failed(format!("failed to write chunk: {}", e))
                    })?;
                }

                Ok(dest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_path_passthrough_fails_for_missing_file() {
        let acquirer = HttpVideoAcquirer::new();
        let dir = tempfile::tempdir().unwrap();
        let source = VideoSource::LocalPath(dir.path().join("missing.mp4"));
        let result = acquirer.acquire(&source, dir.path()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn local_path_passthrough_succeeds_for_existing_file() {
        let acquirer = HttpVideoAcquirer::new();
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("video.mp4");
        tokio::fs::write(&file_path, b"fake video bytes").await.unwrap();

        let source = VideoSource::LocalPath(file_path.clone());
        let resolved = acquirer.acquire(&source, dir.path()).await.unwrap();
        assert_eq!(resolved, file_path);
    }
}
