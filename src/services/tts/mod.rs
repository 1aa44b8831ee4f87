//! Neural voice synthesizer collaborator.
//!
//! Sends `(text, voice, rate)` to an HTTP TTS endpoint and converts the
//! returned compressed audio stream to the engine's internal PCM format via
//! the [`AudioToolkit`](crate::services::audio::AudioToolkit).

use crate::config::TtsConfig;
use crate::error::TdseError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Neural voice synthesizer collaborator contract.
///
/// Returns a path to a file containing the synthesized audio, already
/// converted to the engine's internal PCM WAV format.
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        rate: &str,
        output_path: &std::path::Path,
    ) -> Result<()>;
}

/// Production synthesizer backed by an HTTP TTS API.
pub struct HttpVoiceSynthesizer {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl HttpVoiceSynthesizer {
    pub fn from_config(config: &TtsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| TdseError::audio_tool_failed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    async fn request_audio(&self, text: &str, voice: &str, rate: &str) -> Result<Vec<u8>> {
        let mut attempts = 0;
        loop {
            let mut request = self
                .client
                .post(format!("{}/synthesize", self.base_url))
                .json(&serde_json::json!({
                    "text": text,
                    "voice": voice,
                    "rate": rate,
                }));
            if let Some(key) = &self.api_key {
                request = request.header("Authorization", format!("Bearer {}", key));
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    let bytes = response.bytes().await.map_err(|e| {
                        TdseError::audio_tool_failed(format!("failed to read TTS response body: {}", e))
                    })?;
                    if bytes.is_empty() {
                        return Err(TdseError::SynthesisFailed(0));
                    }
                    return Ok(bytes.to_vec());
                }
                Ok(response) => {
                    let status = response.status();
                    if attempts < self.retry_attempts {
                        attempts += 1;
                        tokio::time::sleep(Duration::from_millis(self.retry_delay_ms)).await;
                        continue;
                    }
                    return Err(TdseError::audio_tool_failed(format!(
                        "TTS API returned status {}",
                        status
                    )));
                }
                Err(e) => {
                    if attempts < self.retry_attempts {
                        attempts += 1;
                        tokio::time::sleep(Duration::from_millis(self.retry_delay_ms)).await;
                        continue;
                    }
                    return Err(TdseError::audio_tool_failed(format!(
                        "TTS request failed: {}",
                        e
                    )));
                }
            }
        }
    }
}

#[async_trait]
impl VoiceSynthesizer for HttpVoiceSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        rate: &str,
        output_path: &std::path::Path,
    ) -> Result<()> {
        let bytes = self.request_audio(text, voice, rate).await?;
        let mut file = tokio::fs::File::create(output_path)
            .await
            .map_err(|e| TdseError::audio_tool_failed(format!("failed to create output file: {}", e)))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| TdseError::audio_tool_failed(format!("failed to write synthesized audio: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> TtsConfig {
        TtsConfig {
            provider: "azure-speech".to_string(),
            api_key: Some("key".to_string()),
            base_url,
            request_timeout_seconds: 5,
            retry_attempts: 1,
            retry_delay_ms: 0,
            sample_rate: 44100,
            channels: 1,
        }
    }

    #[tokio::test]
    async fn synthesize_writes_returned_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/synthesize"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3, 4]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.bin");
        let synth = HttpVoiceSynthesizer::from_config(&config(server.uri())).unwrap();
        synth.synthesize("hello", "en-US-JennyNeural", "+0%", &output).await.unwrap();

        let written = tokio::fs::read(&output).await.unwrap();
        assert_eq!(written, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn empty_stream_is_synthesis_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/synthesize"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::<u8>::new()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.bin");
        let synth = HttpVoiceSynthesizer::from_config(&config(server.uri())).unwrap();
        let result = synth.synthesize("hello", "en-US-JennyNeural", "+0%", &output).await;
        assert!(result.is_err());
    }
}
