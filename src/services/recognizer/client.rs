//! Whisper API HTTP client: multipart upload, verbose JSON transcription response.

use crate::config::RecognizerConfig;
use crate::core::dub::timestamp::parse_timestamp;
use crate::error::TdseError;
use crate::Result;
use reqwest::{Client, multipart::Form};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio_util::codec::{BytesCodec, FramedRead};

/// OpenAI Whisper API client.
pub struct WhisperApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    config: RecognizerConfig,
}

impl WhisperApiClient {
    pub fn new(api_key: String, base_url: String, config: RecognizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TdseError::recognition_failed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            config,
        })
    }

    /// Transcribes `audio_path`, retrying up to `config.max_retries` times.
    pub async fn transcribe(&self, audio_path: &Path) -> Result<WhisperResponse> {
        let mut retries = 0;
        let mut last_error = None;

        while retries <= self.config.max_retries {
            match self.try_transcribe(audio_path).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    last_error = Some(e);
                    if retries < self.config.max_retries {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                        retries += 1;
                        continue;
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| TdseError::recognition_failed("unknown Whisper API error")))
    }

    async fn try_transcribe(&self, audio_path: &Path) -> Result<WhisperResponse> {
        let file = File::open(audio_path)
            .await
            .map_err(|e| TdseError::recognition_failed(format!("failed to open audio file: {}", e)))?;
        let stream = FramedRead::new(file, BytesCodec::new());
        let body = reqwest::Body::wrap_stream(stream);

        let filename = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());
        let mut form = Form::new()
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word")
            .text("timestamp_granularities[]", "segment")
            .part(
                "file",
                reqwest::multipart::Part::stream(body)
                    .file_name(filename)
                    .mime_str("audio/wav")?,
            );

        if self.config.language != "auto" {
            form = form.text("language", self.config.language.clone());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TdseError::recognition_failed(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TdseError::recognition_failed(format!(
                "Whisper API error {}: {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TdseError::recognition_failed(format!("failed to parse response: {}", e)))
    }
}

/// Whisper API response, verbose JSON form.
#[derive(Debug, Deserialize)]
pub struct WhisperResponse {
    pub text: String,
    pub language: Option<String>,
    pub segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
pub struct WhisperSegment {
    start: RawTimestamp,
    end: RawTimestamp,
    pub text: String,
}

impl WhisperSegment {
    /// Resolves the segment's start time in seconds, parsing a
    /// `HH:MM:SS,mmm`-style string timestamp if the provider sent one
    /// instead of Whisper's native numeric-seconds form.
    pub fn start_seconds(&self) -> Result<f64> {
        self.start.to_seconds()
    }

    /// Resolves the segment's end time in seconds; see [`Self::start_seconds`].
    pub fn end_seconds(&self) -> Result<f64> {
        self.end.to_seconds()
    }
}

/// A segment timestamp as the JSON payload sent it: either Whisper's native
/// float-seconds, or a string timestamp from a recognizer that reports the
/// dual format described in the timestamp ingest module.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(f64),
    Text(String),
}

impl RawTimestamp {
    fn to_seconds(&self) -> Result<f64> {
        match self {
            RawTimestamp::Seconds(s) => Ok(*s),
            RawTimestamp::Text(t) => parse_timestamp(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecognizerConfig;

    #[test]
    fn deserializes_native_numeric_seconds() {
        let seg: WhisperSegment =
            serde_json::from_str(r#"{"start": 1.5, "end": 3.25, "text": "hi"}"#).unwrap();
        assert_eq!(seg.start_seconds().unwrap(), 1.5);
        assert_eq!(seg.end_seconds().unwrap(), 3.25);
    }

    #[test]
    fn deserializes_string_timestamp_form() {
        let seg: WhisperSegment = serde_json::from_str(
            r#"{"start": "00:00:01,500", "end": "00:00:03,250", "text": "hi"}"#,
        )
        .unwrap();
        assert_eq!(seg.start_seconds().unwrap(), 1.5);
        assert_eq!(seg.end_seconds().unwrap(), 3.25);
    }

    #[test]
    fn rejects_malformed_string_timestamp() {
        let seg: WhisperSegment =
            serde_json::from_str(r#"{"start": "garbage", "end": 1.0, "text": "hi"}"#).unwrap();
        assert!(seg.start_seconds().is_err());
    }

    #[tokio::test]
    async fn creates_client_from_config() {
        let cfg = RecognizerConfig::default();
        let client = WhisperApiClient::new("key".into(), "https://api.openai.com/v1".into(), cfg);
        assert!(client.is_ok());
    }
}
