//! Speech recognizer collaborator: turns an audio file into timed segments.

mod client;

pub use client::{WhisperApiClient, WhisperResponse, WhisperSegment};

use crate::config::RecognizerConfig;
use crate::core::dub::types::{RecognitionOutput, RecognizerSegment};
use crate::error::TdseResult;
use async_trait::async_trait;
use std::path::Path;

/// Speech-to-text collaborator contract.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, audio_path: &Path) -> TdseResult<RecognitionOutput>;
}

/// Production recognizer backed by the OpenAI Whisper API.
pub struct WhisperRecognizer {
    client: WhisperApiClient,
}

impl WhisperRecognizer {
    pub fn new(api_key: String, base_url: String, config: RecognizerConfig) -> TdseResult<Self> {
        Ok(Self {
            client: WhisperApiClient::new(api_key, base_url, config)?,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    async fn recognize(&self, audio_path: &Path) -> TdseResult<RecognitionOutput> {
        let response = self.client.transcribe(audio_path).await?;
        let mut segments = Vec::with_capacity(response.segments.len());
        for s in response.segments {
            segments.push(RecognizerSegment {
                start_s: s.start_seconds()?,
                end_s: s.end_seconds()?,
                text: s.text,
            });
        }

        Ok(RecognitionOutput {
            text: response.text,
            language: response.language.unwrap_or_else(|| "auto".to_string()),
            segments,
        })
    }
}
