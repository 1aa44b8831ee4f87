//! Translator collaborator: turns source-language text into target-language text.

mod openai;

pub use openai::OpenAiClient;

use crate::error::TdseResult;
use async_trait::async_trait;

/// Translation collaborator contract.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> TdseResult<String>;
}

/// Production translator backed by an OpenAI-compatible chat completion API.
pub struct OpenAiTranslator {
    client: OpenAiClient,
}

impl OpenAiTranslator {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> TdseResult<String> {
        self.client
            .translate(text, source_language, target_language)
            .await
    }
}
