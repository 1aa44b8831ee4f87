//! OpenAI chat-completion-backed translator client.

use crate::config::TranslatorConfig;
use crate::error::TdseError;
use crate::Result;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time;

/// OpenAI chat-completion client, used to translate text for the dub pipeline.
#[derive(Debug)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    retry_attempts: u32,
    retry_delay_ms: u64,
    base_url: String,
}

impl OpenAiClient {
    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TdseError::config("missing translator API key".to_string()))?;

        Self::validate_base_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| TdseError::translation_failed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn validate_base_url(url: &str) -> Result<()> {
        let parsed = url::Url::parse(url)
            .map_err(|e| TdseError::config(format!("invalid base URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TdseError::config(
                "base URL must use http or https protocol".to_string(),
            ));
        }
        Ok(())
    }

    /// Translates `text` from `source_language` (or auto-detected) into `target_language`.
    pub async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String> {
        let source = source_language.unwrap_or("the source language");
        let system = format!(
            "You are a professional subtitle translator. Translate from {} to {}. \
             Preserve meaning and tone; return only the translated text with no commentary.",
            source, target_language
        );
        let messages = vec![
            json!({"role": "system", "content": system}),
            json!({"role": "user", "content": text}),
        ];
        self.chat_completion(messages).await
    }

    async fn chat_completion(&self, messages: Vec<Value>) -> Result<String> {
        let request_body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body);

        let response = self.send_with_retry(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TdseError::translation_failed(format!(
                "OpenAI API error {}: {}",
                status, text
            )));
        }

        let response_json: Value = response.json().await?;
        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| TdseError::translation_failed("invalid API response format".to_string()))?;

        let content = content.to_string();
        if !content.is_ascii() && std::str::from_utf8(content.as_bytes()).is_err() {
            return Err(TdseError::translation_failed(
                "translator returned invalid UTF-8".to_string(),
            ));
        }
        Ok(content)
    }

    async fn send_with_retry(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let mut attempts = 0;
        loop {
            let attempt = request
                .try_clone()
                .ok_or_else(|| TdseError::translation_failed("translator request body is not cloneable".to_string()))?;
            match attempt.send().await {
                Ok(resp) => return Ok(resp),
                Err(_e) if attempts < self.retry_attempts => {
                    attempts += 1;
                    time::sleep(Duration::from_millis(self.retry_delay_ms)).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> TranslatorConfig {
        TranslatorConfig {
            provider: "openai".to_string(),
            api_key: Some("test-key".to_string()),
            model: "gpt-4o-mini".to_string(),
            base_url,
            temperature: 0.3,
            max_tokens: 1000,
            retry_attempts: 1,
            retry_delay_ms: 0,
            request_timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn translate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ciao mondo"}}]
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::from_config(&config(server.uri())).unwrap();
        let result = client.translate("hello world", Some("en"), "it").await.unwrap();
        assert_eq!(result, "ciao mondo");
    }

    #[tokio::test]
    async fn translate_propagates_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "bad request"}
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::from_config(&config(server.uri())).unwrap();
        let result = client.translate("hello", Some("en"), "it").await;
        assert!(result.is_err());
    }

    #[test]
    fn rejects_invalid_base_url() {
        let cfg = config("ftp://invalid.url".to_string());
        assert!(OpenAiClient::from_config(&cfg).is_err());
    }

    #[test]
    fn rejects_missing_api_key() {
        let mut cfg = config("https://api.openai.com/v1".to_string());
        cfg.api_key = None;
        assert!(OpenAiClient::from_config(&cfg).is_err());
    }
}
