use super::Translator;
use crate::config::TranslationConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for OpenAI Chat Completions translation calls
pub struct OpenAiTranslator {
    api_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client for OpenAiTranslator")?;

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn extract_text(response: ChatCompletionResponse) -> Result<String> {
        let Some(choice) = response.choices.into_iter().next() else {
            bail!("No choices in translation response");
        };
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl Translator for OpenAiTranslator {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn translate(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("No translation API key configured");
        };

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Translation request failed")?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            bail!("Translation API returned {}: {}", status, message);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse translation response")?;

        let text = Self::extract_text(body)?;
        debug!(chars = text.len(), "Translation received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4-1106-preview",
            messages: vec![ChatMessage {
                role: "user",
                content: "Translate: Hello ",
            }],
            max_tokens: 300,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4-1106-preview");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Translate: Hello ");
    }

    #[test]
    fn test_extract_text() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Hallo wereld" },
                "finish_reason": "stop"
            }]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(OpenAiTranslator::extract_text(response).unwrap(), "Hallo wereld");
    }

    #[test]
    fn test_extract_text_without_choices() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(OpenAiTranslator::extract_text(response).is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let translator = OpenAiTranslator::new(&TranslationConfig {
            api_key: None,
            ..Default::default()
        })
        .unwrap();

        let err = translator.translate("Translate: Hello ").await.unwrap_err();
        assert!(err.to_string().contains("API key"));
    }
}
