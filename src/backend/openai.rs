//! OpenAI-compatible chat backend (`POST /chat/completions`).
//!
//! Works with OpenAI, OpenRouter, vLLM, llama.cpp server and friends. The
//! bearer token is read from the environment variable named in the config.

use crate::backend::{ChatBackend, ChatMessage};
use crate::config::BackendConfig;
use crate::error::{MatchJuryError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const NAME: &str = "openai";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiBackend {
    base_url: String,
    api_key: Option<String>,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MatchJuryError::Backend {
                backend: NAME.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Ok(Self {
            base_url: config.resolved_base_url().trim_end_matches('/').to_string(),
            api_key,
            temperature: config.temperature,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn first_choice_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| MatchJuryError::MalformedResponse {
            backend: NAME.to_string(),
            message: "response carried no message content".to_string(),
        })
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let body = ChatRequest {
            model,
            messages,
            temperature: self.temperature,
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| MatchJuryError::Backend {
            backend: NAME.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(MatchJuryError::Backend {
                backend: NAME.to_string(),
                message: format!("status {status}: {}", detail.trim()),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| MatchJuryError::MalformedResponse {
                    backend: NAME.to_string(),
                    message: e.to_string(),
                })?;

        first_choice_content(parsed)
    }

    fn name(&self) -> &str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;

    #[test]
    fn request_omits_missing_temperature() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: &[],
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("temperature").is_none());
        assert_eq!(json["model"], "gpt-4o-mini");
    }

    #[test]
    fn first_choice_is_trimmed() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"  NO. Nothing happens.\n"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_choice_content(parsed).unwrap(), "NO. Nothing happens.");
    }

    #[test]
    fn empty_choices_are_malformed() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        let err = first_choice_content(parsed).unwrap_err();
        assert!(matches!(err, MatchJuryError::MalformedResponse { .. }));
    }

    #[test]
    fn null_content_is_malformed() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(first_choice_content(parsed).is_err());
    }

    #[test]
    fn endpoint_uses_default_base_url() {
        let config = BackendConfig {
            kind: BackendKind::OpenAi,
            ..BackendConfig::default()
        };
        let backend = OpenAiBackend::new(&config).unwrap();
        assert_eq!(backend.endpoint(), "https://api.openai.com/v1/chat/completions");
    }
}
