//! Ollama chat backend (`POST /api/chat`, non-streaming).

use crate::backend::{ChatBackend, ChatMessage};
use crate::config::BackendConfig;
use crate::error::{MatchJuryError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const NAME: &str = "ollama";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<RequestOptions>,
}

#[derive(Serialize)]
struct RequestOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a local or remote Ollama server.
pub struct OllamaBackend {
    base_url: String,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MatchJuryError::Backend {
                backend: NAME.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url: config.resolved_base_url().trim_end_matches('/').to_string(),
            temperature: config.temperature,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let body = ChatRequest {
            model,
            messages,
            stream: false,
            options: self.temperature.map(|temperature| RequestOptions { temperature }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| MatchJuryError::Backend {
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

        Ok(parsed.message.content.trim().to_string())
    }

    fn name(&self) -> &str {
        NAME
    }
}
