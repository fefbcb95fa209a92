//! Chat-completion backends used by judges and the summarizer.
//!
//! The pipeline only needs "send these messages to that model, give me the
//! reply text". Which server answers is configuration.

pub mod ollama;
pub mod openai;

use crate::config::{BackendConfig, BackendKind};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-completion service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `messages` to `model` and return the assistant reply text.
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Build the backend described by `config`.
pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn ChatBackend>> {
    let backend: Arc<dyn ChatBackend> = match config.kind {
        BackendKind::Ollama => Arc::new(OllamaBackend::new(config)?),
        BackendKind::OpenAi => Arc::new(OpenAiBackend::new(config)?),
    };
    Ok(backend)
}
