//! One-sentence event summaries for accepted windows.

use crate::backend::ChatBackend;
use crate::error::{MatchJuryError, Result};
use crate::judge::prompt::summary_messages;
use crate::window::Window;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Produces a short natural-language description of a window.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, window: &Window) -> Result<String>;

    /// Name for logging.
    fn name(&self) -> &str;
}

/// Summarizer backed by a chat model.
pub struct LlmSummarizer {
    model: String,
    backend: Arc<dyn ChatBackend>,
}

impl LlmSummarizer {
    pub fn new(model: impl Into<String>, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            model: model.into(),
            backend,
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, window: &Window) -> Result<String> {
        let reply = self
            .backend
            .chat(&self.model, &summary_messages(window))
            .await?;
        let sentence = reply.trim();
        if sentence.is_empty() {
            return Err(MatchJuryError::MalformedResponse {
                backend: self.backend.name().to_string(),
                message: "empty summary".to_string(),
            });
        }
        Ok(sentence.to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Mock summarizer for testing
#[derive(Debug, Clone)]
pub struct MockSummarizer {
    response: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockSummarizer {
    /// Summarizer answering `response` for every window.
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Summarizer that fails every call.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _window: &Window) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().ok_or_else(|| MatchJuryError::Backend {
            backend: "mock".to_string(),
            message: "mock summarizer failure".to_string(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
