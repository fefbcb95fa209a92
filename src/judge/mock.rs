//! Mock judge for testing

use crate::error::{MatchJuryError, Result};
use crate::judge::Judge;
use crate::window::Window;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behaviour {
    Reply(String),
    /// Reply YES when any event contains the keyword, NO otherwise.
    Keyword(String),
    Fail,
}

/// Scriptable judge; clones share the call counter.
#[derive(Debug, Clone)]
pub struct MockJudge {
    id: String,
    behaviour: Behaviour,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockJudge {
    /// Create a judge that always answers "NO".
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            behaviour: Behaviour::Reply("NO".to_string()),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always reply with `response`.
    pub fn with_response(mut self, response: &str) -> Self {
        self.behaviour = Behaviour::Reply(response.to_string());
        self
    }

    /// Reply YES only for windows mentioning `keyword`.
    pub fn voting_yes_on(mut self, keyword: &str) -> Self {
        self.behaviour = Behaviour::Keyword(keyword.to_string());
        self
    }

    /// Fail every call with a backend error.
    pub fn with_failure(mut self) -> Self {
        self.behaviour = Behaviour::Fail;
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `evaluate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Judge for MockJudge {
    fn id(&self) -> &str {
        &self.id
    }

    async fn evaluate(&self, window: &Window) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.behaviour {
            Behaviour::Reply(text) => Ok(text.clone()),
            Behaviour::Keyword(keyword) => {
                let hit = window.events.iter().any(|e| e.contains(keyword.as_str()));
                Ok(if hit { "YES" } else { "NO" }.to_string())
            }
            Behaviour::Fail => Err(MatchJuryError::Backend {
                backend: "mock".to_string(),
                message: "mock judge failure".to_string(),
            }),
        }
    }
}
