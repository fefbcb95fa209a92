//! Judges: independent evaluators producing one opinion per window.

pub mod ensemble;
pub mod mock;
pub mod prompt;
pub mod verdict;

use crate::backend::ChatBackend;
use crate::config::{Config, JudgeConfig, Persona};
use crate::error::Result;
use crate::window::Window;
use async_trait::async_trait;
use std::sync::Arc;

pub use ensemble::JudgeEnsemble;
pub use mock::MockJudge;
pub use verdict::{Verdict, parse_verdict};

/// An evaluator that reads a window and replies in free text.
///
/// The reply is reduced to a verdict by the ensemble, so implementations
/// only deal with transport.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Stable identifier, unique within an ensemble.
    fn id(&self) -> &str;

    /// Raw reply for `window`.
    async fn evaluate(&self, window: &Window) -> Result<String>;
}

/// Judge backed by a chat model with a persona prompt.
pub struct LlmJudge {
    id: String,
    persona: Persona,
    system_prompt: Option<String>,
    model: String,
    backend: Arc<dyn ChatBackend>,
}

impl LlmJudge {
    pub fn new(
        id: impl Into<String>,
        persona: Persona,
        model: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            id: id.into(),
            persona,
            system_prompt: None,
            model: model.into(),
            backend,
        }
    }

    /// Replace the persona's system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Judge for LlmJudge {
    fn id(&self) -> &str {
        &self.id
    }

    async fn evaluate(&self, window: &Window) -> Result<String> {
        let messages =
            prompt::judge_messages(self.persona, self.system_prompt.as_deref(), window);
        self.backend.chat(&self.model, &messages).await
    }
}

/// Build one [`LlmJudge`] per configured panel member.
pub fn build_judges(config: &Config, backend: &Arc<dyn ChatBackend>) -> Vec<Arc<dyn Judge>> {
    config
        .judges
        .iter()
        .map(|judge: &JudgeConfig| {
            let mut llm = LlmJudge::new(
                judge.id.clone(),
                judge.persona,
                config.judge_model(judge),
                Arc::clone(backend),
            );
            if judge.persona == Persona::Custom
                && let Some(ref prompt) = judge.system_prompt
            {
                llm = llm.with_system_prompt(prompt.clone());
            }
            Arc::new(llm) as Arc<dyn Judge>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ChatMessage;
    use std::sync::Mutex;

    /// Backend that records requests and echoes a fixed reply.
    struct RecordingBackend {
        reply: String,
        seen: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    }

    #[async_trait]
    impl ChatBackend for RecordingBackend {
        async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((model.to_string(), messages.to_vec()));
            Ok(self.reply.clone())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn window() -> Window {
        Window {
            start_seconds: 0,
            end_seconds: 60,
            events: vec!["[commentary] Red card".to_string()],
        }
    }

    #[tokio::test]
    async fn llm_judge_sends_persona_prompt_to_its_model() {
        let backend = Arc::new(RecordingBackend {
            reply: "YES".to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let judge = LlmJudge::new(
            "impact",
            Persona::Impact,
            "mistral",
            backend.clone() as Arc<dyn ChatBackend>,
        );

        let reply = judge.evaluate(&window()).await.unwrap();

        assert_eq!(reply, "YES");
        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "mistral");
        assert!(seen[0].1[1].content.contains("Red card"));
    }

    #[tokio::test]
    async fn build_judges_follows_config() {
        let recorder = Arc::new(RecordingBackend {
            reply: "NO".to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let backend: Arc<dyn ChatBackend> = recorder.clone();
        let mut config = Config::default();
        config.judges[2].model = Some("phi3".to_string());

        let judges = build_judges(&config, &backend);

        let ids: Vec<&str> = judges.iter().map(|j| j.id()).collect();
        assert_eq!(ids, vec!["impact", "drama", "tactical"]);

        for judge in &judges {
            judge.evaluate(&window()).await.unwrap();
        }
        let models: Vec<String> = recorder
            .seen
            .lock()
            .unwrap()
            .iter()
            .map(|(model, _)| model.clone())
            .collect();
        assert_eq!(models, vec!["llama3", "llama3", "phi3"]);
    }

    #[tokio::test]
    async fn system_prompt_only_replaces_custom_personas() {
        let recorder = Arc::new(RecordingBackend {
            reply: "NO".to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let backend: Arc<dyn ChatBackend> = recorder.clone();
        let mut config = Config::default();
        config.judges[0].system_prompt = Some("Only count corners.".to_string());
        config.judges.push(JudgeConfig {
            id: "corners".to_string(),
            persona: Persona::Custom,
            system_prompt: Some("Only count corners.".to_string()),
            model: None,
        });

        let judges = build_judges(&config, &backend);
        judges[0].evaluate(&window()).await.unwrap();
        judges[3].evaluate(&window()).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert!(!seen[0].1[0].content.contains("Only count corners."));
        assert!(seen[1].1[0].content.starts_with("Only count corners."));
    }
}
