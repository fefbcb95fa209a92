use crate::defaults;
use crate::error::{MatchJuryError, Result};
use crate::window::WindowConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub windowing: WindowingConfig,
    pub consensus: ConsensusConfig,
    pub backend: BackendConfig,
    pub judges: Vec<JudgeConfig>,
    pub summarizer: SummarizerConfig,
    pub output: OutputConfig,
}

/// Sliding-window sizing, in seconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowingConfig {
    pub window_size: u32,
    pub step_size: u32,
}

/// Vote threshold and summarizer fallback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Positive votes required to accept a window. `None` means simple majority.
    pub threshold: Option<usize>,
    /// Description used when summarization fails.
    pub sentinel: String,
}

/// Chat backend shared by judges and the summarizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Server URL; defaults depend on `kind`.
    pub base_url: Option<String>,
    pub model: String,
    /// Environment variable holding the bearer token (OpenAI-compatible only).
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

/// One ensemble member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeConfig {
    pub id: String,
    #[serde(default)]
    pub persona: Persona,
    /// Required for `persona = "custom"`, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Overrides `backend.model` for this judge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// What a judge looks for in a window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Outcome-changing events: goals, penalties, red cards.
    #[default]
    Impact,
    /// Emotionally charged moments: big saves, near misses, VAR drama.
    Drama,
    /// Momentum shifts, substitutions, build-up play.
    Tactical,
    /// Uses the judge's own `system_prompt`.
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Overrides `backend.model` for summaries.
    pub model: Option<String>,
}

/// Where artifacts are written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Label for file names and vote provenance; defaults to the backend model.
    pub tag: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            windowing: WindowingConfig::default(),
            consensus: ConsensusConfig::default(),
            backend: BackendConfig::default(),
            judges: default_judges(),
            summarizer: SummarizerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            window_size: defaults::WINDOW_SIZE,
            step_size: defaults::STEP_SIZE,
        }
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            sentinel: defaults::SUMMARY_SENTINEL.to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Ollama,
            base_url: None,
            model: defaults::DEFAULT_MODEL.to_string(),
            api_key_env: defaults::API_KEY_ENV.to_string(),
            timeout_secs: defaults::CALL_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            tag: None,
        }
    }
}

/// The reference three-judge panel.
pub fn default_judges() -> Vec<JudgeConfig> {
    [
        ("impact", Persona::Impact),
        ("drama", Persona::Drama),
        ("tactical", Persona::Tactical),
    ]
    .into_iter()
    .map(|(id, persona)| JudgeConfig {
        id: id.to_string(),
        persona,
        system_prompt: None,
        model: None,
    })
    .collect()
}

impl BackendConfig {
    /// Configured URL, or the default for this backend kind.
    pub fn resolved_base_url(&self) -> &str {
        match (&self.base_url, self.kind) {
            (Some(url), _) if !url.trim().is_empty() => url,
            (_, BackendKind::Ollama) => defaults::OLLAMA_URL,
            (_, BackendKind::OpenAi) => defaults::OPENAI_URL,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MatchJuryError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                MatchJuryError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(MatchJuryError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - MATCHJURY_MODEL → backend.model
    /// - MATCHJURY_BACKEND_URL → backend.base_url
    /// - MATCHJURY_BACKEND → backend.kind ("ollama" or "openai")
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("MATCHJURY_MODEL")
            && !model.is_empty()
        {
            self.backend.model = model;
        }

        if let Ok(url) = std::env::var("MATCHJURY_BACKEND_URL")
            && !url.is_empty()
        {
            self.backend.base_url = Some(url);
        }

        if let Ok(kind) = std::env::var("MATCHJURY_BACKEND") {
            match kind.to_ascii_lowercase().as_str() {
                "ollama" => self.backend.kind = BackendKind::Ollama,
                "openai" => self.backend.kind = BackendKind::OpenAi,
                _ => {}
            }
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/matchjury/config.toml on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("matchjury").join("config.toml"))
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, message: String| MatchJuryError::ConfigInvalidValue {
            key: key.to_string(),
            message,
        };

        if self.windowing.window_size == 0 {
            return Err(invalid(
                "windowing.window_size",
                "must be greater than zero".to_string(),
            ));
        }
        if self.windowing.step_size == 0 {
            return Err(invalid(
                "windowing.step_size",
                "must be greater than zero".to_string(),
            ));
        }
        if self.judges.is_empty() {
            return Err(invalid(
                "judges",
                "at least one judge is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for judge in &self.judges {
            if judge.id.trim().is_empty() {
                return Err(invalid("judges.id", "must not be empty".to_string()));
            }
            if !seen.insert(judge.id.as_str()) {
                return Err(invalid(
                    "judges.id",
                    format!("duplicate judge id '{}'", judge.id),
                ));
            }
            if judge.persona == Persona::Custom
                && judge
                    .system_prompt
                    .as_deref()
                    .is_none_or(|p| p.trim().is_empty())
            {
                return Err(invalid(
                    "judges.system_prompt",
                    format!("judge '{}' uses a custom persona without a prompt", judge.id),
                ));
            }
        }

        if let Some(threshold) = self.consensus.threshold
            && !(1..=self.judges.len()).contains(&threshold)
        {
            return Err(invalid(
                "consensus.threshold",
                format!("must be between 1 and {} (number of judges)", self.judges.len()),
            ));
        }

        if self.backend.timeout_secs == 0 {
            return Err(invalid(
                "backend.timeout_secs",
                "must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Vote threshold: configured value or simple majority of the panel.
    pub fn threshold(&self) -> usize {
        self.consensus
            .threshold
            .unwrap_or_else(|| defaults::majority_threshold(self.judges.len()))
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            window_size: self.windowing.window_size,
            step_size: self.windowing.step_size,
        }
    }

    /// Label used in artifact names and vote provenance.
    pub fn tag(&self) -> String {
        self.output
            .tag
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.backend.model.clone())
    }

    pub fn judge_model<'a>(&'a self, judge: &'a JudgeConfig) -> &'a str {
        judge.model.as_deref().unwrap_or(&self.backend.model)
    }

    pub fn summarizer_model(&self) -> &str {
        self.summarizer
            .model
            .as_deref()
            .unwrap_or(&self.backend.model)
    }
}

/// Commented configuration template matching the built-in defaults.
pub const CONFIG_TEMPLATE: &str = r#"# matchjury configuration

[windowing]
# Window length in seconds
window_size = 60
# Distance between window starts in seconds
step_size = 20

[consensus]
# Positive votes needed to accept a window (default: simple majority)
# threshold = 2
# Description used when the summarizer fails
sentinel = "Unknown event (error)"

[backend]
# "ollama" or "openai" (any OpenAI-compatible server)
kind = "ollama"
# base_url = "http://localhost:11434"
model = "llama3"
# Environment variable with the API key (openai only)
api_key_env = "OPENAI_API_KEY"
timeout_secs = 120
# temperature = 0.2

[[judges]]
id = "impact"
persona = "impact"

[[judges]]
id = "drama"
persona = "drama"

[[judges]]
id = "tactical"
persona = "tactical"

# [[judges]]
# id = "var"
# persona = "custom"
# system_prompt = "You review refereeing decisions..."
# model = "mistral"

[summarizer]
# model = "llama3"

[output]
dir = "."
# tag = "llama3"
"#;
