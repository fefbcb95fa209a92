//! Default configuration constants for matchjury.
//!
//! Shared between the config types, the CLI and the pipeline so the
//! reference configuration is defined in one place.

/// Default window length in seconds.
pub const WINDOW_SIZE: u32 = 60;

/// Default distance in seconds between consecutive window starts.
pub const STEP_SIZE: u32 = 20;

/// Length of one half in seconds. Second-half match times are offset by this.
pub const HALF_LENGTH_SECS: u32 = 45 * 60;

/// Description written when the summarizer fails for an accepted window.
pub const SUMMARY_SENTINEL: &str = "Unknown event (error)";

/// Default chat model used by judges and the summarizer.
pub const DEFAULT_MODEL: &str = "llama3";

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default OpenAI-compatible endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the API key for OpenAI-compatible backends.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Per-call timeout for judge and summarizer requests, in seconds.
pub const CALL_TIMEOUT_SECS: u64 = 120;

/// Prefix attached to every caption-derived event text.
pub const CAPTION_PREFIX: &str = "[commentary]";

/// Prefix attached to every transcript-derived event text.
pub const TRANSCRIPT_PREFIX: &str = "[transcript]";

/// Majority threshold for `judges` voters: `ceil((judges + 1) / 2)`.
///
/// 2 of 3, 3 of 4, 3 of 5.
pub fn majority_threshold(judges: usize) -> usize {
    (judges + 2) / 2
}
