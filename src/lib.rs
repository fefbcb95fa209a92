//! matchjury - match highlights by ensemble vote
//!
//! Slices timestamped commentary into overlapping windows, asks a panel of
//! LLM judges about each one, and keeps the windows a majority agrees on.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod app;
pub mod artifacts;
pub mod backend;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod consensus;
pub mod defaults;
pub mod detector;
pub mod error;
pub mod judge;
pub mod timeline;
pub mod window;

// Core traits (window → judge → summarize)
pub use backend::ChatBackend;
pub use consensus::Summarizer;
pub use judge::Judge;

// Pipeline
pub use consensus::{ConsensusAggregator, Decision};
pub use detector::{Detection, HighlightDetector, RunReport};
pub use judge::JudgeEnsemble;
pub use timeline::{Timeline, build_timeline, load_timeline};
pub use window::{Window, WindowConfig, generate_windows};

// Error handling
pub use error::{MatchJuryError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
