//! Command-line interface for matchjury
//!
//! Provides argument parsing using clap derive macros.

use crate::timeline::InputFormat;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Find match highlights in timestamped commentary with an ensemble of LLM judges
#[derive(Parser, Debug)]
#[command(name = "matchjury", version, about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-judge verdicts, -vv: everything)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Input selection and window sizing shared by `detect` and `windows`
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Caption (`{"annotations": [...]}`) or transcript (`[...]`) JSON file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format: auto, captions or transcript
    #[arg(long, value_name = "FORMAT", default_value = "auto")]
    pub format: InputFormat,

    /// Window length in seconds (default: 60)
    #[arg(long, value_name = "SECONDS")]
    pub window_size: Option<u32>,

    /// Distance between window starts in seconds (default: 20)
    #[arg(long, value_name = "SECONDS")]
    pub step_size: Option<u32>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every window with the judge panel and write highlight artifacts
    Detect {
        #[command(flatten)]
        input: InputArgs,

        /// Directory for the output JSON files
        #[arg(long, short = 'o', value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Label for output file names and vote provenance (default: model name)
        #[arg(long, value_name = "TAG")]
        tag: Option<String>,

        /// Chat model for all judges and the summarizer
        #[arg(long, short = 'm', value_name = "MODEL")]
        model: Option<String>,

        /// Backend URL (e.g. http://localhost:11434)
        #[arg(long, value_name = "URL")]
        backend_url: Option<String>,

        /// Positive votes needed to accept a window (default: majority)
        #[arg(long, short = 't', value_name = "VOTES")]
        threshold: Option<usize>,

        /// Per-call timeout for judges and summarizer. Examples: 90s, 2m
        #[arg(long, value_name = "DURATION", value_parser = parse_timeout_secs)]
        timeout: Option<u64>,
    },

    /// Print the generated windows as JSON without calling any judge
    Windows {
        #[command(flatten)]
        input: InputArgs,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Dump a commented configuration template
    Dump,
    /// Print the default configuration file path
    Path,
    /// Print the effective configuration (file + environment) as TOML
    Show,
}

/// Parse a timeout string into whole seconds.
///
/// Bare numbers are seconds; anything else goes through `humantime`
/// (`90s`, `2m`, `1m30s`).
fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let secs = match s.parse::<u64>() {
        Ok(secs) => secs,
        Err(_) => humantime::parse_duration(s)
            .map(|d| d.as_secs())
            .map_err(|e| e.to_string())?,
    };
    if secs == 0 {
        return Err("timeout must be at least one second".to_string());
    }
    Ok(secs)
}
