//! Error types for matchjury.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchJuryError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Ingestion errors
    #[error("Input contains no usable events")]
    EmptyInput,

    #[error("Invalid match time {value:?}: {message}")]
    InvalidMatchTime { value: String, message: String },

    #[error("Failed to parse input document: {message}")]
    InputParse { message: String },

    // Judge / summarizer backend errors
    #[error("Backend {backend} request failed: {message}")]
    Backend { backend: String, message: String },

    #[error("Backend {backend} returned a malformed response: {message}")]
    MalformedResponse { backend: String, message: String },

    #[error("Judge {judge} timed out after {secs}s")]
    JudgeTimeout { judge: String, secs: u64 },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MatchJuryError>;
