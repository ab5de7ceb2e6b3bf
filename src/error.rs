//! Error types for Prat.

use thiserror::Error;

/// Library-level error type for Prat operations.
#[derive(Error, Debug)]
pub enum PratError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Dialogue generation failed: {0}")]
    Dialogue(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Audio processing error: {0}")]
    Audio(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Subtitle generation failed: {0}")]
    Subtitle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Prat operations.
pub type Result<T> = std::result::Result<T, PratError>;
