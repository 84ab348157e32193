//! Error types for the studio pipeline.

use thiserror::Error;

/// Errors produced by the studio library.
#[derive(Debug, Error)]
pub enum StudioError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (missing keys, unknown task, bad settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Script parsing error (LLM extraction failed or returned garbage)
    #[error("Script parsing error: {0}")]
    ScriptParsing(String),

    /// Transcript validation error (rows unusable before synthesis)
    #[error("Transcript validation error: {0}")]
    TranscriptValidation(String),

    /// Speech generation error (TTS API failure for a row)
    #[error("Speech generation error: {0}")]
    SpeechGeneration(String),

    /// Audio processing error (ffmpeg/ffprobe failures)
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    /// Clip archive error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl From<&str> for StudioError {
    fn from(s: &str) -> Self {
        StudioError::Other(s.to_string())
    }
}

impl From<String> for StudioError {
    fn from(s: String) -> Self {
        StudioError::Other(s)
    }
}

/// Result type for the studio library.
pub type Result<T> = std::result::Result<T, StudioError>;
