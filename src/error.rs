//! Error types for the talking friend assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the assistant and its TTS proxy
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Bad or missing required input
    #[error("validation error: {0}")]
    Validation(String),

    /// TTS provider answered with a non-success status
    #[error("upstream error {status}: {body}")]
    Upstream {
        /// HTTP status returned by the provider
        status: u16,
        /// Response body text, verbatim
        body: String,
    },

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Speech recognition capability failure
    #[error("adapter error: {0}")]
    Adapter(String),

    /// Speech output failure
    #[error("speech error: {0}")]
    Speech(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
