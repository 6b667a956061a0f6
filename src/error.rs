//! Error types for the commentary pipeline.

/// Top-level error type for the commentary assistant.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Remote sentiment classification error.
    #[error("sentiment error: {0}")]
    Sentiment(String),

    /// Speech synthesis or playback error.
    #[error("speech error: {0}")]
    Speech(String),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AssistantError>;
