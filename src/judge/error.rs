use thiserror::Error;

/// Errors returned by the batch judge.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Network-level failure reaching the judge service.
    #[error("judge transport error: {0}")]
    Transport(String),

    /// The judge service answered with a non-success status.
    #[error("judge returned status {status}: {body}")]
    UpstreamStatus {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the service.
        body: String,
    },

    /// Provider client error (genai).
    #[error("judge provider error: {0}")]
    Provider(String),

    /// The judge answered with no text.
    #[error("judge returned an empty response")]
    EmptyResponse,

    /// The response held no usable JSON array, even after extraction.
    #[error("invalid judge response: {0}")]
    InvalidResponse(String),

    /// The batch could not be serialized for the outbound request.
    #[error("failed to serialize judge request: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Judging is switched off in configuration.
    #[error("judge is disabled")]
    Disabled,
}

impl JudgeError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            JudgeError::Transport(_) | JudgeError::Provider(_) => true,
            JudgeError::UpstreamStatus { status, .. } => *status == 429 || *status >= 500,
            JudgeError::EmptyResponse
            | JudgeError::InvalidResponse(_)
            | JudgeError::Serialization(_)
            | JudgeError::Disabled => false,
        }
    }
}
