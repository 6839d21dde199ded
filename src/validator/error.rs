use thiserror::Error;

use crate::judge::JudgeError;

/// Errors returned by [`super::Validator::validate`] and request parsing.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The request was structurally invalid; nothing was processed.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The judge call failed and the failure policy is [`super::JudgeFailurePolicy::Fail`].
    #[error(transparent)]
    Judge(#[from] JudgeError),
}

impl ValidatorError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidatorError::InvalidPayload(message.into())
    }
}
