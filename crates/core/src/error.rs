//! Local failures: bad form input, bad ids, broken editor state.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Anything that goes wrong before a request leaves the process.
///
/// Network and backend failures are `cardportal_client::ApiError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Form input rejected; the text is shown to the user as-is.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Editor state that should be impossible (e.g. a row index past the end).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No session token to act with.
    #[error("not signed in")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Notice text, without the category prefix of `Display`.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::InvariantViolation(msg) | Self::InvalidId(msg) => {
                msg.clone()
            }
            Self::Unauthorized => "Please sign in first".to_string(),
        }
    }
}
