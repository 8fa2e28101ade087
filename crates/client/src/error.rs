//! Client error model.

use thiserror::Error;

use cardportal_auth::TokenError;
use cardportal_core::DomainError;

/// Shown when the backend gives no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// 2xx response whose body carries `"error": true`.
    #[error("request rejected: {message}")]
    Rejected { message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl ApiError {
    /// Notice text: the backend's message if it sent one, else a generic line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ApiError::Rejected { message } if !message.trim().is_empty() => message.clone(),
            ApiError::Domain(err) => err.user_message(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
