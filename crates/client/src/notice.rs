//! User-facing notices: what a toast would have said.

use serde::Serialize;

use crate::error::ApiError;
use crate::types::MessageResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Backend message when present, generic text otherwise.
    pub fn from_error(err: &ApiError) -> Self {
        Self::error(err.user_message())
    }

    /// Success notice for a mutation, with `fallback` if the backend was silent.
    pub fn from_response(resp: &MessageResponse, fallback: &str) -> Self {
        let message = resp
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback);
        Self::success(message)
    }

    pub fn from_result(result: &Result<MessageResponse, ApiError>, fallback: &str) -> Self {
        match result {
            Ok(resp) => Self::from_response(resp, fallback),
            Err(err) => Self::from_error(err),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
