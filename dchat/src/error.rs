//! Engine-layer errors and classification.
//!
//! ```rust
//! use dchat::{ChatError, ChatErrorKind};
//!
//! let err = ChatError::unknown_session("s-404");
//! assert_eq!(err.kind, ChatErrorKind::UnknownSession);
//! assert!(err.to_string().contains("s-404"));
//! ```

use std::error::Error;
use std::fmt;

use dcommon::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    UnknownSession,
    Reconciliation,
    Store,
    InvalidConfig,
}

impl ChatErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownSession => "unknown_session",
            Self::Reconciliation => "reconciliation",
            Self::Store => "store",
            Self::InvalidConfig => "invalid_config",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_session(session_id: impl Into<SessionId>) -> Self {
        Self::new(
            ChatErrorKind::UnknownSession,
            format!("session '{}' has not been opened", session_id.into()),
        )
    }

    pub fn reconciliation(reason: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Reconciliation, reason)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidConfig, message)
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(out, "{} error: {}", self.kind.as_str(), self.message)
    }
}

impl Error for ChatError {}

/// Lets callers that drive a provider themselves propagate its errors with `?`.
impl From<dprovider::ProviderError> for ChatError {
    fn from(value: dprovider::ProviderError) -> Self {
        ChatError::reconciliation(value.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(value: serde_json::Error) -> Self {
        ChatError::invalid_config(value.to_string())
    }
}

impl From<regex::Error> for ChatError {
    fn from(value: regex::Error) -> Self {
        ChatError::invalid_config(value.to_string())
    }
}
