//! Failures raised while producing a response.
//!
//! Each kind carries a default retry hint; a backend that knows better can override it with
//! [`ProviderError::with_retryable`].
//!
//! ```rust
//! use dprovider::{ProviderError, ProviderErrorKind};
//!
//! let rejected = ProviderError::invalid_request("prompt must not be empty");
//! assert!(!rejected.retryable);
//!
//! let busy = ProviderError::timeout("image task still running");
//! assert_eq!(busy.kind, ProviderErrorKind::Timeout);
//! assert_eq!(busy.to_string(), "timeout: image task still running");
//! ```

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    InvalidRequest,
    RateLimited,
    Timeout,
    Transport,
    Unavailable,
    Other,
}

impl ProviderErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
            Self::Unavailable => "unavailable",
            Self::Other => "other",
        }
    }

    /// Whether an identical request could succeed later.
    pub fn retryable_by_default(self) -> bool {
        !matches!(self, Self::InvalidRequest | Self::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: kind.retryable_by_default(),
        }
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(out, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_caller_mistakes_are_final_by_default() {
        let final_kinds = [ProviderError::invalid_request("x"), ProviderError::other("x")];
        assert!(final_kinds.iter().all(|error| !error.retryable));

        let transient = [
            ProviderError::rate_limited("x"),
            ProviderError::timeout("x"),
            ProviderError::transport("x"),
            ProviderError::unavailable("x"),
        ];
        assert!(transient.iter().all(|error| error.retryable));
    }

    #[test]
    fn retry_hint_can_be_overridden() {
        let error = ProviderError::unavailable("quota exhausted").with_retryable(false);
        assert_eq!(error.kind, ProviderErrorKind::Unavailable);
        assert!(!error.retryable);
        assert_eq!(error.to_string(), "unavailable: quota exhausted");
    }
}
