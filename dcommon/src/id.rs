use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque key naming one conversation.
///
/// Serializes as a bare string and borrows as `&str`, so registries keyed by it can be
/// queried with string literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.write_str(self.as_str())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for SessionId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl<'a> From<&'a str> for SessionId {
    fn from(raw: &'a str) -> Self {
        Self::new(raw)
    }
}

impl<'a> From<&'a SessionId> for SessionId {
    fn from(existing: &'a SessionId) -> Self {
        existing.clone()
    }
}
