//! Engine configuration.
//!
//! ```rust
//! use dchat::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "title_max_chars": 24 }"#).unwrap();
//! assert_eq!(config.title_max_chars, 24);
//! assert_eq!(config.mode_token, "/image");
//! ```

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::ChatError;
use crate::history::DEFAULT_TITLE;

pub const DEFAULT_MODE_TOKEN: &str = "/image";
pub const DEFAULT_TITLE_MAX_CHARS: usize = 50;
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix that switches a submission into image mode.
    pub mode_token: String,
    /// Sentinel title of a session nobody has written to yet.
    pub default_title: String,
    pub title_max_chars: usize,
    /// `chrono` strftime pattern for turn timestamps.
    pub timestamp_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode_token: DEFAULT_MODE_TOKEN.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ChatError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_mode_token(mut self, mode_token: impl Into<String>) -> Self {
        self.mode_token = mode_token.into();
        self
    }

    pub fn with_default_title(mut self, default_title: impl Into<String>) -> Self {
        self.default_title = default_title.into();
        self
    }

    pub fn with_title_max_chars(mut self, title_max_chars: usize) -> Self {
        self.title_max_chars = title_max_chars;
        self
    }

    pub fn with_timestamp_format(mut self, timestamp_format: impl Into<String>) -> Self {
        self.timestamp_format = timestamp_format.into();
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if self.mode_token.trim().is_empty() {
            return Err(ChatError::invalid_config("mode_token must not be empty"));
        }

        if self.default_title.is_empty() {
            return Err(ChatError::invalid_config("default_title must not be empty"));
        }

        if self.title_max_chars == 0 {
            return Err(ChatError::invalid_config(
                "title_max_chars must be greater than zero",
            ));
        }

        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ChatError::invalid_config(format!(
                "timestamp_format '{}' is not a valid strftime pattern",
                self.timestamp_format
            )));
        }

        Ok(())
    }
}
