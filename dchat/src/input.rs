//! Raw input normalization and image-mode classification.
//!
//! ```rust
//! use dchat::InputParser;
//!
//! let parser = InputParser::new("/image").unwrap();
//! let parsed = parser.parse("/image$midjourney a castle at night").unwrap();
//! assert!(parsed.is_image_mode);
//! assert_eq!(parsed.prompt, "a castle at night");
//!
//! assert!(parser.parse("   ").is_none());
//! assert!(parser.parse("/image").is_none());
//! ```

use regex::{NoExpand, Regex};

use crate::ChatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub prompt: String,
    pub is_image_mode: bool,
}

#[derive(Debug, Clone)]
pub struct InputParser {
    mode_token: String,
    mention: Regex,
}

impl InputParser {
    pub fn new(mode_token: impl Into<String>) -> Result<Self, ChatError> {
        let mode_token = mode_token.into();
        if mode_token.trim().is_empty() {
            return Err(ChatError::invalid_config("mode_token must not be empty"));
        }

        let mention = Regex::new(&format!(r"{}\$\s*(\S+)", regex::escape(&mode_token)))?;
        Ok(Self {
            mode_token,
            mention,
        })
    }

    pub fn mode_token(&self) -> &str {
        &self.mode_token
    }

    /// Collapses the first `<token>$<variant>` mention left by a model picker to the bare token.
    pub fn normalize_mention(&self, raw: &str) -> String {
        self.mention
            .replace(raw, NoExpand(&self.mode_token))
            .into_owned()
    }

    /// Returns `None` for input that should be silently ignored.
    pub fn parse(&self, raw: &str) -> Option<ParsedInput> {
        let normalized = self.normalize_mention(raw);
        let message = normalized.trim();
        if message.is_empty() || message == self.mode_token {
            return None;
        }

        let (prompt, is_image_mode) = match message.strip_prefix(self.mode_token.as_str()) {
            Some(rest) => (rest.trim(), true),
            None => (message, false),
        };

        if prompt.is_empty() {
            return None;
        }

        Some(ParsedInput {
            prompt: prompt.to_string(),
            is_image_mode,
        })
    }

    /// Rebuilds the raw input that would parse back into `prompt`.
    pub fn compose(&self, prompt: &str, is_image_mode: bool) -> String {
        if is_image_mode {
            format!("{} {prompt}", self.mode_token)
        } else {
            prompt.to_string()
        }
    }
}
