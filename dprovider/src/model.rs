//! Provider-agnostic request, continuation-context, and model-variant types.
//!
//! ```rust
//! use dprovider::{ModelVariant, RequestOptions, ResponseContext, ResponseRequest};
//!
//! let context = ResponseContext::new()
//!     .with("conversation_id", "c-1")
//!     .with("parent_message_id", "m-9");
//! let options = RequestOptions::new(false, ModelVariant::Chat).with_context(context);
//!
//! let request = ResponseRequest::new("continue the story", options);
//! assert!(request.validate().is_ok());
//! assert!(request.options.carries_context());
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use dcommon::MetadataMap;
use serde::{Deserialize, Serialize};

use crate::ProviderError;

/// Separator used by image-model mention values such as `image$midjourney`.
pub const MENTION_SEPARATOR: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    #[default]
    Chat,
    Midjourney,
    #[serde(rename = "dall-e2")]
    DallE2,
    StableDiffusion,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 4] = [
        ModelVariant::Chat,
        ModelVariant::Midjourney,
        ModelVariant::DallE2,
        ModelVariant::StableDiffusion,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Midjourney => "midjourney",
            Self::DallE2 => "dall-e2",
            Self::StableDiffusion => "stable-diffusion",
        }
    }

    pub fn is_image_variant(self) -> bool {
        !matches!(self, Self::Chat)
    }

    /// Parses a mention value of the form `image$<variant-id>`.
    pub fn from_mention(value: &str) -> Option<Self> {
        let (prefix, id) = value.trim().split_once(MENTION_SEPARATOR)?;
        if prefix != "image" {
            return None;
        }

        id.parse().ok().filter(|variant: &Self| variant.is_image_variant())
    }

    pub fn mention(self) -> Option<String> {
        self.is_image_variant()
            .then(|| format!("image{MENTION_SEPARATOR}{}", self.id()))
    }
}

impl Display for ModelVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelVariant {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|variant| variant.id() == normalized)
            .ok_or_else(|| {
                ProviderError::invalid_request(format!("unknown model variant '{value}'"))
            })
    }
}

/// Opaque continuation token returned with a settled response.
///
/// The engine never looks inside; it only hands the token back on the next request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseContext(MetadataMap);

impl ResponseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &MetadataMap {
        &self.0
    }
}

impl From<MetadataMap> for ResponseContext {
    fn from(value: MetadataMap) -> Self {
        Self(value)
    }
}

/// Options sent alongside a prompt.
///
/// `is_image_mode` and `model_variant` always describe the request being made; only
/// `context` is carried over from an earlier response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
    pub is_image_mode: bool,
    pub model_variant: ModelVariant,
}

impl RequestOptions {
    pub fn new(is_image_mode: bool, model_variant: ModelVariant) -> Self {
        Self {
            context: None,
            is_image_mode,
            model_variant,
        }
    }

    pub fn with_context(mut self, context: ResponseContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn carries_context(&self) -> bool {
        self.context.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRequest {
    pub prompt: String,
    pub options: RequestOptions,
}

impl ResponseRequest {
    pub fn new(prompt: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.prompt.trim().is_empty() {
            return Err(ProviderError::invalid_request("prompt must not be empty"));
        }

        Ok(())
    }
}
