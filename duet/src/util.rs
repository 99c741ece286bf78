//! Small convenience constructors and parsers.

use crate::{BoxedResponseStream, ModelVariant, ResponseEvent, SessionId, VecEventStream};

pub fn session_id(value: impl Into<SessionId>) -> SessionId {
    value.into()
}

/// Parses a variant id, a common alias, or a picker mention such as `image$midjourney`.
pub fn parse_model_variant(value: &str) -> Option<ModelVariant> {
    if let Some(variant) = ModelVariant::from_mention(value) {
        return Some(variant);
    }

    match value.trim().to_ascii_lowercase().as_str() {
        "chat" | "text" | "gpt" => Some(ModelVariant::Chat),
        "midjourney" | "mj" => Some(ModelVariant::Midjourney),
        "dall-e2" | "dall-e" | "dalle" | "dalle2" | "dall-e-2" => Some(ModelVariant::DallE2),
        "stable-diffusion" | "stablediffusion" | "sd" => Some(ModelVariant::StableDiffusion),
        _ => None,
    }
}

/// Boxes a fixed list of events as a response stream.
pub fn scripted_stream(events: Vec<ResponseEvent>) -> BoxedResponseStream<'static> {
    Box::pin(events.into_iter().collect::<VecEventStream>())
}
