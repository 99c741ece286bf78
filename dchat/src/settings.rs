//! Shared handles the engine reads at submission time but never writes.
//!
//! ```rust
//! use dchat::{ContextToggle, ModelSelection};
//! use dprovider::ModelVariant;
//!
//! let toggle = ContextToggle::new(true);
//! let view = toggle.clone();
//! assert!(!view.toggle());
//! assert!(!toggle.get());
//!
//! let selection = ModelSelection::default();
//! assert_eq!(selection.select_mention("image$dall-e2"), Some(ModelVariant::DallE2));
//! assert_eq!(selection.get(), ModelVariant::DallE2);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use dprovider::ModelVariant;

/// Whether new requests continue the previous response's context.
#[derive(Debug, Clone)]
pub struct ContextToggle(Arc<AtomicBool>);

impl Default for ContextToggle {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ContextToggle {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelSelection(Arc<RwLock<ModelVariant>>);

impl ModelSelection {
    pub fn new(variant: ModelVariant) -> Self {
        Self(Arc::new(RwLock::new(variant)))
    }

    pub fn get(&self) -> ModelVariant {
        match self.0.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, variant: ModelVariant) {
        match self.0.write() {
            Ok(mut guard) => *guard = variant,
            Err(poisoned) => *poisoned.into_inner() = variant,
        }
    }

    /// Selects the variant named by a picker mention such as `image$midjourney`.
    /// Unknown mentions leave the selection unchanged.
    pub fn select_mention(&self, mention: &str) -> Option<ModelVariant> {
        let variant = ModelVariant::from_mention(mention)?;
        self.set(variant);
        Some(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_shared_across_clones() {
        let owner = ContextToggle::default();
        let reader = owner.clone();
        assert!(reader.get());

        assert!(!owner.toggle());
        assert!(!reader.get());
        assert!(owner.toggle());
        assert!(reader.get());

        owner.set(false);
        assert!(!reader.get());
    }

    #[test]
    fn unknown_mentions_keep_the_current_variant() {
        let selection = ModelSelection::new(ModelVariant::Midjourney);
        assert_eq!(selection.select_mention("image$gpt"), None);
        assert_eq!(selection.select_mention("chat"), None);
        assert_eq!(selection.get(), ModelVariant::Midjourney);

        let shared = selection.clone();
        shared.set(ModelVariant::Chat);
        assert_eq!(selection.get(), ModelVariant::Chat);
    }
}
