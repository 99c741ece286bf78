//! Variant-keyed provider routing.
//!
//! ```rust
//! use dprovider::ProviderRouter;
//!
//! let router = ProviderRouter::new();
//! assert!(router.is_empty());
//! assert_eq!(router.len(), 0);
//! ```

use std::sync::Arc;

use dcommon::Registry;

use crate::{
    BoxedResponseStream, ModelVariant, ProviderError, ProviderFuture, RequestOptions,
    ResponseProvider, ResponseRequest,
};

/// Picks a provider from the request's model variant, falling back to a default.
///
/// An image-mode request whose variant is not an image variant goes to the image-mode provider
/// when one is set.
#[derive(Default, Clone)]
pub struct ProviderRouter {
    providers: Registry<ModelVariant, Arc<dyn ResponseProvider>>,
    image_mode: Option<Arc<dyn ResponseProvider>>,
    fallback: Option<Arc<dyn ResponseProvider>>,
}

impl ProviderRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, provider: Arc<dyn ResponseProvider>) -> Self {
        self.fallback = Some(provider);
        self
    }

    pub fn with_image_mode(mut self, provider: Arc<dyn ResponseProvider>) -> Self {
        self.image_mode = Some(provider);
        self
    }

    pub fn route(mut self, variant: ModelVariant, provider: Arc<dyn ResponseProvider>) -> Self {
        self.register(variant, provider);
        self
    }

    pub fn register(&mut self, variant: ModelVariant, provider: Arc<dyn ResponseProvider>) {
        self.providers.insert(variant, provider);
    }

    pub fn get(&self, variant: ModelVariant) -> Option<Arc<dyn ResponseProvider>> {
        self.providers
            .get(&variant)
            .cloned()
            .or_else(|| self.fallback.clone())
    }

    /// Provider for a request with these options, honoring the image-mode route.
    pub fn provider_for(&self, options: &RequestOptions) -> Option<Arc<dyn ResponseProvider>> {
        let variant = options.model_variant;
        if options.is_image_mode
            && !variant.is_image_variant()
            && let Some(provider) = &self.image_mode
        {
            return Some(Arc::clone(provider));
        }
        self.get(variant)
    }

    pub fn remove(&mut self, variant: ModelVariant) -> Option<Arc<dyn ResponseProvider>> {
        self.providers.remove(&variant)
    }

    pub fn contains(&self, variant: ModelVariant) -> bool {
        self.providers.contains_key(&variant)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ResponseProvider for ProviderRouter {
    fn name(&self) -> &str {
        "router"
    }

    fn respond<'a>(
        &'a self,
        request: ResponseRequest,
    ) -> ProviderFuture<'a, Result<BoxedResponseStream<'a>, ProviderError>> {
        Box::pin(async move {
            let variant = request.options.model_variant;
            let provider = self.provider_for(&request.options).ok_or_else(|| {
                ProviderError::unavailable(format!("no provider registered for '{variant}'"))
            })?;

            // The upstream stream borrows the provider, so both live inside the generator.
            let stream = async_stream::stream! {
                use futures_util::StreamExt;

                match provider.respond(request).await {
                    Ok(mut upstream) => {
                        while let Some(item) = upstream.next().await {
                            yield item;
                        }
                    }
                    Err(error) => yield Err(error),
                }
            };

            Ok(Box::pin(stream) as BoxedResponseStream<'a>)
        })
    }
}
