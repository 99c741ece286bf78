//! Runtime wiring helpers for common engine setups.
//!
//! Every helper installs panic-isolated tracing hooks on the engine and on its session
//! registry.

use std::sync::Arc;

use crate::{
    ChatEngine, ChatEngineBuilder, ChatError, EngineConfig, EngineHooks, ModelVariant,
    PollPolicy, PollingBackend, PollingProvider, ProviderRouter, QueueDispatcher,
    ResponseProvider, SafeEngineHooks, SafeRegistryObserver, TracingEngineHooks,
};

/// An engine whose responses are parked for the caller to resolve.
#[derive(Clone)]
pub struct QueuedEngine {
    pub engine: ChatEngine,
    pub queue: Arc<QueueDispatcher>,
}

pub fn default_hooks() -> Arc<dyn EngineHooks> {
    Arc::new(SafeEngineHooks::new(TracingEngineHooks))
}

pub fn queued_engine() -> Result<QueuedEngine, ChatError> {
    queued_engine_with(EngineConfig::default())
}

pub fn queued_engine_with(config: EngineConfig) -> Result<QueuedEngine, ChatError> {
    let queue = Arc::new(QueueDispatcher::new());
    let engine = observed(ChatEngine::builder(queue.clone()).config(config))?;
    Ok(QueuedEngine { engine, queue })
}

/// Engine that answers every submission in a background task on the current tokio runtime.
#[cfg(feature = "tokio")]
pub fn streaming_engine(provider: Arc<dyn ResponseProvider>) -> Result<ChatEngine, ChatError> {
    streaming_engine_with(provider, EngineConfig::default())
}

#[cfg(feature = "tokio")]
pub fn streaming_engine_with(
    provider: Arc<dyn ResponseProvider>,
    config: EngineConfig,
) -> Result<ChatEngine, ChatError> {
    let dispatcher = Arc::new(crate::TokioDispatcher::current(provider)?);
    observed(ChatEngine::builder(dispatcher).config(config))
}

/// Sends image variants and image-mode requests to `image`, everything else to `chat`.
pub fn image_router(
    chat: Arc<dyn ResponseProvider>,
    image: Arc<dyn ResponseProvider>,
) -> ProviderRouter {
    let router = ProviderRouter::new()
        .with_fallback(chat)
        .with_image_mode(Arc::clone(&image));
    ModelVariant::ALL
        .into_iter()
        .filter(|variant| variant.is_image_variant())
        .fold(router, |router, variant| {
            router.route(variant, Arc::clone(&image))
        })
}

pub fn polling_provider<B>(backend: B, policy: PollPolicy) -> Arc<dyn ResponseProvider>
where
    B: PollingBackend + 'static,
{
    Arc::new(PollingProvider::with_policy(backend, policy))
}

fn observed(builder: ChatEngineBuilder) -> Result<ChatEngine, ChatError> {
    let engine = builder.hooks(default_hooks()).build()?;
    engine
        .registry()
        .subscribe(Arc::new(SafeRegistryObserver::new(TracingEngineHooks)))?;
    Ok(engine)
}
