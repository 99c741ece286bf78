//! Common imports for most duet applications.

pub use crate::{duet_context, duet_event, duet_events};
pub use crate::{
    ChatEngine, ChatEngineBuilder, ChatError, ChatErrorKind, ContextToggle, EngineConfig,
    EngineHooks, HistoryEntry, HistoryStore, ModelSelection, ModelVariant, PendingResponse,
    PollPolicy, PollingBackend, ProviderError, QueueDispatcher, QueuedEngine, Reconciler,
    RequestOptions, ResponseContext, ResponseDispatcher, ResponseEvent, ResponseProvider,
    ResponseRequest, SessionId, SessionRegistry, SubmitOutcome, TracingEngineHooks, Turn,
    TurnStatus, TurnTarget,
};
pub use crate::{
    default_hooks, image_router, parse_model_variant, polling_provider, queued_engine,
    queued_engine_with, scripted_stream,
};
#[cfg(feature = "tokio")]
pub use crate::{TokioDispatcher, streaming_engine, streaming_engine_with};
