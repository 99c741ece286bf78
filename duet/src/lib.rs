//! Unified facade over the duet workspace crates.
//!
//! This crate is designed to be the single dependency for most applications. It re-exports
//! the engine, transport, and observability crates and provides wiring helpers and macros for
//! common setups.
//!
//! ```rust
//! use duet::prelude::*;
//!
//! let queued = duet::queued_engine().unwrap();
//! let session = SessionId::from("s1");
//!
//! let target = queued.engine.submit(&session, "hello").target().cloned().unwrap();
//! assert_eq!(target.index, 1);
//!
//! let pending = queued.queue.pop().unwrap().unwrap();
//! pending.settle("hi", Some(duet_context! { "conversation_id" => "c-1" }));
//! assert_eq!(queued.engine.turns(&session).unwrap()[1].status, TurnStatus::Settled);
//! ```

mod macros;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use dchat;
pub use dcommon;
pub use dobserve;
pub use dprovider;

#[cfg(feature = "tokio")]
pub use dchat::TokioDispatcher;
pub use dchat::{
    ChatEngine, ChatEngineBuilder, ChatError, ChatErrorKind, ContextToggle, EngineConfig,
    EngineHooks, HistoryEntry, HistoryStore, InMemoryHistoryStore, InMemorySessionRegistry,
    InputParser, ModelSelection, NoopEngineHooks, ParsedInput, PendingResponse, QueueDispatcher,
    Reconciler, RegistryChange, RegistryObserver, RequestPayload, ResponseDispatcher,
    ResponseHandoff, Session, SessionRegistry, SubmitOutcome, Turn, TurnPatch, TurnStatus,
    TurnTarget, UpdateKind, resolve_context,
};
pub use dcommon::{BoxFuture, MetadataMap, SessionId};
pub use dobserve::{MetricsEngineHooks, SafeEngineHooks, SafeRegistryObserver, TracingEngineHooks};
pub use dprovider::{
    BoxedResponseStream, ModelVariant, PollPolicy, PollStatus, PollingBackend, PollingProvider,
    ProviderError, ProviderErrorKind, ProviderFuture, ProviderRouter, RequestOptions,
    ResponseContext, ResponseEvent, ResponseEventStream, ResponseProvider, ResponseRequest,
    VecEventStream,
};

#[cfg(feature = "tokio")]
pub use runtime::{streaming_engine, streaming_engine_with};
pub use runtime::{
    QueuedEngine, default_hooks, image_router, polling_provider, queued_engine,
    queued_engine_with,
};
pub use util::{parse_model_variant, scripted_stream, session_id};
