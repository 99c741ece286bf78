//! Conversation submission and reconciliation engine.
//!
//! [`ChatEngine::submit`] turns raw input into a committed user turn plus a pending assistant
//! placeholder, decides whether the request continues earlier context, and hands it to a
//! [`ResponseDispatcher`] without waiting. The response arrives later through a
//! [`Reconciler`], keyed by the [`TurnTarget`] that `submit` returned.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dchat::{ChatEngine, QueueDispatcher, TurnStatus};
//! use dcommon::SessionId;
//!
//! let queue = Arc::new(QueueDispatcher::new());
//! let engine = ChatEngine::builder(queue.clone()).build().unwrap();
//! let session = SessionId::from("s1");
//!
//! let outcome = engine.submit(&session, "hello");
//! assert_eq!(outcome.target().unwrap().index, 1);
//!
//! let pending = queue.pop().unwrap().unwrap();
//! pending.partial("hi ");
//! pending.settle("hi there", None);
//!
//! let turns = engine.turns(&session).unwrap();
//! assert_eq!(turns[1].status, TurnStatus::Settled);
//! assert_eq!(turns[1].text, "hi there");
//! ```

mod config;
mod context;
mod dispatch;
mod error;
mod history;
mod hooks;
mod input;
mod reconciler;
mod registry;
mod service;
mod settings;
mod types;

pub mod prelude {
    pub use crate::{
        ChatEngine, ChatEngineBuilder, ChatError, ChatErrorKind, ContextToggle, EngineConfig,
        EngineHooks, HistoryEntry, HistoryStore, InMemoryHistoryStore, InMemorySessionRegistry,
        ModelSelection, NoopEngineHooks, PendingResponse, QueueDispatcher, Reconciler,
        ResponseDispatcher, ResponseHandoff, SessionRegistry, SubmitOutcome, Turn, TurnStatus,
        TurnTarget,
    };
    #[cfg(feature = "tokio")]
    pub use crate::TokioDispatcher;
    pub use dcommon::SessionId;
}

pub use config::{
    DEFAULT_MODE_TOKEN, DEFAULT_TIMESTAMP_FORMAT, DEFAULT_TITLE_MAX_CHARS, EngineConfig,
};
pub use context::resolve_context;
#[cfg(feature = "tokio")]
pub use dispatch::TokioDispatcher;
pub use dispatch::{
    PendingResponse, QueueDispatcher, ResponseDispatcher, ResponseHandoff, respond_and_drive,
};
pub use error::{ChatError, ChatErrorKind};
pub use history::{DEFAULT_TITLE, HistoryStore, InMemoryHistoryStore, title_prefix};
pub use hooks::{EngineHooks, NoopEngineHooks, UpdateKind};
pub use input::{InputParser, ParsedInput};
pub use reconciler::{Reconciler, STREAM_ENDED_EARLY};
pub use registry::{InMemorySessionRegistry, RegistryChange, RegistryObserver, SessionRegistry};
pub use service::{ChatEngine, ChatEngineBuilder, SubmitOutcome};
pub use settings::{ContextToggle, ModelSelection};
pub use types::{
    HistoryEntry, RequestPayload, Session, Turn, TurnPatch, TurnStatus, TurnTarget,
};
pub use dcommon::{MetadataMap, SessionId};
