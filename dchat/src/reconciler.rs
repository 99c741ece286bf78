//! Applies response updates to pending assistant turns.
//!
//! Every callback is keyed by a [`TurnTarget`] and reports whether it landed. A target that
//! was cleared, already finished, or never existed makes the callback a silent no-op.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dchat::{
//!     InMemorySessionRegistry, NoopEngineHooks, Reconciler, SessionRegistry, Turn, TurnStatus,
//! };
//! use dcommon::SessionId;
//! use dprovider::{ModelVariant, RequestOptions};
//!
//! let registry = Arc::new(InMemorySessionRegistry::new());
//! let session = SessionId::from("s1");
//! registry.open(&session).unwrap();
//! let target = registry
//!     .append(
//!         &session,
//!         Turn::assistant_placeholder(
//!             "now",
//!             "hi",
//!             RequestOptions::new(false, ModelVariant::Chat),
//!         ),
//!     )
//!     .unwrap();
//!
//! let reconciler = Reconciler::new(registry.clone(), Arc::new(NoopEngineHooks));
//! assert!(reconciler.on_partial(&target, "Hel"));
//! assert!(reconciler.on_settled(&target, "Hello", None));
//! assert!(!reconciler.on_failed(&target, "too late"));
//!
//! assert_eq!(registry.list_for(&session).unwrap()[0].status, TurnStatus::Settled);
//! ```

use std::sync::Arc;

use dprovider::{ProviderError, ResponseContext, ResponseEvent};
use futures_core::Stream;
use futures_util::StreamExt;

use crate::{EngineHooks, SessionRegistry, TurnPatch, TurnTarget, UpdateKind};

/// Failure reason recorded when a stream ends without `Settled` or `Failed`.
pub const STREAM_ENDED_EARLY: &str = "response stream ended before completion";

#[derive(Clone)]
pub struct Reconciler {
    registry: Arc<dyn SessionRegistry>,
    hooks: Arc<dyn EngineHooks>,
}

impl Reconciler {
    pub fn new(registry: Arc<dyn SessionRegistry>, hooks: Arc<dyn EngineHooks>) -> Self {
        Self { registry, hooks }
    }

    pub fn on_partial(&self, target: &TurnTarget, delta: &str) -> bool {
        self.apply(target, TurnPatch::partial(delta), UpdateKind::Partial)
    }

    pub fn on_settled(
        &self,
        target: &TurnTarget,
        final_text: impl Into<String>,
        response_context: Option<ResponseContext>,
    ) -> bool {
        self.apply(
            target,
            TurnPatch::settled(final_text, response_context),
            UpdateKind::Settled,
        )
    }

    pub fn on_failed(&self, target: &TurnTarget, reason: impl Into<String>) -> bool {
        self.apply(target, TurnPatch::failed(reason), UpdateKind::Failed)
    }

    /// Feeds a response stream into the target until a terminal event.
    ///
    /// Returns whether the terminal update was applied. Stops early once a partial update is
    /// refused, since the target can no longer accept anything.
    pub async fn drive<S>(&self, target: &TurnTarget, stream: S) -> bool
    where
        S: Stream<Item = Result<ResponseEvent, ProviderError>>,
    {
        let mut stream = std::pin::pin!(stream);

        while let Some(event) = stream.next().await {
            match event {
                Ok(ResponseEvent::Partial(delta)) => {
                    if !self.on_partial(target, &delta) {
                        return false;
                    }
                }
                Ok(ResponseEvent::Settled { text, context }) => {
                    return self.on_settled(target, text, context);
                }
                Ok(ResponseEvent::Failed(reason)) => return self.on_failed(target, reason),
                Err(error) => return self.on_failed(target, error.to_string()),
            }
        }

        self.on_failed(target, STREAM_ENDED_EARLY)
    }

    fn apply(&self, target: &TurnTarget, patch: TurnPatch, kind: UpdateKind) -> bool {
        match self.registry.update_at(target, patch) {
            Ok(true) => {
                self.hooks.on_update_applied(target, kind);
                true
            }
            Ok(false) => {
                self.hooks.on_stale_update(target, kind);
                false
            }
            Err(error) => {
                self.hooks.on_store_error(&target.session_id, &error);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use dcommon::SessionId;
    use dprovider::{ModelVariant, RequestOptions, VecEventStream};

    use super::*;
    use crate::{InMemorySessionRegistry, Turn, TurnStatus};

    #[derive(Default)]
    struct RecordingHooks {
        applied: Mutex<Vec<UpdateKind>>,
        stale: Mutex<Vec<UpdateKind>>,
    }

    impl EngineHooks for RecordingHooks {
        fn on_update_applied(&self, _target: &TurnTarget, kind: UpdateKind) {
            self.applied.lock().expect("applied lock").push(kind);
        }

        fn on_stale_update(&self, _target: &TurnTarget, kind: UpdateKind) {
            self.stale.lock().expect("stale lock").push(kind);
        }
    }

    struct Fixture {
        registry: Arc<InMemorySessionRegistry>,
        hooks: Arc<RecordingHooks>,
        reconciler: Reconciler,
        target: TurnTarget,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let hooks = Arc::new(RecordingHooks::default());
        let session = SessionId::from("s1");
        registry.open(&session).expect("open");
        registry
            .append(&session, Turn::user("t", "hi", false))
            .expect("append user");
        let target = registry
            .append(
                &session,
                Turn::assistant_placeholder(
                    "t",
                    "hi",
                    RequestOptions::new(false, ModelVariant::Chat),
                ),
            )
            .expect("append placeholder");

        Fixture {
            reconciler: Reconciler::new(registry.clone(), hooks.clone()),
            registry,
            hooks,
            target,
        }
    }

    fn placeholder(fixture: &Fixture) -> Turn {
        fixture
            .registry
            .list_for(&fixture.target.session_id)
            .expect("list")[fixture.target.index]
            .clone()
    }

    #[test]
    fn failure_keeps_partial_text_and_blocks_later_updates() {
        let fixture = fixture();
        assert!(fixture.reconciler.on_partial(&fixture.target, "par"));
        assert!(fixture.reconciler.on_failed(&fixture.target, "reset by peer"));
        assert!(!fixture.reconciler.on_partial(&fixture.target, "tial"));
        assert!(!fixture.reconciler.on_settled(&fixture.target, "late", None));

        let turn = placeholder(&fixture);
        assert_eq!(turn.text, "par");
        assert_eq!(turn.status, TurnStatus::Failed);
        assert_eq!(turn.failure_reason.as_deref(), Some("reset by peer"));

        assert_eq!(
            *fixture.hooks.applied.lock().expect("applied lock"),
            vec![UpdateKind::Partial, UpdateKind::Failed]
        );
        assert_eq!(
            *fixture.hooks.stale.lock().expect("stale lock"),
            vec![UpdateKind::Partial, UpdateKind::Settled]
        );
    }

    #[tokio::test]
    async fn drive_settles_from_a_complete_stream() {
        let fixture = fixture();
        let context = ResponseContext::new().with("parent_message_id", "m-1");
        let stream = VecEventStream::new(vec![
            Ok(ResponseEvent::partial("Hel")),
            Ok(ResponseEvent::partial("lo")),
            Ok(ResponseEvent::settled("Hello.", Some(context.clone()))),
            Ok(ResponseEvent::partial(" ignored")),
        ]);

        assert!(fixture.reconciler.drive(&fixture.target, stream).await);

        let turn = placeholder(&fixture);
        assert_eq!(turn.text, "Hello.");
        assert_eq!(turn.status, TurnStatus::Settled);
        assert_eq!(turn.response_context, Some(context));
    }

    #[tokio::test]
    async fn drive_fails_the_turn_when_the_stream_ends_early() {
        let fixture = fixture();
        let stream = VecEventStream::new(vec![Ok(ResponseEvent::partial("half"))]);

        assert!(fixture.reconciler.drive(&fixture.target, stream).await);

        let turn = placeholder(&fixture);
        assert_eq!(turn.text, "half");
        assert_eq!(turn.status, TurnStatus::Failed);
        assert_eq!(turn.failure_reason.as_deref(), Some(STREAM_ENDED_EARLY));
    }

    #[tokio::test]
    async fn drive_maps_stream_errors_to_failure() {
        let fixture = fixture();
        let stream = VecEventStream::new(vec![Err(ProviderError::rate_limited("slow down"))]);

        assert!(fixture.reconciler.drive(&fixture.target, stream).await);

        let turn = placeholder(&fixture);
        assert_eq!(turn.status, TurnStatus::Failed);
        assert!(
            turn.failure_reason
                .as_deref()
                .is_some_and(|reason| reason.contains("slow down"))
        );
    }

    #[tokio::test]
    async fn drive_stops_once_the_target_is_cleared() {
        let fixture = fixture();
        fixture
            .registry
            .clear(&fixture.target.session_id)
            .expect("clear");

        let stream = VecEventStream::new(vec![
            Ok(ResponseEvent::partial("a")),
            Ok(ResponseEvent::settled("ab", None)),
        ]);
        assert!(!fixture.reconciler.drive(&fixture.target, stream).await);
        assert_eq!(
            *fixture.hooks.stale.lock().expect("stale lock"),
            vec![UpdateKind::Partial]
        );
    }
}
