use std::panic::{AssertUnwindSafe, catch_unwind};

use dchat::{ChatError, EngineHooks, RegistryChange, RegistryObserver, TurnTarget, UpdateKind};
use dcommon::SessionId;
use dprovider::ResponseRequest;

/// Keeps a panicking hook from unwinding into the engine or a dispatcher task.
pub struct SafeEngineHooks<H> {
    inner: H,
}

impl<H> SafeEngineHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> EngineHooks for SafeEngineHooks<H>
where
    H: EngineHooks,
{
    fn on_input_ignored(&self, session_id: &SessionId) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_input_ignored(session_id)));
    }

    fn on_submitted(&self, target: &TurnTarget, request: &ResponseRequest) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_submitted(target, request)
        }));
    }

    fn on_title_set(&self, session_id: &SessionId, title: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_title_set(session_id, title)
        }));
    }

    fn on_update_applied(&self, target: &TurnTarget, kind: UpdateKind) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_update_applied(target, kind)
        }));
    }

    fn on_stale_update(&self, target: &TurnTarget, kind: UpdateKind) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_stale_update(target, kind)
        }));
    }

    fn on_session_cleared(&self, session_id: &SessionId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_session_cleared(session_id)
        }));
    }

    fn on_store_error(&self, session_id: &SessionId, error: &ChatError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_store_error(session_id, error)
        }));
    }
}

pub struct SafeRegistryObserver<O> {
    inner: O,
}

impl<O> SafeRegistryObserver<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

impl<O> RegistryObserver for SafeRegistryObserver<O>
where
    O: RegistryObserver,
{
    fn on_change(&self, session_id: &SessionId, change: RegistryChange) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_change(session_id, change)));
    }
}
