use std::sync::{Arc, Mutex};

use dchat::{ChatError, EngineHooks, RegistryChange, RegistryObserver, TurnTarget, UpdateKind};
use dcommon::SessionId;
use dprovider::{ModelVariant, RequestOptions, ResponseRequest};

use crate::{MetricsEngineHooks, SafeEngineHooks, SafeRegistryObserver, TracingEngineHooks};

fn sample_target() -> TurnTarget {
    TurnTarget::new("session-1", 1, 0)
}

fn sample_request() -> ResponseRequest {
    ResponseRequest::new("a red fox", RequestOptions::new(true, ModelVariant::DallE2))
}

fn exercise_engine_hooks(hooks: &dyn EngineHooks) {
    let session = SessionId::from("session-1");
    let target = sample_target();

    hooks.on_input_ignored(&session);
    hooks.on_submitted(&target, &sample_request());
    hooks.on_title_set(&session, "a red fox");
    hooks.on_update_applied(&target, UpdateKind::Partial);
    hooks.on_update_applied(&target, UpdateKind::Settled);
    hooks.on_update_applied(&target, UpdateKind::Failed);
    hooks.on_stale_update(&target, UpdateKind::Partial);
    hooks.on_session_cleared(&session);
    hooks.on_store_error(&session, &ChatError::store("lock poisoned"));
}

fn exercise_registry_observer(observer: &dyn RegistryObserver) {
    let session = SessionId::from("session-1");
    observer.on_change(&session, RegistryChange::Opened);
    observer.on_change(&session, RegistryChange::Appended { index: 0 });
    observer.on_change(&session, RegistryChange::Updated { index: 0 });
    observer.on_change(&session, RegistryChange::Cleared);
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    exercise_engine_hooks(&TracingEngineHooks);
    exercise_registry_observer(&TracingEngineHooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    exercise_engine_hooks(&MetricsEngineHooks);
    exercise_registry_observer(&MetricsEngineHooks);
}

#[derive(Default, Clone)]
struct RecordingHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingHooks {
    fn push(&self, event: &'static str) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl EngineHooks for RecordingHooks {
    fn on_input_ignored(&self, _session_id: &SessionId) {
        self.push("ignored");
    }

    fn on_submitted(&self, _target: &TurnTarget, _request: &ResponseRequest) {
        self.push("submitted");
    }

    fn on_title_set(&self, _session_id: &SessionId, _title: &str) {
        self.push("title_set");
    }

    fn on_update_applied(&self, _target: &TurnTarget, kind: UpdateKind) {
        self.push(kind.as_str());
    }

    fn on_stale_update(&self, _target: &TurnTarget, _kind: UpdateKind) {
        self.push("stale");
    }

    fn on_session_cleared(&self, _session_id: &SessionId) {
        self.push("cleared");
    }

    fn on_store_error(&self, _session_id: &SessionId, _error: &ChatError) {
        self.push("store_error");
    }
}

impl RegistryObserver for RecordingHooks {
    fn on_change(&self, _session_id: &SessionId, _change: RegistryChange) {
        self.push("change");
    }
}

struct PanicHooks;

impl EngineHooks for PanicHooks {
    fn on_input_ignored(&self, _session_id: &SessionId) {
        panic!("ignored panic");
    }

    fn on_submitted(&self, _target: &TurnTarget, _request: &ResponseRequest) {
        panic!("submitted panic");
    }

    fn on_title_set(&self, _session_id: &SessionId, _title: &str) {
        panic!("title panic");
    }

    fn on_update_applied(&self, _target: &TurnTarget, _kind: UpdateKind) {
        panic!("update panic");
    }

    fn on_stale_update(&self, _target: &TurnTarget, _kind: UpdateKind) {
        panic!("stale panic");
    }

    fn on_session_cleared(&self, _session_id: &SessionId) {
        panic!("cleared panic");
    }

    fn on_store_error(&self, _session_id: &SessionId, _error: &ChatError) {
        panic!("store error panic");
    }
}

impl RegistryObserver for PanicHooks {
    fn on_change(&self, _session_id: &SessionId, _change: RegistryChange) {
        panic!("change panic");
    }
}

#[test]
fn safe_engine_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingHooks::default();
    let events = Arc::clone(&inner.events);
    let hooks = SafeEngineHooks::new(inner);

    exercise_engine_hooks(&hooks);

    assert_eq!(
        *events.lock().expect("events lock"),
        vec![
            "ignored",
            "submitted",
            "title_set",
            "partial",
            "settled",
            "failed",
            "stale",
            "cleared",
            "store_error",
        ]
    );
}

#[test]
fn safe_registry_observer_delegates_when_inner_succeeds() {
    let inner = RecordingHooks::default();
    let events = Arc::clone(&inner.events);
    let observer = SafeRegistryObserver::new(inner);

    exercise_registry_observer(&observer);

    assert_eq!(events.lock().expect("events lock").len(), 4);
}

#[test]
fn safe_wrappers_swallow_panics() {
    exercise_engine_hooks(&SafeEngineHooks::new(PanicHooks));
    exercise_registry_observer(&SafeRegistryObserver::new(PanicHooks));
}
