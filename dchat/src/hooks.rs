use dcommon::SessionId;
use dprovider::ResponseRequest;

use crate::{ChatError, TurnTarget};

/// Reconciliation callback kinds, as reported to hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Partial,
    Settled,
    Failed,
}

impl UpdateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Partial => "partial",
            Self::Settled => "settled",
            Self::Failed => "failed",
        }
    }
}

/// Lifecycle callbacks for the engine. All methods default to no-ops.
pub trait EngineHooks: Send + Sync {
    fn on_input_ignored(&self, _session_id: &SessionId) {}

    fn on_submitted(&self, _target: &TurnTarget, _request: &ResponseRequest) {}

    fn on_title_set(&self, _session_id: &SessionId, _title: &str) {}

    fn on_update_applied(&self, _target: &TurnTarget, _kind: UpdateKind) {}

    /// The target no longer addresses a pending turn; the update was dropped.
    fn on_stale_update(&self, _target: &TurnTarget, _kind: UpdateKind) {}

    fn on_session_cleared(&self, _session_id: &SessionId) {}

    fn on_store_error(&self, _session_id: &SessionId, _error: &ChatError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEngineHooks;

impl EngineHooks for NoopEngineHooks {}
