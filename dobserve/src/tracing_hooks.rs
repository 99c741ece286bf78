//! Tracing-based hooks for submission, reconciliation, and registry changes.
//!
//! ```rust
//! use dchat::{EngineHooks, RegistryObserver};
//! use dobserve::TracingEngineHooks;
//!
//! fn accepts_engine_hooks(_hooks: &dyn EngineHooks) {}
//! fn accepts_registry_observer(_observer: &dyn RegistryObserver) {}
//!
//! let hooks = TracingEngineHooks;
//! accepts_engine_hooks(&hooks);
//! accepts_registry_observer(&hooks);
//! ```

use dchat::{ChatError, EngineHooks, RegistryChange, RegistryObserver, TurnTarget, UpdateKind};
use dcommon::SessionId;
use dprovider::ResponseRequest;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEngineHooks;

impl EngineHooks for TracingEngineHooks {
    fn on_input_ignored(&self, session_id: &SessionId) {
        tracing::debug!(
            phase = "submit",
            event = "input_ignored",
            session_id = %session_id
        );
    }

    fn on_submitted(&self, target: &TurnTarget, request: &ResponseRequest) {
        tracing::info!(
            phase = "submit",
            event = "submitted",
            session_id = %target.session_id,
            index = target.index,
            generation = target.generation,
            image_mode = request.options.is_image_mode,
            model_variant = %request.options.model_variant,
            carries_context = request.options.carries_context()
        );
    }

    fn on_title_set(&self, session_id: &SessionId, title: &str) {
        tracing::debug!(
            phase = "history",
            event = "title_set",
            session_id = %session_id,
            title
        );
    }

    fn on_update_applied(&self, target: &TurnTarget, kind: UpdateKind) {
        match kind {
            UpdateKind::Partial => tracing::trace!(
                phase = "reconcile",
                event = kind.as_str(),
                session_id = %target.session_id,
                index = target.index,
                generation = target.generation
            ),
            UpdateKind::Settled => tracing::info!(
                phase = "reconcile",
                event = kind.as_str(),
                session_id = %target.session_id,
                index = target.index,
                generation = target.generation
            ),
            UpdateKind::Failed => tracing::warn!(
                phase = "reconcile",
                event = kind.as_str(),
                session_id = %target.session_id,
                index = target.index,
                generation = target.generation
            ),
        }
    }

    fn on_stale_update(&self, target: &TurnTarget, kind: UpdateKind) {
        tracing::debug!(
            phase = "reconcile",
            event = "stale_update",
            update = kind.as_str(),
            session_id = %target.session_id,
            index = target.index,
            generation = target.generation
        );
    }

    fn on_session_cleared(&self, session_id: &SessionId) {
        tracing::info!(
            phase = "registry",
            event = "session_cleared",
            session_id = %session_id
        );
    }

    fn on_store_error(&self, session_id: &SessionId, error: &ChatError) {
        tracing::error!(
            phase = "store",
            event = "store_error",
            session_id = %session_id,
            error_kind = ?error.kind,
            error = %error
        );
    }
}

impl RegistryObserver for TracingEngineHooks {
    fn on_change(&self, session_id: &SessionId, change: RegistryChange) {
        let index = match change {
            RegistryChange::Appended { index } | RegistryChange::Updated { index } => Some(index),
            RegistryChange::Opened | RegistryChange::Cleared => None,
        };

        tracing::trace!(
            phase = "registry",
            event = "change",
            change = ?change,
            session_id = %session_id,
            index
        );
    }
}
