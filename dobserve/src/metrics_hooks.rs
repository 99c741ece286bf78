//! Metrics-based hooks for submission and reconciliation.
//!
//! ```rust
//! use dchat::EngineHooks;
//! use dobserve::MetricsEngineHooks;
//!
//! fn accepts_engine_hooks(_hooks: &dyn EngineHooks) {}
//!
//! let hooks = MetricsEngineHooks;
//! accepts_engine_hooks(&hooks);
//! ```

use dchat::{ChatError, EngineHooks, RegistryChange, RegistryObserver, TurnTarget, UpdateKind};
use dcommon::SessionId;
use dprovider::ResponseRequest;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngineHooks;

impl EngineHooks for MetricsEngineHooks {
    fn on_input_ignored(&self, _session_id: &SessionId) {
        metrics::counter!("duet_submit_ignored_total").increment(1);
    }

    fn on_submitted(&self, _target: &TurnTarget, request: &ResponseRequest) {
        metrics::counter!(
            "duet_submit_total",
            "model_variant" => request.options.model_variant.to_string(),
            "image_mode" => request.options.is_image_mode.to_string(),
            "carries_context" => request.options.carries_context().to_string()
        )
        .increment(1);
    }

    fn on_title_set(&self, _session_id: &SessionId, _title: &str) {
        metrics::counter!("duet_history_title_set_total").increment(1);
    }

    fn on_update_applied(&self, _target: &TurnTarget, kind: UpdateKind) {
        metrics::counter!("duet_reconcile_update_total", "kind" => kind.as_str()).increment(1);
    }

    fn on_stale_update(&self, _target: &TurnTarget, kind: UpdateKind) {
        metrics::counter!("duet_reconcile_stale_total", "kind" => kind.as_str()).increment(1);
    }

    fn on_session_cleared(&self, _session_id: &SessionId) {
        metrics::counter!("duet_session_cleared_total").increment(1);
    }

    fn on_store_error(&self, _session_id: &SessionId, error: &ChatError) {
        metrics::counter!("duet_store_error_total", "error_kind" => error.kind.as_str())
            .increment(1);
    }
}

impl RegistryObserver for MetricsEngineHooks {
    fn on_change(&self, _session_id: &SessionId, change: RegistryChange) {
        let change = match change {
            RegistryChange::Opened => "opened",
            RegistryChange::Appended { .. } => "appended",
            RegistryChange::Updated { .. } => "updated",
            RegistryChange::Cleared => "cleared",
        };
        metrics::counter!("duet_registry_change_total", "change" => change).increment(1);
    }
}
