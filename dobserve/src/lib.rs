//! Production-friendly observability hooks for the duet conversation engine.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dchat::{ChatEngine, QueueDispatcher};
//! use dobserve::{MetricsEngineHooks, SafeEngineHooks, TracingEngineHooks};
//!
//! let engine = ChatEngine::builder(Arc::new(QueueDispatcher::new()))
//!     .hooks(Arc::new(SafeEngineHooks::new(TracingEngineHooks)))
//!     .build()
//!     .unwrap();
//! let _metrics = MetricsEngineHooks;
//! # let _ = engine;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsEngineHooks;
pub use safe_hooks::{SafeEngineHooks, SafeRegistryObserver};
pub use tracing_hooks::TracingEngineHooks;

pub mod prelude {
    pub use crate::{
        MetricsEngineHooks, SafeEngineHooks, SafeRegistryObserver, TracingEngineHooks,
    };
}

#[cfg(test)]
mod tests;
