//! Out-of-band handoff from submission to response delivery.
//!
//! `ChatEngine::submit` never waits for a response. It hands a [`ResponseHandoff`] and a
//! [`Reconciler`] to a [`ResponseDispatcher`] and returns. [`QueueDispatcher`] parks handoffs
//! for callers that drive their own transport; `TokioDispatcher` spawns one task per handoff.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use dprovider::{ProviderError, ResponseContext, ResponseEvent, ResponseProvider, ResponseRequest};
use futures_core::Stream;

use crate::{ChatError, Reconciler, TurnTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHandoff {
    pub target: TurnTarget,
    pub request: ResponseRequest,
}

impl ResponseHandoff {
    pub fn new(target: TurnTarget, request: ResponseRequest) -> Self {
        Self { target, request }
    }
}

pub trait ResponseDispatcher: Send + Sync {
    /// Must not wait for the response; delivery happens through `reconciler` later.
    fn dispatch(&self, handoff: ResponseHandoff, reconciler: Reconciler) -> Result<(), ChatError>;
}

/// Requests the response from `provider` and drives it into the handoff's target.
pub async fn respond_and_drive(
    provider: &dyn ResponseProvider,
    handoff: ResponseHandoff,
    reconciler: &Reconciler,
) -> bool {
    let ResponseHandoff { target, request } = handoff;
    match provider.respond(request).await {
        Ok(stream) => reconciler.drive(&target, stream).await,
        Err(error) => reconciler.on_failed(&target, error.to_string()),
    }
}

/// A parked handoff, resolved by whoever drains the queue.
#[derive(Clone)]
pub struct PendingResponse {
    handoff: ResponseHandoff,
    reconciler: Reconciler,
}

impl PendingResponse {
    pub fn target(&self) -> &TurnTarget {
        &self.handoff.target
    }

    pub fn request(&self) -> &ResponseRequest {
        &self.handoff.request
    }

    pub fn partial(&self, delta: &str) -> bool {
        self.reconciler.on_partial(&self.handoff.target, delta)
    }

    pub fn settle(&self, text: impl Into<String>, context: Option<ResponseContext>) -> bool {
        self.reconciler.on_settled(&self.handoff.target, text, context)
    }

    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.reconciler.on_failed(&self.handoff.target, reason)
    }

    pub async fn drive<S>(&self, stream: S) -> bool
    where
        S: Stream<Item = Result<ResponseEvent, ProviderError>>,
    {
        self.reconciler.drive(&self.handoff.target, stream).await
    }

    pub async fn respond_with(self, provider: &dyn ResponseProvider) -> bool {
        let Self {
            handoff,
            reconciler,
        } = self;
        respond_and_drive(provider, handoff, &reconciler).await
    }
}

#[derive(Default)]
pub struct QueueDispatcher {
    pending: Mutex<VecDeque<PendingResponse>>,
}

impl QueueDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> Result<MutexGuard<'_, VecDeque<PendingResponse>>, ChatError> {
        self.pending
            .lock()
            .map_err(|_| ChatError::store("dispatch queue lock poisoned"))
    }

    pub fn len(&self) -> Result<usize, ChatError> {
        Ok(self.pending()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ChatError> {
        Ok(self.pending()?.is_empty())
    }

    pub fn pop(&self) -> Result<Option<PendingResponse>, ChatError> {
        Ok(self.pending()?.pop_front())
    }

    /// Takes every parked handoff in dispatch order.
    pub fn drain(&self) -> Result<Vec<PendingResponse>, ChatError> {
        Ok(self.pending()?.drain(..).collect())
    }
}

impl ResponseDispatcher for QueueDispatcher {
    fn dispatch(&self, handoff: ResponseHandoff, reconciler: Reconciler) -> Result<(), ChatError> {
        self.pending()?.push_back(PendingResponse {
            handoff,
            reconciler,
        });
        Ok(())
    }
}

#[cfg(feature = "tokio")]
mod tokio_dispatcher {
    use std::sync::Arc;

    use dprovider::ResponseProvider;
    use tokio::runtime::Handle;

    use super::{ResponseDispatcher, ResponseHandoff, respond_and_drive};
    use crate::{ChatError, Reconciler};

    /// Spawns one task per handoff on a tokio runtime.
    #[derive(Clone)]
    pub struct TokioDispatcher {
        handle: Handle,
        provider: Arc<dyn ResponseProvider>,
    }

    impl TokioDispatcher {
        pub fn new(handle: Handle, provider: Arc<dyn ResponseProvider>) -> Self {
            Self { handle, provider }
        }

        /// Binds to the runtime the caller is running on.
        pub fn current(provider: Arc<dyn ResponseProvider>) -> Result<Self, ChatError> {
            let handle = Handle::try_current().map_err(|error| {
                ChatError::invalid_config(format!("no tokio runtime available: {error}"))
            })?;
            Ok(Self::new(handle, provider))
        }

        pub fn provider_name(&self) -> &str {
            self.provider.name()
        }
    }

    impl ResponseDispatcher for TokioDispatcher {
        fn dispatch(
            &self,
            handoff: ResponseHandoff,
            reconciler: Reconciler,
        ) -> Result<(), ChatError> {
            let provider = Arc::clone(&self.provider);
            self.handle.spawn(async move {
                respond_and_drive(provider.as_ref(), handoff, &reconciler).await;
            });
            Ok(())
        }
    }
}

#[cfg(feature = "tokio")]
pub use tokio_dispatcher::TokioDispatcher;
