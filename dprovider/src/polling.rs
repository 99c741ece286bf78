//! Adapter that turns submit-then-poll backends into a response stream.
//!
//! Image-generation backends usually accept a job, hand back a task id, and report progress
//! only when asked. [`PollingProvider`] hides that behind the same [`ResponseProvider`]
//! contract as streaming transports.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use dprovider::PollPolicy;
//!
//! let policy = PollPolicy::default()
//!     .with_interval(Duration::from_millis(500))
//!     .with_max_polls(20);
//! assert_eq!(policy.max_polls, 20);
//! assert_eq!(policy.budget(), Duration::from_secs(10));
//! ```

use std::time::Duration;

use async_stream::try_stream;
use futures_timer::Delay;

use crate::{
    BoxedResponseStream, ProviderError, ProviderFuture, ResponseContext, ResponseEvent,
    ResponseProvider, ResponseRequest,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// Still working; `progress` is the cumulative text produced so far, if any.
    Running { progress: Option<String> },
    Completed {
        text: String,
        context: Option<ResponseContext>,
    },
    Failed { reason: String },
}

pub trait PollingBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Submits the request and returns the backend's task id.
    fn start<'a>(
        &'a self,
        request: ResponseRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>>;

    fn poll<'a>(
        &'a self,
        task_id: &'a str,
    ) -> ProviderFuture<'a, Result<PollStatus, ProviderError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: 150,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls: max_polls.max(1),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls.max(1);
        self
    }

    /// Longest time a task may run before the stream gives up.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_polls)
    }
}

pub struct PollingProvider<B> {
    backend: B,
    policy: PollPolicy,
}

impl<B> PollingProvider<B>
where
    B: PollingBackend,
{
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, PollPolicy::default())
    }

    pub fn with_policy(backend: B, policy: PollPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B> ResponseProvider for PollingProvider<B>
where
    B: PollingBackend,
{
    fn name(&self) -> &str {
        self.backend.name()
    }

    fn respond<'a>(
        &'a self,
        request: ResponseRequest,
    ) -> ProviderFuture<'a, Result<BoxedResponseStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let task_id = self.backend.start(request).await?;
            let policy = self.policy.clone();

            let stream = try_stream! {
                let mut seen = String::new();
                let mut polls = 0_u32;

                loop {
                    if polls >= policy.max_polls {
                        Err::<(), _>(ProviderError::timeout(format!(
                            "task '{task_id}' did not finish after {polls} polls"
                        )))?;
                    }

                    Delay::new(policy.interval).await;
                    polls += 1;

                    match self.backend.poll(&task_id).await? {
                        PollStatus::Running { progress } => {
                            if let Some(delta) = progress
                                .as_deref()
                                .and_then(|progress| progress_delta(&seen, progress))
                            {
                                seen.push_str(&delta);
                                yield ResponseEvent::Partial(delta);
                            }
                        }
                        PollStatus::Completed { text, context } => {
                            yield ResponseEvent::settled(text, context);
                            break;
                        }
                        PollStatus::Failed { reason } => {
                            yield ResponseEvent::failed(reason);
                            break;
                        }
                    }
                }
            };

            Ok(Box::pin(stream) as BoxedResponseStream<'a>)
        })
    }
}

/// Suffix of cumulative `progress` not yet reported; `None` if nothing new or rewritten.
fn progress_delta(seen: &str, progress: &str) -> Option<String> {
    if progress.len() <= seen.len() || !progress.starts_with(seen) {
        return None;
    }

    Some(progress[seen.len()..].to_string())
}
