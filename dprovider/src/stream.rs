//! Response event contracts and in-memory stream utilities.
//!
//! ```rust
//! use dprovider::{BoxedResponseStream, ResponseEvent, VecEventStream};
//!
//! let stream = VecEventStream::new(vec![Ok(ResponseEvent::partial("hel"))]);
//! let _boxed: BoxedResponseStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::{ProviderError, ResponseContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    /// Text to append to what has arrived so far.
    Partial(String),
    Settled {
        text: String,
        context: Option<ResponseContext>,
    },
    Failed(String),
}

impl ResponseEvent {
    pub fn partial(delta: impl Into<String>) -> Self {
        Self::Partial(delta.into())
    }

    pub fn settled(text: impl Into<String>, context: Option<ResponseContext>) -> Self {
        Self::Settled {
            text: text.into(),
            context,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Partial(_))
    }
}

/// Response stream contract.
///
/// Invariants for consumers:
/// - `Partial` may appear zero or more times, in increasing-text order.
/// - Exactly one of `Settled` or `Failed` ends a well-formed stream; an `Err` item is
///   treated as `Failed`.
/// - Items after the terminal event are ignored by consumers.
pub trait ResponseEventStream: Stream<Item = Result<ResponseEvent, ProviderError>> + Send {}

impl<T> ResponseEventStream for T where
    T: Stream<Item = Result<ResponseEvent, ProviderError>> + Send
{
}

pub type BoxedResponseStream<'a> = Pin<Box<dyn ResponseEventStream + 'a>>;

/// Replays a prepared list of items, one per poll, without ever returning `Pending`.
#[derive(Debug, Default)]
pub struct VecEventStream {
    queued: VecDeque<Result<ResponseEvent, ProviderError>>,
}

impl VecEventStream {
    pub fn new(events: Vec<Result<ResponseEvent, ProviderError>>) -> Self {
        Self {
            queued: VecDeque::from(events),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queued.len()
    }
}

impl FromIterator<ResponseEvent> for VecEventStream {
    fn from_iter<I: IntoIterator<Item = ResponseEvent>>(events: I) -> Self {
        Self {
            queued: events.into_iter().map(Ok).collect(),
        }
    }
}

impl Stream for VecEventStream {
    type Item = Result<ResponseEvent, ProviderError>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().queued.pop_front())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queued.len(), Some(self.queued.len()))
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    #[tokio::test]
    async fn replays_items_then_ends() {
        let mut stream: VecEventStream = ["Hel", "lo"]
            .into_iter()
            .map(ResponseEvent::partial)
            .chain([ResponseEvent::settled("Hello", None)])
            .collect();
        assert_eq!(stream.remaining(), 3);

        let mut terminal = Vec::new();
        while let Some(item) = stream.next().await {
            terminal.push(item.expect("scripted items are ok").is_terminal());
        }

        assert_eq!(terminal, vec![false, false, true]);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn errors_pass_through_in_position() {
        let mut stream = VecEventStream::new(vec![
            Ok(ResponseEvent::partial("a")),
            Err(ProviderError::transport("dropped")),
        ]);

        assert!(stream.next().await.expect("first").is_ok());
        let err = stream.next().await.expect("second").expect_err("transport error");
        assert_eq!(err.message, "dropped");
    }
}
