//! Response transport contracts for the duet conversation engine.
//!
//! A [`ResponseProvider`] answers one prompt with a stream of [`ResponseEvent`]s: zero or
//! more partial deltas followed by exactly one terminal event. Streaming transports implement
//! the trait directly; submit-then-poll backends go through [`PollingProvider`].
//!
//! ```rust
//! use dprovider::{ModelVariant, RequestOptions, ResponseEvent, ResponseRequest};
//!
//! let request = ResponseRequest::new("hello", RequestOptions::new(false, ModelVariant::Chat));
//! assert!(request.validate().is_ok());
//! assert!(ResponseEvent::failed("boom").is_terminal());
//! ```

mod error;
mod model;
mod polling;
mod provider;
mod registry;
mod stream;

pub mod prelude;

pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    MENTION_SEPARATOR, ModelVariant, RequestOptions, ResponseContext, ResponseRequest,
};
pub use polling::{PollPolicy, PollStatus, PollingBackend, PollingProvider};
pub use provider::{ProviderFuture, ResponseProvider};
pub use registry::ProviderRouter;
pub use stream::{BoxedResponseStream, ResponseEvent, ResponseEventStream, VecEventStream};
