//! Common `dprovider` imports for downstream crates.

pub use crate::{
    BoxedResponseStream, ModelVariant, PollPolicy, PollStatus, PollingBackend, PollingProvider,
    ProviderError, ProviderErrorKind, ProviderFuture, ProviderRouter, RequestOptions,
    ResponseContext, ResponseEvent, ResponseEventStream, ResponseProvider, ResponseRequest,
    VecEventStream,
};
pub use dcommon::{BoxFuture, MetadataMap};
