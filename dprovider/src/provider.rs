use dcommon::BoxFuture;

use crate::{BoxedResponseStream, ProviderError, ResponseRequest};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// Transport that answers one prompt with a stream of response events.
pub trait ResponseProvider: Send + Sync {
    fn name(&self) -> &str;

    fn respond<'a>(
        &'a self,
        request: ResponseRequest,
    ) -> ProviderFuture<'a, Result<BoxedResponseStream<'a>, ProviderError>>;
}
