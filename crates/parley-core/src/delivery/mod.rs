//! Outbound reply delivery port.
//!
//! Mirrors the `LlmProvider` / `BoxLlmProvider` pair: concrete senders
//! implement [`ReplySender`] with native async fns, and [`BoxReplySender`]
//! erases the type for application state.

use std::future::Future;
use std::pin::Pin;

use parley_types::error::DeliveryError;

/// Sends a reply text back to the user identified by an opaque reply handle.
pub trait ReplySender: Send + Sync {
    fn send_reply(
        &self,
        reply_handle: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// Object-safe version of [`ReplySender`].
pub trait ReplySenderDyn: Send + Sync {
    fn send_reply_boxed<'a>(
        &'a self,
        reply_handle: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>;
}

impl<T: ReplySender> ReplySenderDyn for T {
    fn send_reply_boxed<'a>(
        &'a self,
        reply_handle: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>> {
        Box::pin(self.send_reply(reply_handle, text))
    }
}

/// Type-erased reply sender.
pub struct BoxReplySender {
    inner: Box<dyn ReplySenderDyn + Send + Sync>,
}

impl BoxReplySender {
    pub fn new<T: ReplySender + 'static>(sender: T) -> Self {
        Self {
            inner: Box::new(sender),
        }
    }

    pub async fn send_reply(&self, reply_handle: &str, text: &str) -> Result<(), DeliveryError> {
        self.inner.send_reply_boxed(reply_handle, text).await
    }
}
