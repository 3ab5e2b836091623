use crate::error::ClientError;
use futures::future::{self, BoxFuture, FutureExt};
use rpclane_core::CallId;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;

/// An in-flight call: await it for the outcome, or cancel it.
///
/// Unlike a promise-based client, which fires the request the moment a call
/// is made, nothing is sent until this future is first polled. A call dropped
/// before then never reaches the endpoint; one dropped while in flight
/// abandons the request.
#[must_use = "calls do nothing unless awaited"]
pub struct AbortableCall<T> {
    id: Option<CallId>,
    cancel: CancellationToken,
    outcome: BoxFuture<'static, Result<T, ClientError>>,
}

impl<T: Send + 'static> AbortableCall<T> {
    pub(crate) fn new(
        id: CallId,
        cancel: CancellationToken,
        outcome: impl Future<Output = Result<T, ClientError>> + Send + 'static,
    ) -> Self {
        Self {
            id: Some(id),
            cancel,
            outcome: outcome.boxed(),
        }
    }

    /// A call that settled before it was issued.
    pub(crate) fn rejected(id: Option<CallId>, err: ClientError) -> Self {
        Self {
            id,
            cancel: CancellationToken::new(),
            outcome: future::ready(Err(err)).boxed(),
        }
    }
}

impl<T> AbortableCall<T> {
    /// The envelope id, absent when the call was rejected before one was allocated.
    pub fn id(&self) -> Option<CallId> {
        self.id
    }

    /// Abort the call. A no-op once it has settled.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A handle that can cancel this call from elsewhere while it is being awaited.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            token: self.cancel.clone(),
        }
    }
}

impl<T> Future for AbortableCall<T> {
    type Output = Result<T, ClientError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().outcome.as_mut().poll(cx)
    }
}

impl<T> fmt::Debug for AbortableCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortableCall")
            .field("id", &self.id)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
