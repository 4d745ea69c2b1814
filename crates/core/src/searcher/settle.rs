//! Settle-all join over a fixed set of independent fallible futures.
//!
//! Unlike `try_join_all`, one failure never aborts the others: every task runs
//! to its own conclusion and reports separately. A shared cancellation token
//! stops whatever is still outstanding.

use std::future::Future;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

/// Final state of one task in a [`settle_all`] join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T, E> {
    Fulfilled(T),
    Rejected(E),
    /// The token fired before the task finished.
    Cancelled,
}

impl<T, E> Settled<T, E> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled(_))
    }

    /// The value, if the task succeeded.
    pub fn ok(self) -> Option<T> {
        match self {
            Settled::Fulfilled(value) => Some(value),
            _ => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Settled::Fulfilled(value),
            Err(e) => Settled::Rejected(e),
        }
    }
}

/// Run every task concurrently on the current task and wait for all of them.
///
/// The output has one entry per input, in input order. Tasks are polled
/// cooperatively; nothing is spawned.
pub async fn settle_all<I, F, T, E>(tasks: I, cancel: &CancellationToken) -> Vec<Settled<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let guarded = tasks.into_iter().map(|task| async move {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Settled::Cancelled,
            result = task => Settled::from(result),
        }
    });
    join_all(guarded).await
}
