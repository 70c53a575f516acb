//! Result handle of a submitted task.

use super::PoolError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot::{self, error::TryRecvError};

/// Pending result of a task submitted to a [`WorkerPool`](super::WorkerPool).
///
/// Await it from async code, or call [`TaskHandle::wait`] from a plain
/// thread. Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct TaskHandle<R> {
    rx: oneshot::Receiver<Result<R, PoolError>>,
}

impl<R> TaskHandle<R> {
    pub(super) fn new(rx: oneshot::Receiver<Result<R, PoolError>>) -> Self {
        Self { rx }
    }

    /// Block the current thread until the task has finished.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime; `.await` the handle
    /// there instead.
    pub fn wait(self) -> Result<R, PoolError> {
        self.rx
            .blocking_recv()
            .unwrap_or(Err(PoolError::TaskDropped))
    }

    /// Take the result if the task has already finished.
    pub fn try_take(&mut self) -> Option<Result<R, PoolError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(PoolError::TaskDropped)),
        }
    }
}

impl<R> Future for TaskHandle<R> {
    type Output = Result<R, PoolError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(PoolError::TaskDropped)))
    }
}
