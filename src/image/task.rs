//! Cancellable delivery handle for in-flight image loads.
//!
//! A load request hands back an [`ImageLoadTask`]; the worker that performs
//! the actual store access holds the matching [`DeliveryHandle`]. Cancelling
//! the task suppresses delivery of whatever the worker later produces, it
//! does not abort the store operation itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::error_handling::ImageError;

/// Result delivered by an image load.
pub type ImageLoadResult = Result<Vec<u8>, ImageError>;

/// Shared cancellation state between a task and its worker.
///
/// Composites register the currently-active inner task's state here so that
/// one outer `cancel()` reaches whichever inner request is in flight.
pub(crate) struct TaskState {
    cancelled: AtomicBool,
    inner: Mutex<Option<Arc<TaskState>>>,
}

impl TaskState {
    fn new() -> Self {
        TaskState {
            cancelled: AtomicBool::new(false),
            inner: Mutex::new(None),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_cancelled(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let inner = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(inner) = inner {
            inner.mark_cancelled();
        }
    }

    /// Registers `inner` as the currently-active nested task.
    ///
    /// If this state was already cancelled, the nested task is marked
    /// cancelled immediately, so a cancel issued before any inner request
    /// existed still suppresses the inner result.
    pub(crate) fn adopt_inner(&self, inner: Arc<TaskState>) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&inner));
        if self.is_cancelled() {
            inner.mark_cancelled();
        }
    }
}

/// Worker-side handle: delivers the final result unless the task was
/// cancelled first. Dropping the handle without delivering resolves the
/// task's [`ImageLoadTask::outcome`] to `None`.
pub struct DeliveryHandle {
    state: Arc<TaskState>,
    tx: oneshot::Sender<ImageLoadResult>,
}

impl DeliveryHandle {
    pub fn deliver(self, result: ImageLoadResult) {
        if self.state.is_cancelled() {
            return;
        }
        let _ = self.tx.send(result);
    }

    pub(crate) fn state(&self) -> Arc<TaskState> {
        Arc::clone(&self.state)
    }
}

/// Handle to an in-flight image data load.
pub struct ImageLoadTask {
    state: Arc<TaskState>,
    rx: oneshot::Receiver<ImageLoadResult>,
}

impl ImageLoadTask {
    /// Creates a not-yet-resolved task plus the worker-side delivery handle.
    pub fn pending() -> (Self, DeliveryHandle) {
        let state = Arc::new(TaskState::new());
        let (tx, rx) = oneshot::channel();
        let task = ImageLoadTask {
            state: Arc::clone(&state),
            rx,
        };
        (task, DeliveryHandle { state, tx })
    }

    /// Suppresses delivery of this task's result.
    ///
    /// The underlying store operation keeps running; only the hand-off of its
    /// result is dropped. Idempotent, and a no-op for results that were
    /// already delivered.
    pub fn cancel(&self) {
        self.state.mark_cancelled();
    }

    pub(crate) fn cancel_state(&self) -> Arc<TaskState> {
        Arc::clone(&self.state)
    }

    /// Waits for the task to finish.
    ///
    /// Resolves to `Some(result)` when the worker delivered one, or `None`
    /// when delivery was suppressed (the task was cancelled, or the owning
    /// loader went away before the result was ready).
    pub async fn outcome(self) -> Option<ImageLoadResult> {
        self.rx.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_outcome_resolves_with_delivered_result() {
        let (task, delivery) = ImageLoadTask::pending();

        delivery.deliver(Ok(vec![1, 2, 3]));

        assert_eq!(task.outcome().await, Some(Ok(vec![1, 2, 3])));
    }

    #[tokio::test]
    async fn test_outcome_is_none_when_cancelled_before_delivery() {
        let (task, delivery) = ImageLoadTask::pending();

        task.cancel();
        let handle = tokio::spawn(task.outcome());
        delivery.deliver(Ok(vec![1]));

        assert_eq!(handle.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_outcome_is_none_when_worker_drops_the_handle() {
        let (task, delivery) = ImageLoadTask::pending();

        drop(delivery);

        assert_eq!(task.outcome().await, None);
    }

    #[tokio::test]
    async fn test_cancel_after_delivery_does_not_retract_the_result() {
        let (task, delivery) = ImageLoadTask::pending();

        delivery.deliver(Ok(vec![7]));
        task.cancel();

        assert_eq!(task.outcome().await, Some(Ok(vec![7])));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let (task, delivery) = ImageLoadTask::pending();

        task.cancel();
        task.cancel();
        delivery.deliver(Err(ImageError::LoadFailed));

        assert_eq!(task.outcome().await, None);
    }

    #[tokio::test]
    async fn test_cancelling_an_adopted_inner_task_suppresses_its_delivery() {
        let (outer, _outer_delivery) = ImageLoadTask::pending();
        let (inner, inner_delivery) = ImageLoadTask::pending();

        outer.cancel_state().adopt_inner(inner.cancel_state());
        outer.cancel();
        inner_delivery.deliver(Ok(vec![9]));

        assert_eq!(inner.outcome().await, None);
    }

    #[tokio::test]
    async fn test_adopting_an_inner_task_after_cancel_marks_it_cancelled() {
        let (outer, _outer_delivery) = ImageLoadTask::pending();
        outer.cancel();

        let (inner, inner_delivery) = ImageLoadTask::pending();
        outer.cancel_state().adopt_inner(inner.cancel_state());
        inner_delivery.deliver(Ok(vec![9]));

        assert_eq!(inner.outcome().await, None);
    }
}
