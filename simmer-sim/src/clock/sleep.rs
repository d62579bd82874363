//! Sleep future resolved by logical clock steps.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use simmer_core::TimeError;

use super::world::WeakSimClock;

/// Future that completes once the clock has stepped past its deadline.
///
/// Dropping an unfinished `SleepFuture` abandons its timer: the waker is
/// released and the timer is discarded without advancing the clock.
#[derive(Debug)]
pub struct SleepFuture {
    clock: WeakSimClock,
    task_id: u64,
    completed: bool,
}

impl SleepFuture {
    /// Creates a new sleep future.
    ///
    /// This is called by [`SimClock::sleep`](super::SimClock::sleep) and
    /// should not be constructed directly by user code.
    pub fn new(clock: WeakSimClock, task_id: u64) -> Self {
        Self {
            clock,
            task_id,
            completed: false,
        }
    }
}

impl Future for SleepFuture {
    type Output = Result<(), TimeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.completed {
            return Poll::Ready(Ok(()));
        }

        let clock = match self.clock.upgrade() {
            Ok(clock) => clock,
            Err(e) => return Poll::Ready(Err(e)),
        };

        if clock.is_task_awake(self.task_id) {
            clock.complete_task(self.task_id);
            self.completed = true;
            Poll::Ready(Ok(()))
        } else {
            clock.register_task_waker(self.task_id, cx.waker().clone());
            Poll::Pending
        }
    }
}

impl Drop for SleepFuture {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        if let Ok(clock) = self.clock.upgrade() {
            clock.abandon_task(self.task_id);
        }
    }
}
