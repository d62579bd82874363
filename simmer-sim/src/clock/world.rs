//! Core logical clock and stepping logic.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    future::{poll_fn, Future},
    rc::{Rc, Weak},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll, Wake, Waker},
    time::Duration,
};
use tracing::instrument;

use simmer_core::TimeError;

use super::{
    sleep::SleepFuture,
    timers::{ScheduledTimer, TimerQueue},
};

/// Internal clock state holder
#[derive(Debug, Default)]
pub(crate) struct ClockInner {
    pub(crate) current_time: Duration,
    pub(crate) timers: TimerQueue,
    pub(crate) next_sequence: u64,
    pub(crate) next_task_id: u64,

    // Sleepers whose timer fired but which have not been polled since
    pub(crate) awakened_tasks: HashSet<u64>,
    // Sleepers dropped before their timer fired
    pub(crate) cancelled_tasks: HashSet<u64>,
    pub(crate) task_wakers: HashMap<u64, Waker>,

    pub(crate) timers_fired: u64,
}

/// Logical clock that advances only when stepped.
///
/// `SimClock` owns all timer state. Providers hold a [`WeakSimClock`] so the
/// clock can be dropped independently; sleeping on a dropped clock fails
/// with [`TimeError::Shutdown`].
#[derive(Debug, Default)]
pub struct SimClock {
    pub(crate) inner: Rc<RefCell<ClockInner>>,
}

impl SimClock {
    /// Creates a new clock at logical time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the earliest pending timer and advances time to its deadline.
    ///
    /// Timers belonging to dropped sleepers are discarded without moving the
    /// clock. Returns `true` if a timer fired, `false` if none was pending.
    #[instrument(skip(self))]
    pub fn step(&self) -> bool {
        let waker = {
            let mut inner = self.inner.borrow_mut();
            loop {
                let Some(timer) = inner.timers.pop_earliest() else {
                    return false;
                };

                if inner.cancelled_tasks.remove(&timer.task_id()) {
                    tracing::trace!(task_id = timer.task_id(), "Discarding cancelled timer");
                    continue;
                }

                inner.current_time = timer.deadline();
                inner.awakened_tasks.insert(timer.task_id());
                inner.timers_fired += 1;
                break inner.task_wakers.remove(&timer.task_id());
            }
        };

        // Wake outside the borrow so the sleeper may re-enter the clock
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }

    /// Fires timers until none remain.
    #[instrument(skip(self))]
    pub fn run_until_empty(&self) {
        while self.step() {}
    }

    /// Drives `future` to completion, stepping the clock whenever it is idle.
    ///
    /// The clock only advances when the future is pending and was not woken
    /// during its last poll, so work that is already runnable (a cancellation
    /// signal, a completed sibling) always happens before logical time moves.
    /// The future is re-polled after every fired timer, so sleeps it starts
    /// later are scheduled relative to the logical time at which they start.
    /// With no timers queued, control is yielded to the runtime so other
    /// tasks can make progress.
    pub async fn run_until_complete<F: Future>(&self, future: F) -> F::Output {
        let mut future = std::pin::pin!(future);
        loop {
            let (polled, rewoken) = poll_fn(|cx| {
                let flag = Arc::new(WakeFlag {
                    woken: AtomicBool::new(false),
                    waker: cx.waker().clone(),
                });
                let waker = Waker::from(Arc::clone(&flag));
                let polled = future.as_mut().poll(&mut Context::from_waker(&waker));
                Poll::Ready((polled, flag.woken.load(Ordering::Acquire)))
            })
            .await;

            match polled {
                Poll::Ready(output) => return output,
                Poll::Pending if rewoken => tokio::task::yield_now().await,
                Poll::Pending => {
                    if !self.step() {
                        tokio::task::yield_now().await;
                    }
                }
            }
        }
    }

    /// Returns the current logical time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().current_time
    }

    /// Returns the number of live timers waiting to fire.
    pub fn pending_timer_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.timers.len().saturating_sub(inner.cancelled_tasks.len())
    }

    /// Returns `true` if a live timer is waiting to fire.
    pub fn has_pending_timers(&self) -> bool {
        self.pending_timer_count() > 0
    }

    /// Returns how many timers have fired since the clock was created.
    pub fn timers_fired(&self) -> u64 {
        self.inner.borrow().timers_fired
    }

    /// Sleep for `duration` of logical time.
    pub fn sleep(&self, duration: Duration) -> SleepFuture {
        let task_id = {
            let mut inner = self.inner.borrow_mut();
            let task_id = inner.next_task_id;
            inner.next_task_id += 1;

            let deadline = inner.current_time + duration;
            let sequence = inner.next_sequence;
            inner.next_sequence += 1;
            inner
                .timers
                .schedule(ScheduledTimer::new(deadline, task_id, sequence));
            task_id
        };

        SleepFuture::new(self.downgrade(), task_id)
    }

    /// Creates a weak reference to this clock.
    pub fn downgrade(&self) -> WeakSimClock {
        WeakSimClock {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub(crate) fn is_task_awake(&self, task_id: u64) -> bool {
        self.inner.borrow().awakened_tasks.contains(&task_id)
    }

    pub(crate) fn complete_task(&self, task_id: u64) {
        self.inner.borrow_mut().awakened_tasks.remove(&task_id);
    }

    pub(crate) fn register_task_waker(&self, task_id: u64, waker: Waker) {
        self.inner.borrow_mut().task_wakers.insert(task_id, waker);
    }

    pub(crate) fn abandon_task(&self, task_id: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.task_wakers.remove(&task_id);
        // A fired-but-unpolled timer is already out of the queue
        if !inner.awakened_tasks.remove(&task_id) {
            inner.cancelled_tasks.insert(task_id);
        }
    }
}

/// Records whether a poll woke its own task before returning.
struct WakeFlag {
    woken: AtomicBool,
    waker: Waker,
}

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.woken.store(true, Ordering::Release);
        self.waker.wake_by_ref();
    }
}

/// Weak handle to a [`SimClock`].
#[derive(Debug, Clone)]
pub struct WeakSimClock {
    pub(crate) inner: Weak<RefCell<ClockInner>>,
}

impl WeakSimClock {
    /// Attempts to upgrade to a strong handle.
    pub fn upgrade(&self) -> Result<SimClock, TimeError> {
        self.inner
            .upgrade()
            .map(|inner| SimClock { inner })
            .ok_or(TimeError::Shutdown)
    }

    /// Current logical time, or [`TimeError::Shutdown`] if the clock is gone.
    pub fn now(&self) -> Result<Duration, TimeError> {
        Ok(self.upgrade()?.now())
    }

    /// Sleep for `duration` of logical time.
    pub fn sleep(&self, duration: Duration) -> Result<SleepFuture, TimeError> {
        Ok(self.upgrade()?.sleep(duration))
    }
}
