//! Timer queue ordered by deadline.

use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

/// A sleeper's wake-up scheduled for a specific logical time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTimer {
    deadline: Duration,
    task_id: u64,
    sequence: u64, // For deterministic ordering
}

impl ScheduledTimer {
    /// Creates a new scheduled timer.
    pub fn new(deadline: Duration, task_id: u64, sequence: u64) -> Self {
        Self {
            deadline,
            task_id,
            sequence,
        }
    }

    /// Returns the logical time at which the timer fires.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Returns the sleeper this timer wakes.
    pub fn task_id(&self) -> u64 {
        self.task_id
    }
}

impl PartialOrd for ScheduledTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max heap, but we want earliest deadline first
        match other.deadline.cmp(&self.deadline) {
            // Same deadline: earlier registration fires first
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            other => other,
        }
    }
}

/// A priority queue of timers in deadline order.
///
/// Timers sharing a deadline fire in registration order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<ScheduledTimer>,
}

impl TimerQueue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a timer.
    pub fn schedule(&mut self, timer: ScheduledTimer) {
        self.heap.push(timer);
    }

    /// Removes and returns the earliest timer.
    pub fn pop_earliest(&mut self) -> Option<ScheduledTimer> {
        self.heap.pop()
    }

    /// Returns `true` if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of queued timers.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
