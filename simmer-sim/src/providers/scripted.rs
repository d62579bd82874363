//! Random provider that replays values injected by a test.

use rand::distr::uniform::SampleUniform;
use simmer_core::{LatencySpec, RandomProvider};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::ops::Range;
use std::rc::Rc;
use std::time::Duration;

use super::SimRandomProvider;

#[derive(Debug, Default)]
struct Script {
    latencies: VecDeque<Duration>,
    outcomes: VecDeque<bool>,
    indices: VecDeque<usize>,
    latency_draws: u64,
    outcome_draws: u64,
    index_draws: u64,
}

/// Random provider returning exactly the values a test queued.
///
/// Latencies, outcomes and indices each have their own queue. A scripted
/// value is returned verbatim: a scripted latency ignores the
/// [`LatencySpec`] bound, a scripted index may exceed the collection length
/// and a scripted outcome ignores the success probability. Once a queue is
/// empty the provider falls back to a seeded [`SimRandomProvider`].
///
/// Clones share the script, so values can be pushed after the provider was
/// handed to an operation.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use simmer_core::{LatencySpec, RandomProvider};
/// use simmer_sim::ScriptedRandomProvider;
///
/// let random = ScriptedRandomProvider::new()
///     .with_latencies([250])
///     .with_outcomes([false]);
///
/// assert_eq!(random.sample_latency(&LatencySpec::default()), Duration::from_millis(250));
/// assert!(!random.sample_outcome(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedRandomProvider {
    script: Rc<RefCell<Script>>,
    fallback: SimRandomProvider,
}

impl ScriptedRandomProvider {
    /// Create a provider with empty queues and a fallback seeded with 0.
    pub fn new() -> Self {
        Self::with_fallback_seed(0)
    }

    /// Create a provider with empty queues and the given fallback seed.
    pub fn with_fallback_seed(seed: u64) -> Self {
        Self {
            script: Rc::new(RefCell::new(Script::default())),
            fallback: SimRandomProvider::new(seed),
        }
    }

    /// Queue latencies, in milliseconds.
    pub fn with_latencies(self, millis: impl IntoIterator<Item = u64>) -> Self {
        for ms in millis {
            self.push_latency(Duration::from_millis(ms));
        }
        self
    }

    /// Queue outcomes.
    pub fn with_outcomes(self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        for outcome in outcomes {
            self.push_outcome(outcome);
        }
        self
    }

    /// Queue indices.
    pub fn with_indices(self, indices: impl IntoIterator<Item = usize>) -> Self {
        for index in indices {
            self.push_index(index);
        }
        self
    }

    /// Queue one latency.
    pub fn push_latency(&self, latency: Duration) {
        self.script.borrow_mut().latencies.push_back(latency);
    }

    /// Queue one outcome.
    pub fn push_outcome(&self, outcome: bool) {
        self.script.borrow_mut().outcomes.push_back(outcome);
    }

    /// Queue one index.
    pub fn push_index(&self, index: usize) {
        self.script.borrow_mut().indices.push_back(index);
    }

    /// Number of latency samples drawn so far, scripted or not.
    pub fn latency_draws(&self) -> u64 {
        self.script.borrow().latency_draws
    }

    /// Number of outcome samples drawn so far, scripted or not.
    pub fn outcome_draws(&self) -> u64 {
        self.script.borrow().outcome_draws
    }

    /// Number of index samples drawn so far, scripted or not.
    pub fn index_draws(&self) -> u64 {
        self.script.borrow().index_draws
    }

    /// Number of scripted values not yet consumed, across all queues.
    pub fn remaining(&self) -> usize {
        let script = self.script.borrow();
        script.latencies.len() + script.outcomes.len() + script.indices.len()
    }
}

impl Default for ScriptedRandomProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomProvider for ScriptedRandomProvider {
    fn random_range<T>(&self, range: Range<T>) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        self.fallback.random_range(range)
    }

    fn random_ratio(&self) -> f64 {
        self.fallback.random_ratio()
    }

    fn sample_latency(&self, spec: &LatencySpec) -> Duration {
        let scripted = {
            let mut script = self.script.borrow_mut();
            script.latency_draws += 1;
            script.latencies.pop_front()
        };
        scripted.unwrap_or_else(|| self.fallback.sample_latency(spec))
    }

    fn sample_outcome(&self, success_probability: f64) -> bool {
        let scripted = {
            let mut script = self.script.borrow_mut();
            script.outcome_draws += 1;
            script.outcomes.pop_front()
        };
        scripted.unwrap_or_else(|| self.fallback.sample_outcome(success_probability))
    }

    fn sample_index(&self, len: usize) -> usize {
        let scripted = {
            let mut script = self.script.borrow_mut();
            script.index_draws += 1;
            script.indices.pop_front()
        };
        scripted.unwrap_or_else(|| self.fallback.sample_index(len))
    }
}
