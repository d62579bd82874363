//! Random number generation provider abstraction.
//!
//! Every source of randomness an operation consumes goes through a
//! [`RandomProvider`], so tests can swap the process RNG for a seeded or
//! scripted one and get reproducible runs.

use rand::distr::uniform::SampleUniform;
use rand::Rng;
use std::cell::RefCell;
use std::ops::Range;
use std::time::Duration;

use crate::LatencySpec;

/// Provider trait for random number generation.
///
/// Implementations supply the raw primitives; the harness-level sampling
/// methods ([`sample_latency`](RandomProvider::sample_latency) and
/// [`sample_outcome`](RandomProvider::sample_outcome)) have default bodies
/// built on them and may be overridden by stubs that inject exact values.
pub trait RandomProvider: Clone {
    /// Generate a random value within a specified range.
    ///
    /// The range is exclusive of the upper bound (start..end).
    fn random_range<T>(&self, range: Range<T>) -> T
    where
        T: SampleUniform + PartialOrd;

    /// Generate a random f64 between 0.0 and 1.0.
    fn random_ratio(&self) -> f64;

    /// Generate a random bool with the given probability of being true.
    ///
    /// The probability should be between 0.0 and 1.0.
    fn random_bool(&self, probability: f64) -> bool {
        self.random_ratio() < probability
    }

    /// Sample a latency uniformly from `[0, spec.max_millis())` milliseconds.
    fn sample_latency(&self, spec: &LatencySpec) -> Duration {
        Duration::from_millis(self.random_range(0..spec.max_millis()))
    }

    /// Sample an outcome that is `true` with probability `success_probability`.
    ///
    /// Higher values mean success is more likely. Values outside `[0, 1]`
    /// are clamped and NaN never succeeds.
    fn sample_outcome(&self, success_probability: f64) -> bool {
        if success_probability.is_nan() {
            return false;
        }
        self.random_bool(success_probability.clamp(0.0, 1.0))
    }

    /// Pick an index into a collection of `len` options.
    ///
    /// Returns 0 for an empty collection; callers index with `get` and treat
    /// a miss as a fault.
    fn sample_index(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.random_range(0..len)
        }
    }
}

/// Production random provider using thread-local RNG.
///
/// Uses `rand::rng()` (thread-local, non-cryptographic). Runs are not
/// reproducible; use `SimRandomProvider` from `simmer-sim` for that.
///
/// # Example
///
/// ```rust
/// use simmer_core::{LatencySpec, RandomProvider, TokioRandomProvider};
///
/// let random = TokioRandomProvider::new();
/// let latency = random.sample_latency(&LatencySpec::new(100));
/// assert!(latency.as_millis() < 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokioRandomProvider;

impl TokioRandomProvider {
    /// Create a new production random provider.
    pub fn new() -> Self {
        Self
    }
}

thread_local! {
    static RNG: RefCell<rand::rngs::ThreadRng> = RefCell::new(rand::rng());
}

impl RandomProvider for TokioRandomProvider {
    fn random_range<T>(&self, range: Range<T>) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        RNG.with(|rng| rng.borrow_mut().random_range(range))
    }

    fn random_ratio(&self) -> f64 {
        RNG.with(|rng| rng.borrow_mut().random())
    }
}
