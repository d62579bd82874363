//! Latency bounds for simulated operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open latency range `[0, max_millis)` sampled once per invocation.
///
/// A bound of zero is raised to one millisecond so the range is never empty;
/// such a spec always samples a zero delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct LatencySpec {
    max_millis: u64,
}

impl LatencySpec {
    /// Default upper bound, in milliseconds.
    pub const DEFAULT_MAX_MILLIS: u64 = 2000;

    /// Create a latency spec with the given exclusive upper bound in milliseconds.
    pub fn new(max_millis: u64) -> Self {
        Self {
            max_millis: max_millis.max(1),
        }
    }

    /// A spec whose only possible sample is zero.
    pub fn instant() -> Self {
        Self::new(1)
    }

    /// Exclusive upper bound in milliseconds.
    pub fn max_millis(&self) -> u64 {
        self.max_millis
    }
}

impl Default for LatencySpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_MILLIS)
    }
}

impl From<u64> for LatencySpec {
    fn from(max_millis: u64) -> Self {
        Self::new(max_millis)
    }
}

impl From<LatencySpec> for u64 {
    fn from(spec: LatencySpec) -> Self {
        spec.max_millis
    }
}

impl fmt::Display for LatencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0, {}ms)", self.max_millis)
    }
}
