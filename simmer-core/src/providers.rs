//! Provider bundle trait for simplified type parameters.
//!
//! Simulated operations need both a clock and a source of randomness.
//! Bundling them keeps signatures to a single type parameter:
//!
//! ```text
//! struct SimulatedOperation<P: Providers, In, Out>
//! ```
//!
//! instead of carrying `T: TimeProvider` and `R: RandomProvider` separately.

use crate::{RandomProvider, TimeProvider, TokioRandomProvider, TokioTimeProvider};

/// Bundle of provider types for a runtime environment.
///
/// ## Implementations
///
/// - [`TokioProviders`]: Production providers using real Tokio time
/// - `SimProviders` (in simmer-sim): Logical time and deterministic randomness
pub trait Providers: Clone + 'static {
    /// Time provider type for sleep, timeout, and time queries.
    type Time: TimeProvider + Clone + 'static;

    /// Random provider type for deterministic or real randomness.
    type Random: RandomProvider + Clone + 'static;

    /// Get the time provider instance.
    fn time(&self) -> &Self::Time;

    /// Get the random provider instance.
    fn random(&self) -> &Self::Random;
}

/// Production providers using Tokio runtime.
///
/// ## Example
///
/// ```rust
/// use simmer_core::{Providers, TimeProvider, TokioProviders};
///
/// let providers = TokioProviders::new();
/// let _elapsed = providers.time().now();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokioProviders {
    time: TokioTimeProvider,
    random: TokioRandomProvider,
}

impl TokioProviders {
    /// Create a new production providers bundle.
    pub fn new() -> Self {
        Self {
            time: TokioTimeProvider::new(),
            random: TokioRandomProvider::new(),
        }
    }
}

impl Providers for TokioProviders {
    type Time = TokioTimeProvider;
    type Random = TokioRandomProvider;

    fn time(&self) -> &Self::Time {
        &self.time
    }

    fn random(&self) -> &Self::Random {
        &self.random
    }
}
