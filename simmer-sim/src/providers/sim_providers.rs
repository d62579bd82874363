//! Simulation providers bundle implementation.

use simmer_core::{Providers, RandomProvider};

use crate::clock::SimClock;

use super::{SimRandomProvider, SimTimeProvider};

/// Simulation providers bundle for deterministic testing.
///
/// Pairs a [`SimTimeProvider`] with any random provider. The default is a
/// seeded [`SimRandomProvider`]; tests that need exact samples use
/// [`SimProviders::with_random`] with a
/// [`ScriptedRandomProvider`](super::ScriptedRandomProvider).
///
/// ```rust
/// use simmer_sim::{ScriptedRandomProvider, SimClock, SimProviders};
///
/// let clock = SimClock::new();
/// let seeded = SimProviders::new(&clock, 42);
/// let scripted = SimProviders::with_random(&clock, ScriptedRandomProvider::new());
/// ```
#[derive(Debug, Clone)]
pub struct SimProviders<R = SimRandomProvider> {
    time: SimTimeProvider,
    random: R,
}

impl SimProviders<SimRandomProvider> {
    /// Create a bundle on `clock` with a random stream seeded by `seed`.
    pub fn new(clock: &SimClock, seed: u64) -> Self {
        Self::with_random(clock, SimRandomProvider::new(seed))
    }
}

impl<R: RandomProvider + 'static> SimProviders<R> {
    /// Create a bundle on `clock` with the given random provider.
    pub fn with_random(clock: &SimClock, random: R) -> Self {
        Self {
            time: SimTimeProvider::new(clock.downgrade()),
            random,
        }
    }
}

impl<R: RandomProvider + 'static> Providers for SimProviders<R> {
    type Time = SimTimeProvider;
    type Random = R;

    fn time(&self) -> &Self::Time {
        &self.time
    }

    fn random(&self) -> &Self::Random {
        &self.random
    }
}
