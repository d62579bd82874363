//! Simulation time provider implementation.

use async_trait::async_trait;
use std::time::Duration;

use simmer_core::{TimeError, TimeProvider};

use crate::clock::WeakSimClock;

/// Simulation time provider backed by a [`SimClock`](crate::SimClock).
#[derive(Debug, Clone)]
pub struct SimTimeProvider {
    clock: WeakSimClock,
}

impl SimTimeProvider {
    /// Create a new simulation time provider.
    pub fn new(clock: WeakSimClock) -> Self {
        Self { clock }
    }
}

#[async_trait(?Send)]
impl TimeProvider for SimTimeProvider {
    async fn sleep(&self, duration: Duration) -> Result<(), TimeError> {
        self.clock.sleep(duration)?.await
    }

    fn now(&self) -> Duration {
        self.clock.now().unwrap_or(Duration::ZERO)
    }

    async fn timeout<F, T>(&self, duration: Duration, future: F) -> Result<T, TimeError>
    where
        F: std::future::Future<Output = T>,
    {
        let deadline = self.clock.sleep(duration)?;

        // Both branches resolve through clock steps, so the race is deterministic
        tokio::select! {
            biased;
            result = future => Ok(result),
            _ = deadline => Err(TimeError::Elapsed),
        }
    }
}
