//! Shared context handed to narrative constructors.

use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use simmer_core::{
    LatencySpec, OperationError, OperationResult, Providers, TimeError, TimeProvider,
};

use crate::config::HarnessConfig;
use crate::operation::{OperationBuilder, SimulatedOperation};
use crate::sink::{SharedSink, TracingSink};

/// Providers, configuration and progress sink bundled into one handle.
///
/// Narrative constructors take a `&HarnessContext` and use
/// [`operation`](HarnessContext::operation) to get builders that already
/// carry the providers, latency bound and sink.
#[derive(Clone)]
pub struct HarnessContext<P: Providers> {
    providers: P,
    config: HarnessConfig,
    sink: SharedSink,
}

impl<P: Providers> HarnessContext<P> {
    /// Create a context that logs progress through `tracing`.
    pub fn new(providers: P, config: HarnessConfig) -> Self {
        Self {
            providers,
            config,
            sink: Rc::new(TracingSink),
        }
    }

    /// Replace the progress sink.
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// The provider bundle.
    pub fn providers(&self) -> &P {
        &self.providers
    }

    /// Shortcut to the random provider.
    pub fn random(&self) -> &P::Random {
        self.providers.random()
    }

    /// The harness configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The progress sink.
    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Latency bound for every operation built from this context.
    pub fn latency(&self) -> LatencySpec {
        self.config.latency()
    }

    /// A builder pre-filled with this context's providers, latency and sink.
    pub fn operation<In, Out>(&self, name: impl Into<String>) -> OperationBuilder<P, In, Out> {
        SimulatedOperation::builder(name, self.providers.clone())
            .latency(self.latency())
            .sink(Rc::clone(&self.sink))
    }

    /// Run `work`, failing with [`OperationError::TimedOut`] once `limit`
    /// passes on this context's clock.
    ///
    /// Whatever `work` was suspended on is dropped with it, so its pending
    /// timers are abandoned.
    pub async fn within<T, F>(&self, limit: Duration, work: F) -> OperationResult<T>
    where
        F: Future<Output = OperationResult<T>>,
    {
        let time = self.providers.time();
        let started = time.now();
        let result = match time.timeout(limit, work).await {
            Ok(result) => result,
            Err(TimeError::Elapsed) => Err(OperationError::TimedOut(limit)),
            Err(err) => Err(err.into()),
        };
        tracing::debug!(
            elapsed_ms = time.now().saturating_sub(started).as_millis() as u64,
            limit_ms = limit.as_millis() as u64,
            ok = result.is_ok(),
            "Bounded run finished"
        );
        result
    }
}

impl<P: Providers> fmt::Debug for HarnessContext<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
