//! Simulated operations: one randomized suspension, then a designed outcome.
//!
//! A [`SimulatedOperation`] models a slow, fallible unit of work. Each
//! invocation:
//!
//! 1. samples a latency from its [`LatencySpec`],
//! 2. suspends for that long on the [`TimeProvider`] (the only suspension point),
//! 3. evaluates its [`OutcomeRule`] against the input,
//! 4. on success returns the result producer's value, otherwise fails with a
//!    [`SimulationError`] built by the rejection producer.
//!
//! Faults raised by the outcome predicate or the result producer surface as
//! [`OperationError::Internal`], never as designed rejections.
//!
//! # Example
//!
//! ```rust
//! use simmer::{OutcomeRule, SimulatedOperation};
//! use simmer_sim::{ScriptedRandomProvider, SimClock, SimProviders};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let clock = SimClock::new();
//! let random = ScriptedRandomProvider::new().with_latencies([400]);
//! let providers = SimProviders::with_random(&clock, random);
//!
//! let double = SimulatedOperation::builder("double", providers)
//!     .outcome(OutcomeRule::predicate(|n: &u32| Ok(*n < 100)))
//!     .produce(|n: &u32| Ok(n * 2));
//!
//! let result = clock.run_until_complete(double.invoke(21)).await;
//! assert_eq!(result, Ok(42));
//! # });
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use async_trait::async_trait;
use simmer_core::{
    InternalError, LatencySpec, OperationError, OperationResult, Providers, RandomProvider,
    SimulationError, TimeProvider,
};
use tokio_util::sync::CancellationToken;

use crate::sink::{SharedSink, TracingSink};
use crate::stage::Stage;

/// Fallible predicate deciding whether an input is accepted.
pub type Predicate<In> = Rc<dyn Fn(&In) -> Result<bool, InternalError>>;

/// Result producer invoked on the success path.
pub type Producer<In, Out> = Rc<dyn Fn(&In) -> Result<Out, InternalError>>;

/// Builds the rejection reason on the failure path.
pub type RejectReason<In> = Rc<dyn Fn(&In) -> String>;

/// Builds a progress line emitted before the operation suspends.
pub type Announcement<In> = Rc<dyn Fn(&In) -> String>;

/// Policy deciding whether an invocation succeeds.
///
/// Exactly one rule attaches to an operation and it never changes.
pub enum OutcomeRule<In> {
    /// Every invocation succeeds.
    AlwaysSucceed,
    /// Succeeds with the given probability, sampled fresh per invocation.
    ProbabilisticSucceed {
        /// Chance of success in `[0, 1]`; higher means more likely.
        success_probability: f64,
    },
    /// Succeeds when the predicate accepts the input.
    PredicateSucceed(Predicate<In>),
}

impl<In> OutcomeRule<In> {
    /// Rule that always succeeds.
    pub fn always() -> Self {
        OutcomeRule::AlwaysSucceed
    }

    /// Rule that succeeds with probability `success_probability`.
    pub fn probabilistic(success_probability: f64) -> Self {
        OutcomeRule::ProbabilisticSucceed {
            success_probability,
        }
    }

    /// Rule that succeeds when `predicate` returns `Ok(true)`.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&In) -> Result<bool, InternalError> + 'static,
    {
        OutcomeRule::PredicateSucceed(Rc::new(predicate))
    }

    /// Evaluate the rule for one invocation.
    fn accepts<R: RandomProvider>(&self, input: &In, random: &R) -> Result<bool, InternalError> {
        match self {
            OutcomeRule::AlwaysSucceed => Ok(true),
            OutcomeRule::ProbabilisticSucceed {
                success_probability,
            } => Ok(random.sample_outcome(*success_probability)),
            OutcomeRule::PredicateSucceed(predicate) => predicate(input),
        }
    }
}

impl<In> Clone for OutcomeRule<In> {
    fn clone(&self) -> Self {
        match self {
            OutcomeRule::AlwaysSucceed => OutcomeRule::AlwaysSucceed,
            OutcomeRule::ProbabilisticSucceed {
                success_probability,
            } => OutcomeRule::ProbabilisticSucceed {
                success_probability: *success_probability,
            },
            OutcomeRule::PredicateSucceed(predicate) => {
                OutcomeRule::PredicateSucceed(Rc::clone(predicate))
            }
        }
    }
}

impl<In> fmt::Debug for OutcomeRule<In> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeRule::AlwaysSucceed => f.write_str("AlwaysSucceed"),
            OutcomeRule::ProbabilisticSucceed {
                success_probability,
            } => f
                .debug_struct("ProbabilisticSucceed")
                .field("success_probability", success_probability)
                .finish(),
            OutcomeRule::PredicateSucceed(_) => f.write_str("PredicateSucceed(..)"),
        }
    }
}

/// A unit of simulated deferred work.
///
/// Stateless between invocations: nothing is carried from one call to the
/// next except through state the producer closures capture themselves.
pub struct SimulatedOperation<P: Providers, In, Out> {
    name: String,
    providers: P,
    latency: LatencySpec,
    outcome: OutcomeRule<In>,
    produce: Producer<In, Out>,
    reject: Option<RejectReason<In>>,
    announce: Option<Announcement<In>>,
    sink: SharedSink,
}

impl<P: Providers, In, Out> SimulatedOperation<P, In, Out> {
    /// Start building an operation named `name` that runs on `providers`.
    pub fn builder(name: impl Into<String>, providers: P) -> OperationBuilder<P, In, Out> {
        OperationBuilder::new(name, providers)
    }

    /// The operation's name, used in logs and default rejection reasons.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The latency bound sampled on each invocation.
    pub fn latency(&self) -> LatencySpec {
        self.latency
    }

    /// The attached outcome rule.
    pub fn outcome(&self) -> &OutcomeRule<In> {
        &self.outcome
    }

    /// Invoke the operation.
    pub async fn invoke(&self, input: In) -> OperationResult<Out> {
        self.invoke_with_cancel(input, &CancellationToken::new())
            .await
    }

    /// Invoke the operation, abandoning the suspension if `cancel` fires.
    ///
    /// A cancelled invocation returns [`OperationError::Cancelled`] and never
    /// calls the result or rejection producer.
    pub async fn invoke_with_cancel(
        &self,
        input: In,
        cancel: &CancellationToken,
    ) -> OperationResult<Out> {
        if let Some(announce) = &self.announce {
            self.sink.emit(&announce(&input));
        }

        let latency = self.providers.random().sample_latency(&self.latency);
        tracing::debug!(
            operation = %self.name,
            latency_ms = latency.as_millis() as u64,
            "Suspending"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(operation = %self.name, "Cancelled while suspended");
                return Err(OperationError::Cancelled);
            }
            slept = self.providers.time().sleep(latency) => slept?,
        }

        let accepted = self
            .outcome
            .accepts(&input, self.providers.random())
            .map_err(|fault| self.fault(fault))?;

        if !accepted {
            let reason = match &self.reject {
                Some(reject) => reject(&input),
                None => format!("{} was rejected", self.name),
            };
            tracing::debug!(operation = %self.name, %reason, "Rejected");
            return Err(SimulationError::new(reason).into());
        }

        let output = (self.produce)(&input).map_err(|fault| self.fault(fault))?;
        tracing::debug!(operation = %self.name, "Succeeded");
        Ok(output)
    }

    fn fault(&self, fault: InternalError) -> OperationError {
        tracing::warn!(operation = %self.name, cause = %fault.cause, "Internal fault");
        OperationError::Internal(fault)
    }
}

impl<P: Providers, In, Out> fmt::Debug for SimulatedOperation<P, In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedOperation")
            .field("name", &self.name)
            .field("latency", &self.latency)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

#[async_trait(?Send)]
impl<P, In, Out> Stage for SimulatedOperation<P, In, Out>
where
    P: Providers,
    In: 'static,
    Out: 'static,
{
    type Input = In;
    type Output = Out;

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: In, cancel: &CancellationToken) -> OperationResult<Out> {
        self.invoke_with_cancel(input, cancel).await
    }
}

/// Builder for [`SimulatedOperation`].
///
/// Defaults: [`LatencySpec::default`], [`OutcomeRule::AlwaysSucceed`], a
/// rejection reason of `"<name> was rejected"`, no announcement and a
/// [`TracingSink`]. [`produce`](OperationBuilder::produce) finishes the build.
pub struct OperationBuilder<P: Providers, In, Out> {
    name: String,
    providers: P,
    latency: LatencySpec,
    outcome: OutcomeRule<In>,
    reject: Option<RejectReason<In>>,
    announce: Option<Announcement<In>>,
    sink: SharedSink,
    _output: PhantomData<fn() -> Out>,
}

impl<P: Providers, In, Out> OperationBuilder<P, In, Out> {
    fn new(name: impl Into<String>, providers: P) -> Self {
        Self {
            name: name.into(),
            providers,
            latency: LatencySpec::default(),
            outcome: OutcomeRule::AlwaysSucceed,
            reject: None,
            announce: None,
            sink: Rc::new(TracingSink),
            _output: PhantomData,
        }
    }

    /// Set the latency bound.
    pub fn latency(mut self, latency: LatencySpec) -> Self {
        self.latency = latency;
        self
    }

    /// Set the outcome rule.
    pub fn outcome(mut self, outcome: OutcomeRule<In>) -> Self {
        self.outcome = outcome;
        self
    }

    /// Build the rejection reason from the input.
    pub fn reject_with<F>(mut self, reject: F) -> Self
    where
        F: Fn(&In) -> String + 'static,
    {
        self.reject = Some(Rc::new(reject));
        self
    }

    /// Emit a progress line built from the input before suspending.
    pub fn announce<F>(mut self, announce: F) -> Self
    where
        F: Fn(&In) -> String + 'static,
    {
        self.announce = Some(Rc::new(announce));
        self
    }

    /// Send announcements to `sink`.
    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Attach the result producer and finish the build.
    pub fn produce<F>(self, produce: F) -> SimulatedOperation<P, In, Out>
    where
        F: Fn(&In) -> Result<Out, InternalError> + 'static,
    {
        SimulatedOperation {
            name: self.name,
            providers: self.providers,
            latency: self.latency,
            outcome: self.outcome,
            produce: Rc::new(produce),
            reject: self.reject,
            announce: self.announce,
            sink: self.sink,
        }
    }
}
