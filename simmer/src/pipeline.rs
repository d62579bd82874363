//! Sequential composition of stages with short-circuiting failure.
//!
//! A [`Pipeline`] runs its stages strictly in order. Stage *i + 1* starts
//! only after stage *i* has succeeded, and receives stage *i*'s output,
//! optionally reshaped by an adapter. The first failure ends the run and is
//! returned unchanged; later stages never start and nothing is rolled back.
//!
//! ```text
//!   input ──▶ [stage 0] ──adapt──▶ [stage 1] ──adapt──▶ [stage 2] ──▶ output
//!                 │                    │                    │
//!                 └──── first Err ─────┴────────────────────┴──▶ caller
//! ```
//!
//! The stage list is fixed once built: every combinator consumes the
//! pipeline and returns a new one.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use async_trait::async_trait;
use simmer_core::OperationResult;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::stage::Stage;

/// Type-erased future for one pipeline run.
type BoxedRun<Out> = Pin<Box<dyn Future<Output = OperationResult<Out>>>>;

/// Type-erased function running every stage composed so far.
type RunFn<In, Out> = Rc<dyn Fn(In, CancellationToken) -> BoxedRun<Out>>;

fn boxed<Out, F>(future: F) -> BoxedRun<Out>
where
    F: Future<Output = OperationResult<Out>> + 'static,
{
    Box::pin(future)
}

/// A fixed, ordered chain of stages.
pub struct Pipeline<In, Out> {
    name: String,
    stages: Vec<String>,
    run_fn: RunFn<In, Out>,
}

impl<In: 'static, Out: 'static> Pipeline<In, Out> {
    /// Start a pipeline named `name` whose first stage is `stage`.
    pub fn start<S>(name: impl Into<String>, stage: S) -> Self
    where
        S: Stage<Input = In, Output = Out>,
    {
        Self {
            name: name.into(),
            stages: vec![stage.name().to_string()],
            run_fn: stage_runner(stage, 0),
        }
    }

    /// Append `stage`, feeding it the previous output unchanged.
    pub fn then<S>(self, stage: S) -> Pipeline<In, S::Output>
    where
        S: Stage<Input = Out>,
    {
        self.then_adapted(stage, |output| output)
    }

    /// Append `stage`, feeding it `adapt(previous output)`.
    pub fn then_adapted<S, F>(self, stage: S, adapt: F) -> Pipeline<In, S::Output>
    where
        S: Stage,
        F: Fn(Out) -> S::Input + 'static,
    {
        let Pipeline {
            name,
            mut stages,
            run_fn: previous,
        } = self;

        let index = stages.len();
        stages.push(stage.name().to_string());
        let next = stage_runner(stage, index);
        let adapt = Rc::new(adapt);

        let run_fn: RunFn<In, S::Output> = Rc::new(move |input: In, cancel: CancellationToken| {
            let previous = Rc::clone(&previous);
            let next = Rc::clone(&next);
            let adapt = Rc::clone(&adapt);
            boxed(async move {
                let output = previous(input, cancel.clone()).await?;
                next(adapt(output), cancel).await
            })
        });

        Pipeline {
            name,
            stages,
            run_fn,
        }
    }

    /// The pipeline's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> &[String] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false`: a pipeline has at least its starting stage.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Run every stage in order.
    pub async fn run(&self, input: In) -> OperationResult<Out> {
        self.run_with_cancel(input, &CancellationToken::new()).await
    }

    /// Run every stage in order, stopping with
    /// [`OperationError::Cancelled`](simmer_core::OperationError::Cancelled)
    /// once `cancel` fires.
    #[instrument(skip_all, fields(pipeline = %self.name, stages = self.stages.len()))]
    pub async fn run_with_cancel(
        &self,
        input: In,
        cancel: &CancellationToken,
    ) -> OperationResult<Out> {
        let result = (self.run_fn)(input, cancel.clone()).await;
        match &result {
            Ok(_) => tracing::debug!("Pipeline completed"),
            Err(error) => tracing::debug!(%error, "Pipeline aborted"),
        }
        result
    }
}

/// Wrap one stage so it logs its position and forwards its result untouched.
fn stage_runner<S: Stage>(stage: S, index: usize) -> RunFn<S::Input, S::Output> {
    let stage = Rc::new(stage);
    Rc::new(move |input: S::Input, cancel: CancellationToken| {
        let stage = Rc::clone(&stage);
        boxed(async move {
            tracing::debug!(stage = stage.name(), index, "Stage starting");
            let result = stage.execute(input, &cancel).await;
            if let Err(error) = &result {
                tracing::debug!(stage = stage.name(), index, %error, "Stage failed");
            }
            result
        })
    })
}

impl<In, Out> Clone for Pipeline<In, Out> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            stages: self.stages.clone(),
            run_fn: Rc::clone(&self.run_fn),
        }
    }
}

impl<In, Out> fmt::Debug for Pipeline<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

#[async_trait(?Send)]
impl<In: 'static, Out: 'static> Stage for Pipeline<In, Out> {
    type Input = In;
    type Output = Out;

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: In, cancel: &CancellationToken) -> OperationResult<Out> {
        self.run_with_cancel(input, cancel).await
    }
}
