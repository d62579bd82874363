//! The invocation contract shared by operations and pipelines.

use async_trait::async_trait;
use simmer_core::OperationResult;
use tokio_util::sync::CancellationToken;

/// Anything a [`Pipeline`](crate::Pipeline) can run as one step.
///
/// Implemented by [`SimulatedOperation`](crate::SimulatedOperation) and by
/// [`Pipeline`](crate::Pipeline) itself, so pipelines nest.
#[async_trait(?Send)]
pub trait Stage: 'static {
    /// Value the stage consumes.
    type Input: 'static;

    /// Value the stage yields on success.
    type Output: 'static;

    /// Name used in logs.
    fn name(&self) -> &str;

    /// Run the stage once.
    ///
    /// Implementations must return [`OperationError::Cancelled`](simmer_core::OperationError::Cancelled)
    /// promptly once `cancel` fires.
    async fn execute(
        &self,
        input: Self::Input,
        cancel: &CancellationToken,
    ) -> OperationResult<Self::Output>;
}
