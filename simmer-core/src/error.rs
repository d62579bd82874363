//! Error taxonomy for simulated operations.
//!
//! Callers must be able to tell a designed rejection ([`SimulationError`])
//! apart from a malfunction inside the harness ([`InternalError`]). Neither
//! is ever coerced into the other.

use std::time::Duration;

use thiserror::Error;

use crate::time::TimeError;

/// A designed, expected rejection produced by an operation's outcome rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct SimulationError {
    /// Human-readable reason for the rejection.
    pub reason: String,
}

impl SimulationError {
    /// Create a rejection with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// An unexpected fault inside the harness or one of its producer functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal fault: {cause}")]
pub struct InternalError {
    /// Description of what went wrong.
    pub cause: String,
}

impl InternalError {
    /// Create an internal fault with the given cause.
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

impl From<TimeError> for InternalError {
    fn from(err: TimeError) -> Self {
        InternalError::new(err.to_string())
    }
}

/// Errors that can end a simulated operation or pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The simulated business rule rejected the input.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// The harness itself malfunctioned.
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// A pending suspension was cancelled before it elapsed.
    #[error("operation cancelled")]
    Cancelled,

    /// A caller-imposed deadline passed before the work finished.
    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl OperationError {
    /// Shorthand for a designed rejection.
    pub fn rejected(reason: impl Into<String>) -> Self {
        OperationError::Simulation(SimulationError::new(reason))
    }

    /// Shorthand for an internal fault.
    pub fn internal(cause: impl Into<String>) -> Self {
        OperationError::Internal(InternalError::new(cause))
    }

    /// Returns `true` for designed rejections.
    pub fn is_simulation(&self) -> bool {
        matches!(self, OperationError::Simulation(_))
    }

    /// Returns `true` for internal faults.
    pub fn is_internal(&self) -> bool {
        matches!(self, OperationError::Internal(_))
    }

    /// Returns `true` if the operation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OperationError::Cancelled)
    }

    /// Returns `true` if a deadline passed first.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, OperationError::TimedOut(_))
    }
}

impl From<TimeError> for OperationError {
    fn from(err: TimeError) -> Self {
        OperationError::Internal(err.into())
    }
}

/// A type alias for `Result<T, OperationError>`.
pub type OperationResult<T> = Result<T, OperationError>;
