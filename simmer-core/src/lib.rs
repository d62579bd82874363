//! # simmer-core
//!
//! Core abstractions for the simmer simulation harness.
//!
//! This crate provides the traits and types every simulated operation is
//! built on:
//!
//! - **Provider traits**: Abstractions for time and randomness
//! - **Latency bounds**: [`LatencySpec`] describing how long an operation may take
//! - **Error taxonomy**: Designed rejections, internal faults and cancellation
//!
//! ## Provider Traits
//!
//! The provider traits allow the same operation code to run against real
//! Tokio time and entropy, or against the deterministic providers from
//! `simmer-sim`:
//!
//! - [`TimeProvider`]: Sleep, timeout, and time operations
//! - [`RandomProvider`]: Latency and outcome sampling
//! - [`Providers`]: Bundle of both, so downstream code carries one type parameter
//!
//! ## Error Taxonomy
//!
//! - [`SimulationError`]: the simulated business rule rejected the input
//! - [`InternalError`]: the harness or one of its producers malfunctioned
//! - [`OperationError::Cancelled`]: a pending suspension was cancelled

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

mod error;
mod latency;
mod providers;
mod random;
mod time;

// Error exports
pub use error::{InternalError, OperationError, OperationResult, SimulationError};

// Latency exports
pub use latency::LatencySpec;

// Provider trait exports
pub use providers::{Providers, TokioProviders};
pub use random::{RandomProvider, TokioRandomProvider};
pub use time::{TimeError, TimeProvider, TokioTimeProvider};
