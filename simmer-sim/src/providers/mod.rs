//! Provider implementations for simulation.
//!
//! This module provides deterministic implementations of the provider traits
//! defined in simmer-core.

mod random;
mod scripted;
mod sim_providers;
mod time;

pub use random::SimRandomProvider;
pub use scripted::ScriptedRandomProvider;
pub use sim_providers::SimProviders;
pub use time::SimTimeProvider;
