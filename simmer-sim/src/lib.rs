//! # simmer-sim
//!
//! Deterministic providers for testing simulated operations.
//!
//! The production providers in `simmer-core` sleep for real and draw from
//! the thread RNG, which makes every run different. This crate supplies
//! drop-in replacements that make runs reproducible:
//!
//! - [`SimClock`]: logical time. Sleeps register timers that only fire when
//!   the clock is stepped, so a two second latency costs no wall time.
//! - [`SimRandomProvider`]: ChaCha8 stream seeded by the caller. Same seed,
//!   same samples.
//! - [`ScriptedRandomProvider`]: exact latencies, outcomes and indices
//!   injected by the test, falling back to a seeded stream once exhausted.
//! - [`SimProviders`]: bundle implementing [`Providers`](simmer_core::Providers).
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use simmer_core::TimeProvider;
//! use simmer_sim::{SimClock, SimProviders};
//! use simmer_core::Providers;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let clock = SimClock::new();
//! let providers = SimProviders::new(&clock, 42);
//!
//! let time = providers.time().clone();
//! clock
//!     .run_until_complete(async move { time.sleep(Duration::from_millis(1500)).await })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(clock.now(), Duration::from_millis(1500));
//! # });
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod providers;

pub use clock::{SimClock, SleepFuture, WeakSimClock};
pub use providers::{ScriptedRandomProvider, SimProviders, SimRandomProvider, SimTimeProvider};

// Re-export core so tests only need one import path
pub use simmer_core::*;
