//! # Simmer
//!
//! Simulated slow, fallible operations composed into sequential pipelines.
//!
//! A [`SimulatedOperation`] waits a random time, then succeeds or rejects
//! according to its [`OutcomeRule`]. A [`Pipeline`] chains operations so each
//! consumes the previous one's result and the first failure ends the run.
//! Randomness and time come from a [`Providers`] bundle: production runs use
//! [`TokioProviders`], tests use [`simmer_sim::SimProviders`] on a logical
//! [`simmer_sim::SimClock`] so every run with the same seed is identical.
//!
//! ## Narratives
//!
//! - [`kitchen`]: deciding on, shopping for, and cooking dinner
//! - [`orders`]: inventory, payment and shipping for an online order
//!
//! ## Example
//!
//! ```rust
//! use simmer::{kitchen, HarnessConfig, HarnessContext};
//! use simmer_sim::{SimClock, SimProviders};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let clock = SimClock::new();
//! let ctx = HarnessContext::new(SimProviders::new(&clock, 42), HarnessConfig::default());
//!
//! let dinner = kitchen::bean_dinner_pipeline(&ctx);
//! let served = clock.run_until_complete(dinner.run(())).await;
//! assert_eq!(served, Ok("Dinner is served!".to_string()));
//! # });
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod config;
pub mod context;
pub mod files;
pub mod kitchen;
pub mod operation;
pub mod orders;
pub mod pipeline;
pub mod sink;
pub mod stage;

pub use catalog::{Catalog, CatalogEntry, CatalogError, InMemoryCatalog};
pub use config::{ConfigError, HarnessConfig};
pub use context::HarnessContext;
pub use operation::{OperationBuilder, OutcomeRule, SimulatedOperation};
pub use orders::{Order, OrderLine, PaidOrder, PricedOrder, RestockRequest, Shipment};
pub use pipeline::Pipeline;
pub use sink::{ConsoleSink, ProgressSink, RecordingSink, SharedSink, TracingSink};
pub use stage::Stage;

pub use simmer_core::{
    InternalError, LatencySpec, OperationError, OperationResult, Providers, RandomProvider,
    SimulationError, TimeError, TimeProvider, TokioProviders, TokioRandomProvider,
    TokioTimeProvider,
};
