//! Logical clock for deterministic testing.
//!
//! ## Submodules
//!
//! - `timers` - Timer entries and the deadline-ordered queue
//! - `world` - `SimClock` and `WeakSimClock`
//! - `sleep` - Sleep future resolved by clock steps

pub mod sleep;
pub mod timers;
pub mod world;

pub use sleep::SleepFuture;
pub use timers::{ScheduledTimer, TimerQueue};
pub use world::{SimClock, WeakSimClock};
