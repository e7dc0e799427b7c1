//! Timers advanced by frame deltas.
//!
//! A [`PhaseTimer`] runs an optional delay, then its duration, then any number of
//! repeats separated by a repeat delay, firing hooks as it crosses each phase.
//! A single update spanning many cycles is resolved at once and produces the same
//! state and the same hook counts as many small updates would.
//!
//! [`TimerRegistry`] keeps a set of timers and updates them together.

pub mod callbacks;
pub mod config;
pub mod error;
pub mod prelude;
pub mod progress;
pub mod registry;
pub mod repeat;
pub mod timer;

pub use config::TimerConfig;
pub use error::TimerError;
pub use registry::{TimerId, TimerRegistry};
pub use repeat::{INFINITE, Repeat};
pub use timer::PhaseTimer;

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
