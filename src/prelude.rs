pub use crate::callbacks::{Callback, TimerEvent};
pub use crate::config::TimerConfig;
pub use crate::error::TimerError;
pub use crate::progress::Phase;
pub use crate::registry::{RemoveHandle, TimerId, TimerRegistry};
pub use crate::repeat::{INFINITE, Repeat};
pub use crate::timer::PhaseTimer;
