use crate::error::TimerError;
use crate::repeat::Repeat;

/// Timing parameters of a [`PhaseTimer`](crate::timer::PhaseTimer)
///
/// Times are expressed in whatever unit the caller feeds to `update`
/// (usually milliseconds or seconds of frame delta).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimerConfig {
    /// Length of the active phase of every cycle
    pub duration: f32,
    /// Time to wait before the first cycle
    pub delay: f32,
    /// Extra cycles after the first one
    #[cfg_attr(feature = "serde", serde(with = "legacy_repeat"))]
    pub repeat: Repeat,
    /// Pause between the end of a cycle and the start of the next one
    pub repeat_delay: f32,
    /// Hint for [`TimerRegistry`](crate::registry::TimerRegistry) to drop the timer once complete
    pub destroy_on_complete: bool,
}

impl TimerConfig {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    /// Sets the time to wait before the first cycle
    #[inline]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the number of repeats
    #[inline]
    pub fn with_repeat(mut self, times: u32) -> Self {
        self.repeat = Repeat::from(times);
        self
    }

    /// Sets the repeat mode directly
    #[inline]
    pub fn with_repeat_mode(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Makes the timer repeat forever
    #[inline]
    pub fn with_infinite(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }

    /// Sets the pause between cycles
    #[inline]
    pub fn with_repeat_delay(mut self, repeat_delay: f32) -> Self {
        self.repeat_delay = repeat_delay;
        self
    }

    #[inline]
    pub fn with_destroy_on_complete(mut self, destroy: bool) -> Self {
        self.destroy_on_complete = destroy;
        self
    }

    /// Length of one repeat: the pause plus the active phase
    #[inline]
    pub fn cycle(&self) -> f32 {
        self.repeat_delay + self.duration
    }

    /// Full span from the first update to natural completion
    pub fn total_duration(&self) -> f32 {
        match self.repeat.limit() {
            Some(times) => self.delay + self.duration + times as f32 * self.cycle(),
            None => f32::INFINITY,
        }
    }

    pub fn validate(&self) -> Result<(), TimerError> {
        check_time("duration", self.duration)?;
        check_time("delay", self.delay)?;
        check_time("repeat_delay", self.repeat_delay)?;

        if self.repeat.is_infinite() && self.cycle() <= 0.0 {
            return Err(TimerError::ZeroLengthCycle);
        }

        Ok(())
    }
}

#[inline]
fn check_time(field: &'static str, value: f32) -> Result<(), TimerError> {
    // NaN fails the comparison too
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TimerError::NegativeDuration { field, value })
    }
}

#[cfg(feature = "serde")]
mod legacy_repeat {
    use crate::repeat::Repeat;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(repeat: &Repeat, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*repeat))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Repeat, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Repeat::try_from(value).map_err(serde::de::Error::custom)
    }
}
