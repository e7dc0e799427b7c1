use crate::error::TimerError;

/// Legacy numeric value for an infinite number of repeats
pub const INFINITE: i64 = -1;

/// How many extra cycles a timer runs after the first one
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Repeat {
    #[default]
    Never,
    Times(u32),
    Infinite,
}

impl Repeat {
    /// Number of repeats, `None` when it never ends
    #[inline]
    pub fn limit(self) -> Option<u32> {
        match self {
            Self::Never => Some(0),
            Self::Times(times) => Some(times),
            Self::Infinite => None,
        }
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Returns true if a cycle finishing after `count` repeats must start another one
    #[inline]
    pub fn allows(self, count: u32) -> bool {
        match self.limit() {
            Some(limit) => count < limit,
            None => true,
        }
    }

    /// Repeats left after `count`, `None` when unbounded
    #[inline]
    pub fn remaining(self, count: u32) -> Option<u32> {
        self.limit().map(|limit| limit.saturating_sub(count))
    }
}

impl From<u32> for Repeat {
    fn from(times: u32) -> Self {
        if times == 0 {
            Self::Never
        } else {
            Self::Times(times)
        }
    }
}

impl TryFrom<i64> for Repeat {
    type Error = TimerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            INFINITE => Ok(Self::Infinite),
            0 => Ok(Self::Never),
            v if v > 0 => u32::try_from(v)
                .map(Self::Times)
                .map_err(|_| TimerError::InvalidRepeat(v)),
            v => Err(TimerError::InvalidRepeat(v)),
        }
    }
}

impl From<Repeat> for i64 {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Never => 0,
            Repeat::Times(times) => times as i64,
            Repeat::Infinite => INFINITE,
        }
    }
}
