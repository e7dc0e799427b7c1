use thiserror::Error;

/// Errors raised while configuring or advancing a timer
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimerError {
    #[error("timer {field} must be a non-negative number, got {value}")]
    NegativeDuration { field: &'static str, value: f32 },

    #[error("invalid repeat value {0}, expected -1 (infinite) or a non-negative count")]
    InvalidRepeat(i64),

    #[error("delta time must be a non-negative number, got {0}")]
    NegativeDelta(f32),

    #[error("delta time must be finite, got {0}")]
    NonFiniteDelta(f32),

    #[error("an infinite timer needs a cycle longer than zero (duration + repeat delay)")]
    ZeroLengthCycle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = TimerError::NegativeDuration {
            field: "delay",
            value: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "timer delay must be a non-negative number, got -5"
        );
        assert!(TimerError::InvalidRepeat(-3).to_string().contains("-3"));
        assert_eq!(
            TimerError::NonFiniteDelta(f32::INFINITY).to_string(),
            "delta time must be finite, got inf"
        );
    }
}
