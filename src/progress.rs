use crate::config::TimerConfig;

/// Phase a timer is accumulating time into
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Delay,
    Active,
    RepeatDelay,
    Complete,
}

/// Accumulated state of a timer between updates
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Progress {
    pub elapsed_delay: f32,
    pub elapsed_duration: f32,
    pub elapsed_repeat_delay: f32,
    pub repeat_count: u32,
    /// A cycle ended and the next one is waiting on its repeat delay.
    /// `elapsed_duration` stays at the full duration until the next cycle gets time.
    pub awaiting_repeat: bool,
}

/// Time spent on each phase during one step
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Consumed {
    pub delay: f32,
    pub duration: f32,
    pub repeat_delay: f32,
}

impl Consumed {
    #[inline]
    pub fn total(&self) -> f32 {
        self.delay + self.duration + self.repeat_delay
    }
}

/// Result of advancing a [`Progress`] by some delta
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Step {
    pub progress: Progress,
    pub consumed: Consumed,
    /// Cycle boundaries crossed that started a new cycle
    pub repeats: u32,
    /// The last cycle ended during this step
    pub finished: bool,
    /// Delta left over after the timer finished
    pub overflow: f32,
}

enum CycleEnd {
    Pending,
    Repeated,
    Finished,
}

impl Progress {
    /// Phase this progress is in for the given config, ignoring completion
    pub fn phase(&self, config: &TimerConfig) -> Phase {
        if self.elapsed_delay < config.delay {
            Phase::Delay
        } else if self.awaiting_repeat {
            Phase::RepeatDelay
        } else {
            Phase::Active
        }
    }

    /// Computes the state after `delta` time has passed.
    ///
    /// Delay is consumed first, then the repeat delay (if one is pending) and then
    /// the active duration. Any whole cycles fitting in the remaining time are skipped
    /// at once, so the cost doesn't depend on how many repeats `delta` spans.
    /// The config is read as it is now, so changes made by the caller between
    /// steps are picked up.
    ///
    /// Negative or NaN deltas count as zero.
    pub fn advance(&self, config: &TimerConfig, delta: f32) -> Step {
        let mut step = Step {
            progress: *self,
            ..Default::default()
        };
        // f64 keeps whole time units exact far past the f32 mantissa
        let mut time = f64::from(delta).max(0.0);

        if !step.consume_delay(config, &mut time) {
            return step;
        }

        loop {
            match step.run_cycle(config, &mut time) {
                CycleEnd::Pending => break,
                CycleEnd::Repeated => step.skip_cycles(config, &mut time),
                CycleEnd::Finished => {
                    step.finished = true;
                    step.overflow = time as f32;
                    break;
                }
            }
        }

        step
    }
}

impl Step {
    /// Returns false while the delay is still running
    fn consume_delay(&mut self, config: &TimerConfig, time: &mut f64) -> bool {
        let p = &mut self.progress;
        if p.elapsed_delay >= config.delay {
            return true;
        }

        let left = f64::from(config.delay - p.elapsed_delay);
        if *time < left {
            p.elapsed_delay += *time as f32;
            self.consumed.delay += *time as f32;
            *time = 0.0;
            return false;
        }

        p.elapsed_delay = config.delay;
        self.consumed.delay += left as f32;
        *time -= left;
        true
    }

    /// Spends time on the pending repeat delay and the active phase of one cycle
    fn run_cycle(&mut self, config: &TimerConfig, time: &mut f64) -> CycleEnd {
        // nothing left to spend, a finished cycle keeps its full duration
        if *time <= 0.0 && !(self.at_fresh_cycle() && config.duration <= 0.0) {
            return CycleEnd::Pending;
        }

        let p = &mut self.progress;
        if p.awaiting_repeat {
            let left = f64::from((config.repeat_delay - p.elapsed_repeat_delay).max(0.0));
            if *time < left {
                p.elapsed_repeat_delay += *time as f32;
                self.consumed.repeat_delay += *time as f32;
                *time = 0.0;
                return CycleEnd::Pending;
            }

            p.elapsed_repeat_delay = config.repeat_delay;
            self.consumed.repeat_delay += left as f32;
            *time -= left;

            p.awaiting_repeat = false;
            p.elapsed_duration = 0.0;
        }

        let left = f64::from((config.duration - p.elapsed_duration).max(0.0));
        if *time < left {
            p.elapsed_duration += *time as f32;
            self.consumed.duration += *time as f32;
            *time = 0.0;
            return CycleEnd::Pending;
        }

        p.elapsed_duration = config.duration;
        self.consumed.duration += left as f32;
        *time -= left;

        if !config.repeat.allows(p.repeat_count) {
            return CycleEnd::Finished;
        }

        p.repeat_count = p.repeat_count.saturating_add(1);
        p.elapsed_repeat_delay = 0.0;
        p.awaiting_repeat = true;
        self.repeats = self.repeats.saturating_add(1);
        CycleEnd::Repeated
    }

    /// Jumps over every whole cycle (repeat delay + duration) that fits in `time`.
    /// The last permitted cycle is never skipped because it completes the timer
    /// instead of repeating.
    fn skip_cycles(&mut self, config: &TimerConfig, time: &mut f64) {
        let cycle = f64::from(config.repeat_delay) + f64::from(config.duration);
        let whole = if cycle > 0.0 {
            (*time / cycle).floor()
        } else {
            // zero-length cycles are only valid with a finite repeat count
            f64::INFINITY
        };

        let p = &mut self.progress;
        let cap = config
            .repeat
            .remaining(p.repeat_count)
            .unwrap_or(u32::MAX - p.repeat_count);

        // float to int casts saturate
        let count = (whole.min(f64::from(cap)) as u32).min(cap);
        if count > 0 {
            p.repeat_count = p.repeat_count.saturating_add(count);
            p.elapsed_repeat_delay = 0.0;
            p.elapsed_duration = config.duration;
            p.awaiting_repeat = true;
            self.repeats = self.repeats.saturating_add(count);

            let skips = f64::from(count);
            self.consumed.repeat_delay += (skips * f64::from(config.repeat_delay)) as f32;
            self.consumed.duration += (skips * f64::from(config.duration)) as f32;
            *time = (*time - skips * cycle).max(0.0);
        }

        // an infinite timer with its counter pinned at u32::MAX can't count the
        // cycles left, only the position inside the current one is kept
        if config.repeat.is_infinite() && whole > f64::from(count) {
            *time = if time.is_finite() && cycle > 0.0 {
                *time % cycle
            } else {
                0.0
            };
        }
    }

    /// The active phase hasn't received any time yet
    #[inline]
    fn at_fresh_cycle(&self) -> bool {
        !self.progress.awaiting_repeat && self.progress.elapsed_duration <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(config: &TimerConfig, progress: &Progress, delta: f32) -> Step {
        progress.advance(config, delta)
    }

    #[test]
    fn test_delay_only() {
        let config = TimerConfig::new(1000.0).with_delay(500.0);
        let s = step(&config, &Progress::default(), 16.0);
        assert_eq!(s.progress.elapsed_delay, 16.0);
        assert_eq!(s.progress.elapsed_duration, 0.0);
        assert_eq!(s.consumed.delay, 16.0);
        assert_eq!(s.progress.phase(&config), Phase::Delay);
    }

    #[test]
    fn test_delay_carries_into_duration() {
        let config = TimerConfig::new(1000.0).with_delay(500.0);
        let s = step(&config, &Progress::default(), 516.0);
        assert_eq!(s.progress.elapsed_delay, 500.0);
        assert_eq!(s.progress.elapsed_duration, 16.0);
        assert_eq!(s.consumed.delay, 500.0);
        assert_eq!(s.consumed.duration, 16.0);
        assert_eq!(s.progress.phase(&config), Phase::Active);
    }

    #[test]
    fn test_delay_landing_exactly() {
        let config = TimerConfig::new(1000.0).with_delay(500.0);
        let s = step(&config, &Progress::default(), 500.0);
        assert_eq!(s.progress.elapsed_delay, 500.0);
        assert_eq!(s.consumed.duration, 0.0);
        assert_eq!(s.progress.phase(&config), Phase::Active);
    }

    #[test]
    fn test_finish_without_repeat() {
        let config = TimerConfig::new(1000.0);
        let s = step(&config, &Progress::default(), 1200.0);
        assert!(s.finished);
        assert_eq!(s.repeats, 0);
        assert_eq!(s.progress.elapsed_duration, 1000.0);
        assert_eq!(s.overflow, 200.0);
    }

    #[test]
    fn test_large_jump_over_two_repeats() {
        let config = TimerConfig::new(1000.0)
            .with_delay(500.0)
            .with_repeat(2)
            .with_repeat_delay(500.0);
        let s = step(&config, &Progress::default(), 3516.0);
        assert!(!s.finished);
        assert_eq!(s.repeats, 2);
        assert_eq!(s.progress.repeat_count, 2);
        assert_eq!(s.progress.elapsed_repeat_delay, 500.0);
        assert_eq!(s.progress.elapsed_duration, 16.0);
        assert_eq!(s.consumed.total(), 3516.0);
    }

    #[test]
    fn test_repeat_ceiling() {
        let config = TimerConfig::new(1000.0)
            .with_delay(500.0)
            .with_repeat(2)
            .with_repeat_delay(500.0);
        let s = step(&config, &Progress::default(), 10_000.0);
        assert!(s.finished);
        assert_eq!(s.repeats, 2);
        assert_eq!(s.progress.repeat_count, 2);
        assert_eq!(s.progress.elapsed_duration, 1000.0);
        assert_eq!(s.consumed.total(), config.total_duration());
        assert_eq!(s.overflow, 10_000.0 - 4500.0);
    }

    #[test]
    fn test_final_cycle_skips_trailing_repeat_delay() {
        let config = TimerConfig::new(100.0)
            .with_repeat(1)
            .with_repeat_delay(50.0);
        // first cycle + repeat delay + last cycle lands exactly on the end
        let s = step(&config, &Progress::default(), 250.0);
        assert!(s.finished);
        assert_eq!(s.repeats, 1);
        assert_eq!(s.overflow, 0.0);
        assert_eq!(s.progress.elapsed_repeat_delay, 50.0);
    }

    #[test]
    fn test_exact_crossing_holds_at_boundary() {
        let config = TimerConfig::new(1000.0)
            .with_repeat(1)
            .with_repeat_delay(500.0);
        let s = step(&config, &Progress::default(), 1000.0);
        assert_eq!(s.repeats, 1);
        assert_eq!(s.progress.elapsed_duration, 1000.0);
        assert_eq!(s.progress.elapsed_repeat_delay, 0.0);
        assert_eq!(s.progress.phase(&config), Phase::RepeatDelay);

        // resumes on the repeat delay, the finished cycle is not counted again
        let s = step(&config, &s.progress, 16.0);
        assert_eq!(s.repeats, 0);
        assert_eq!(s.consumed.repeat_delay, 16.0);
        assert_eq!(s.consumed.duration, 0.0);
        assert_eq!(s.progress.elapsed_repeat_delay, 16.0);
    }

    #[test]
    fn test_exact_crossing_without_repeat_delay() {
        let config = TimerConfig::new(1000.0).with_repeat(1);
        let s = step(&config, &Progress::default(), 1000.0);
        assert_eq!(s.repeats, 1);
        assert!(!s.finished);

        let s = step(&config, &s.progress, 16.0);
        assert_eq!(s.repeats, 0);
        assert_eq!(s.progress.elapsed_duration, 16.0);
        assert_eq!(s.consumed.duration, 16.0);
    }

    #[test]
    fn test_exact_repeat_delay_end_resumes_in_duration() {
        let config = TimerConfig::new(1000.0)
            .with_repeat(2)
            .with_repeat_delay(500.0);
        let s = step(&config, &Progress::default(), 1500.0);
        assert_eq!(s.progress.elapsed_repeat_delay, 500.0);
        assert_eq!(s.progress.phase(&config), Phase::Active);

        let s = step(&config, &s.progress, 16.0);
        assert_eq!(s.consumed.repeat_delay, 0.0);
        assert_eq!(s.progress.elapsed_duration, 16.0);
    }

    #[test]
    fn test_infinite_huge_delta_is_closed_form() {
        let config = TimerConfig::new(10.0).with_infinite();
        let s = step(&config, &Progress::default(), 1_000_005.0);
        assert!(!s.finished);
        assert_eq!(s.repeats, 100_000);
        assert_eq!(s.progress.elapsed_duration, 5.0);
    }

    #[test]
    fn test_large_delta_counts_every_cycle() {
        let config = TimerConfig::new(1.0).with_infinite();
        let s = step(&config, &Progress::default(), 1.0e9);
        assert_eq!(s.repeats, 1_000_000_000);
        assert_eq!(s.progress.repeat_count, 1_000_000_000);
        assert_eq!(s.progress.elapsed_duration, 1.0);

        let config = TimerConfig::new(1.0).with_delay(0.5).with_repeat(100_000_000);
        let s = step(&config, &Progress::default(), 1.0e8);
        assert!(!s.finished);
        assert_eq!(s.repeats, 99_999_999);
    }

    #[test]
    fn test_infinite_timer_saturates_repeat_count() {
        let config = TimerConfig::new(1.0).with_infinite();
        for delta in [5.0e9, f32::MAX, f32::INFINITY] {
            let s = step(&config, &Progress::default(), delta);
            assert!(!s.finished, "{delta}");
            assert_eq!(s.repeats, u32::MAX, "{delta}");
            assert_eq!(s.progress.repeat_count, u32::MAX, "{delta}");

            // a pinned counter keeps accepting time, only the first crossing is reported
            let s = step(&config, &s.progress, 5.0e9);
            assert_eq!(s.progress.repeat_count, u32::MAX);
            assert_eq!(s.repeats, 1);
        }
    }

    #[test]
    fn test_nan_delta_counts_as_zero() {
        let config = TimerConfig::new(10.0).with_infinite();
        let s = step(&config, &Progress::default(), f32::NAN);
        assert_eq!(s.progress, Progress::default());
        assert_eq!(s.consumed.total(), 0.0);
    }

    #[test]
    fn test_zero_duration_with_repeats() {
        let config = TimerConfig::new(0.0).with_repeat(3);
        let s = step(&config, &Progress::default(), 1.0);
        assert!(s.finished);
        assert_eq!(s.repeats, 3);
        assert_eq!(s.overflow, 1.0);
    }

    #[test]
    fn test_small_steps_match_one_big_step() {
        let config = TimerConfig::new(100.0)
            .with_delay(30.0)
            .with_repeat(4)
            .with_repeat_delay(20.0);

        for total in [0.0, 30.0, 130.0, 150.0, 250.0, 401.0, 510.0, 530.0, 900.0] {
            let big = step(&config, &Progress::default(), total);

            let mut progress = Progress::default();
            let mut repeats = 0;
            let mut finished = false;
            let mut spent = 0.0;
            while spent < total {
                let s = step(&config, &progress, 1.0);
                progress = s.progress;
                repeats += s.repeats;
                finished |= s.finished;
                spent += 1.0;
                if finished {
                    break;
                }
            }

            assert_eq!(big.repeats, repeats, "repeats after {total}");
            assert_eq!(big.finished, finished, "finished after {total}");
            assert_eq!(big.progress, progress, "progress after {total}");
        }
    }
}
