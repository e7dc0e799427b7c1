use crate::callbacks::{Callback, Callbacks, TimerEvent};
use crate::config::TimerConfig;
use crate::error::TimerError;
use crate::progress::{Phase, Progress, Step};

/// Timer driven by frame deltas that runs an optional delay, a duration and
/// any number of repeats separated by a repeat delay.
///
/// Hooks fire from inside [`PhaseTimer::update`] in this order: start, update,
/// one repeat per crossed cycle, complete. The state for the whole step is stored
/// before the first hook runs, so a hook that panics leaves the timer already
/// advanced past the point that fired it.
#[derive(Debug)]
pub struct PhaseTimer {
    /// Timing parameters, read again on each update so they can be changed at any time
    pub config: TimerConfig,

    progress: Progress,
    elapsed_total: f32,
    started: bool,
    complete: bool,
    last_step: Step,
    // bumped on restart so hooks fired by a step can cancel the rest of it
    epoch: u32,
    callbacks: Callbacks,
}

impl PhaseTimer {
    pub fn new(config: TimerConfig) -> Result<Self, TimerError> {
        config.validate()?;
        Ok(Self {
            config,
            progress: Progress::default(),
            elapsed_total: 0.0,
            started: false,
            complete: false,
            last_step: Step::default(),
            epoch: 0,
            callbacks: Callbacks::default(),
        })
    }

    /// Called once, when the first cycle receives time
    #[inline]
    pub fn on_start<F: FnMut(&mut PhaseTimer) + 'static>(mut self, cb: F) -> Self {
        self.callbacks.set(TimerEvent::Start, Callback::new(cb));
        self
    }

    /// Called on each update that advanced the active duration
    #[inline]
    pub fn on_update<F: FnMut(&mut PhaseTimer) + 'static>(mut self, cb: F) -> Self {
        self.callbacks.set(TimerEvent::Update, Callback::new(cb));
        self
    }

    /// Called once for every cycle that finished and has another one after it
    #[inline]
    pub fn on_repeat<F: FnMut(&mut PhaseTimer) + 'static>(mut self, cb: F) -> Self {
        self.callbacks.set(TimerEvent::Repeat, Callback::new(cb));
        self
    }

    /// Called once, when the last cycle finishes
    #[inline]
    pub fn on_complete<F: FnMut(&mut PhaseTimer) + 'static>(mut self, cb: F) -> Self {
        self.callbacks.set(TimerEvent::Complete, Callback::new(cb));
        self
    }

    /// Replaces the hook for `evt`, returning the previous one
    pub fn set_callback(&mut self, evt: TimerEvent, cb: Callback) -> Option<Callback> {
        self.callbacks.set(evt, cb)
    }

    pub fn clear_callback(&mut self, evt: TimerEvent) -> Option<Callback> {
        self.callbacks.clear(evt)
    }

    /// Advances the timer by `delta` and fires the hooks for what happened
    pub fn update(&mut self, delta: f32) -> Result<&mut Self, TimerError> {
        if self.complete {
            return Ok(self);
        }

        if let Err(e) = check_delta(delta) {
            log::warn!("Timer update rejected: {e}");
            return Err(e);
        }

        if let Err(e) = self.config.validate() {
            log::warn!("Timer update rejected: {e}");
            return Err(e);
        }

        let step = self.progress.advance(&self.config, delta);
        self.progress = step.progress;
        self.elapsed_total += step.consumed.total();
        self.last_step = step;

        let epoch = self.epoch;
        let touched = step.consumed.duration > 0.0;

        if !self.started && (touched || step.repeats > 0 || step.finished) {
            self.started = true;
            log::trace!("Timer started after a delay of {}", self.config.delay);
            if !self.emit(TimerEvent::Start, epoch) {
                return Ok(self);
            }
        }

        if touched && !self.emit(TimerEvent::Update, epoch) {
            return Ok(self);
        }

        if step.repeats > 0 {
            log::trace!(
                "Timer repeated {} time(s), {} so far",
                step.repeats,
                self.progress.repeat_count
            );
        }

        for _ in 0..step.repeats {
            if !self.emit(TimerEvent::Repeat, epoch) {
                return Ok(self);
            }
        }

        if step.finished {
            self.complete = true;
            log::trace!("Timer completed after {}", self.elapsed_total);
            self.emit(TimerEvent::Complete, epoch);
        }

        Ok(self)
    }

    /// Returns false if the hook restarted the timer
    fn emit(&mut self, evt: TimerEvent, epoch: u32) -> bool {
        if let Some(mut cb) = self.callbacks.slot(evt).take() {
            cb.call(self);

            // keep the hook unless it installed a new one while running
            let slot = self.callbacks.slot(evt);
            if slot.is_none() {
                *slot = Some(cb);
            }
        }

        self.epoch == epoch
    }

    /// Resets the cycles and repeats. The elapsed delay is kept unless `include_delay` is set.
    pub fn restart(&mut self, include_delay: bool) -> &mut Self {
        let elapsed_delay = if include_delay {
            0.0
        } else {
            self.progress.elapsed_delay
        };

        self.progress = Progress {
            elapsed_delay,
            ..Default::default()
        };
        self.elapsed_total = elapsed_delay;
        self.started = false;
        self.complete = false;
        self.last_step = Step::default();
        self.epoch = self.epoch.wrapping_add(1);
        self
    }

    /// Runs the timer to completion right away. Infinite timers are left untouched.
    pub fn end(&mut self) -> Result<&mut Self, TimerError> {
        if self.config.repeat.is_infinite() {
            return Ok(self);
        }

        self.update(f32::MAX)
    }

    /// Delay, duration and every repeat with its delay
    #[inline]
    pub fn total_duration(&self) -> f32 {
        self.config.total_duration()
    }

    /// Time consumed since the start, delays included
    #[inline]
    pub fn elapsed_total(&self) -> f32 {
        self.elapsed_total
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        (self.total_duration() - self.elapsed_total).max(0.0)
    }

    /// Progress of the current cycle in the `0.0..=1.0` range
    pub fn progress(&self) -> f32 {
        if self.config.duration <= 0.0 {
            return if self.complete { 1.0 } else { 0.0 };
        }

        (self.progress.elapsed_duration / self.config.duration).clamp(0.0, 1.0)
    }

    pub fn phase(&self) -> Phase {
        if self.complete {
            Phase::Complete
        } else {
            self.progress.phase(&self.config)
        }
    }

    #[inline]
    pub fn elapsed_delay(&self) -> f32 {
        self.progress.elapsed_delay
    }

    #[inline]
    pub fn elapsed_duration(&self) -> f32 {
        self.progress.elapsed_duration
    }

    #[inline]
    pub fn elapsed_repeat_delay(&self) -> f32 {
        self.progress.elapsed_repeat_delay
    }

    #[inline]
    pub fn repeat_count(&self) -> u32 {
        self.progress.repeat_count
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// What the last update did, useful to inspect how the delta was spent
    #[inline]
    pub fn last_step(&self) -> &Step {
        &self.last_step
    }
}

#[inline]
pub(crate) fn check_delta(delta: f32) -> Result<(), TimerError> {
    // NaN fails the comparison too
    if !(delta >= 0.0) {
        return Err(TimerError::NegativeDelta(delta));
    }

    if delta.is_infinite() {
        return Err(TimerError::NonFiniteDelta(delta));
    }

    Ok(())
}
