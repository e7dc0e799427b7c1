use crate::config::TimerConfig;
use crate::error::TimerError;
use crate::timer::{PhaseTimer, check_delta};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Identifies a timer inside a [`TimerRegistry`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Queues removals from places that can't borrow the registry, like timer hooks.
/// Queued timers are skipped by the update pass that is running and dropped at its end.
/// A timer already visited by that pass keeps the update it got.
#[derive(Clone, Default, Debug)]
pub struct RemoveHandle {
    queue: Rc<RefCell<Vec<TimerId>>>,
}

impl RemoveHandle {
    pub fn remove(&self, id: TimerId) {
        self.queue.borrow_mut().push(id);
    }

    #[inline]
    fn is_queued(&self, id: TimerId) -> bool {
        self.queue.borrow().contains(&id)
    }

    #[inline]
    fn take(&self) -> Vec<TimerId> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

/// Unordered set of timers updated together
#[derive(Default, Debug)]
pub struct TimerRegistry {
    timers: FxHashMap<TimerId, PhaseTimer>,
    next_id: u64,
    pending: RemoveHandle,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a timer and stores it
    pub fn add_timer(&mut self, config: TimerConfig) -> Result<TimerId, TimerError> {
        let timer = PhaseTimer::new(config)?;
        Ok(self.insert(timer))
    }

    /// Stores an already built timer (useful to attach hooks first)
    pub fn insert(&mut self, timer: PhaseTimer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, timer);
        log::debug!("Timer {id:?} added, {} alive", self.timers.len());
        id
    }

    /// Removes a timer, returning it if it was stored
    pub fn remove_timer(&mut self, id: TimerId) -> Option<PhaseTimer> {
        let timer = self.timers.remove(&id);
        if timer.is_some() {
            log::debug!("Timer {id:?} removed");
        }
        timer
    }

    /// Removes and returns every timer
    pub fn remove_timers(&mut self) -> Vec<PhaseTimer> {
        self.pending.take();
        self.timers.drain().map(|(_, timer)| timer).collect()
    }

    /// Drops every timer
    pub fn destroy(&mut self) {
        let _ = self.remove_timers();
    }

    /// Handle to remove timers from inside hooks
    pub fn remove_handle(&self) -> RemoveHandle {
        self.pending.clone()
    }

    /// Updates every running timer and drops the completed ones marked with
    /// `destroy_on_complete`. Completed timers are dropped on the update after
    /// the one that completed them.
    ///
    /// A timer rejecting the update doesn't stop the others, the first error is
    /// returned once all of them were visited.
    pub fn update(&mut self, delta: f32) -> Result<(), TimerError> {
        if let Err(e) = check_delta(delta) {
            log::warn!("Timers update rejected: {e}");
            return Err(e);
        }

        self.flush_removals();

        let pending = &self.pending;
        let mut first_err = None;
        self.timers.retain(|id, timer| {
            if pending.is_queued(*id) {
                return false;
            }

            if timer.is_complete() {
                if timer.config.destroy_on_complete {
                    log::debug!("Timer {id:?} completed and destroyed");
                    return false;
                }

                return true;
            }

            if let Err(e) = timer.update(delta) {
                log::error!("Timer {id:?} failed to update: {e}");
                first_err.get_or_insert(e);
            }

            true
        });

        self.flush_removals();

        first_err.map_or(Ok(()), Err)
    }

    fn flush_removals(&mut self) {
        for id in self.pending.take() {
            self.remove_timer(id);
        }
    }

    #[inline]
    pub fn get(&self, id: TimerId) -> Option<&PhaseTimer> {
        self.timers.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: TimerId) -> Option<&mut PhaseTimer> {
        self.timers.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimerId, &PhaseTimer)> {
        self.timers.iter().map(|(id, timer)| (*id, timer))
    }
}
