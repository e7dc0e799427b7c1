use crate::timer::PhaseTimer;
use std::fmt;

/// Lifecycle moments a timer reports
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    Start,
    Update,
    Repeat,
    Complete,
}

/// A hook bound to its own context.
///
/// The timer that fires it is passed in as the default context. Any other state
/// the hook needs is captured by the closure itself.
pub struct Callback(Box<dyn FnMut(&mut PhaseTimer)>);

impl Callback {
    pub fn new<F>(cb: F) -> Self
    where
        F: FnMut(&mut PhaseTimer) + 'static,
    {
        Self(Box::new(cb))
    }

    #[inline]
    pub(crate) fn call(&mut self, timer: &mut PhaseTimer) {
        (self.0)(timer)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

#[derive(Default, Debug)]
pub struct Callbacks {
    start: Option<Callback>,
    update: Option<Callback>,
    repeat: Option<Callback>,
    complete: Option<Callback>,
}

impl Callbacks {
    #[inline]
    pub(crate) fn slot(&mut self, evt: TimerEvent) -> &mut Option<Callback> {
        match evt {
            TimerEvent::Start => &mut self.start,
            TimerEvent::Update => &mut self.update,
            TimerEvent::Repeat => &mut self.repeat,
            TimerEvent::Complete => &mut self.complete,
        }
    }

    pub fn set(&mut self, evt: TimerEvent, cb: Callback) -> Option<Callback> {
        self.slot(evt).replace(cb)
    }

    pub fn clear(&mut self, evt: TimerEvent) -> Option<Callback> {
        self.slot(evt).take()
    }

    pub fn is_set(&self, evt: TimerEvent) -> bool {
        match evt {
            TimerEvent::Start => self.start.is_some(),
            TimerEvent::Update => self.update.is_some(),
            TimerEvent::Repeat => self.repeat.is_some(),
            TimerEvent::Complete => self.complete.is_some(),
        }
    }
}
