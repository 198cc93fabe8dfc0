use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::clock::{Scheduler, TimerId};

/// Shared "is the owner still mounted" bit.
///
/// Every scheduled callback checks it before touching view state, so a callback the host
/// already queued when the view was torn down does nothing.
#[derive(Debug, Clone)]
pub struct LiveFlag(Rc<Cell<bool>>);

impl LiveFlag {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.0.get()
    }

    pub fn kill(&self) {
        self.0.set(false);
    }
}

impl Default for LiveFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned set of scheduled timers.
///
/// Released exactly once: [`AnimationHandle::cancel`] clears every timer and kills the
/// liveness flag; later calls are no-ops, and `Drop` cancels if nobody did.
pub struct AnimationHandle {
    scheduler: Rc<dyn Scheduler>,
    timers: Vec<TimerId>,
    live: LiveFlag,
    released: bool,
}

impl AnimationHandle {
    pub fn new(scheduler: Rc<dyn Scheduler>, live: LiveFlag) -> Self {
        Self {
            scheduler,
            timers: Vec::new(),
            live,
            released: false,
        }
    }

    pub fn track(&mut self, id: TimerId) {
        if self.released {
            // Late registration after teardown: clear it straight away.
            self.scheduler.clear(id);
        } else {
            self.timers.push(id);
        }
    }

    pub fn is_active(&self) -> bool {
        !self.released
    }

    pub fn live_flag(&self) -> LiveFlag {
        self.live.clone()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Clear all timers. Returns `false` if the handle was already released.
    pub fn cancel(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        self.live.kill();
        for id in self.timers.drain(..) {
            self.scheduler.clear(id);
        }
        true
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("timers", &self.timers)
            .field("live", &self.live.is_live())
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;

    fn counter_interval(clock: &Rc<VirtualClock>, handle: &mut AnimationHandle) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let (c, live) = (count.clone(), handle.live_flag());
        let id = clock
            .set_interval(
                100,
                Box::new(move || {
                    if live.is_live() {
                        c.set(c.get() + 1);
                    }
                }),
            )
            .unwrap();
        handle.track(id);
        count
    }

    #[test]
    fn cancel_is_idempotent() {
        let clock = Rc::new(VirtualClock::new());
        let mut handle = AnimationHandle::new(clock.clone(), LiveFlag::new());
        let count = counter_interval(&clock, &mut handle);

        clock.advance(250);
        assert_eq!(count.get(), 2);

        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(!handle.is_active());
        assert!(!handle.live_flag().is_live());

        clock.advance(1000);
        assert_eq!(count.get(), 2);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn drop_releases_timers() {
        let clock = Rc::new(VirtualClock::new());
        let count = {
            let mut handle = AnimationHandle::new(clock.clone(), LiveFlag::new());
            counter_interval(&clock, &mut handle)
        };
        assert_eq!(clock.pending(), 0);
        clock.advance(1000);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn tracking_after_release_clears_immediately() {
        let clock = Rc::new(VirtualClock::new());
        let mut handle = AnimationHandle::new(clock.clone(), LiveFlag::new());
        handle.cancel();
        let id = clock.set_timeout(10, Box::new(|| {})).unwrap();
        handle.track(id);
        assert_eq!(clock.pending(), 0);
        assert_eq!(handle.timer_count(), 0);
    }
}
