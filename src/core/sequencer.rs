//! Timed scripts: an ordered list of `(offset, action)` cues played against a [`Scheduler`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::clock::Scheduler;
use crate::error::Result;
use crate::handle::{AnimationHandle, LiveFlag};

#[derive(Debug, Clone, PartialEq)]
pub struct Cue<A> {
    /// Offset from the start of the script.
    pub at_ms: u32,
    pub action: A,
}

/// Cues keep insertion order; cues sharing an offset run in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Script<A> {
    cues: Vec<Cue<A>>,
}

impl<A> Default for Script<A> {
    fn default() -> Self {
        Self { cues: Vec::new() }
    }
}

impl<A> Script<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, at_ms: u32, action: A) -> Self {
        self.push(at_ms, action);
        self
    }

    pub fn push(&mut self, at_ms: u32, action: A) {
        self.cues.push(Cue { at_ms, action });
    }

    pub fn cues(&self) -> &[Cue<A>] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Offset of the last cue.
    pub fn duration_ms(&self) -> u32 {
        self.cues.iter().map(|c| c.at_ms).max().unwrap_or(0)
    }

    /// Cues in firing order.
    pub fn timeline(&self) -> Vec<&Cue<A>> {
        let mut out: Vec<&Cue<A>> = self.cues.iter().collect();
        out.sort_by_key(|c| c.at_ms);
        out
    }
}

impl<A: Clone + 'static> Script<A> {
    /// Schedule every cue relative to now.
    ///
    /// Each cue becomes one timeout; `apply` runs once per cue. Cancelling or dropping the
    /// returned handle detaches every cue that has not fired yet.
    pub fn play<F>(&self, scheduler: Rc<dyn Scheduler>, apply: F) -> Result<AnimationHandle>
    where
        F: FnMut(A) + 'static,
    {
        let live = LiveFlag::new();
        let mut handle = AnimationHandle::new(scheduler.clone(), live.clone());
        let apply = Rc::new(RefCell::new(apply));

        for cue in self.timeline() {
            let (live, apply, action) = (live.clone(), apply.clone(), cue.action.clone());
            let id = scheduler.set_timeout(
                cue.at_ms,
                Box::new(move || {
                    if live.is_live() {
                        (&mut *apply.borrow_mut())(action);
                    }
                }),
            )?;
            handle.track(id);
        }
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{TimerId, VirtualClock};

    /// A host that has already queued every timeout: `clear` cannot take one back.
    #[derive(Default)]
    struct QueuedHost {
        timeouts: RefCell<Vec<Box<dyn FnOnce()>>>,
    }

    impl QueuedHost {
        fn fire_next(&self) -> bool {
            let next = {
                let mut timeouts = self.timeouts.borrow_mut();
                if timeouts.is_empty() {
                    None
                } else {
                    Some(timeouts.remove(0))
                }
            };
            match next {
                Some(callback) => {
                    callback();
                    true
                }
                None => false,
            }
        }
    }

    impl Scheduler for QueuedHost {
        fn set_interval(&self, _period_ms: u32, _callback: Box<dyn FnMut()>) -> Result<TimerId> {
            Ok(TimerId(0))
        }

        fn set_timeout(&self, _delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<TimerId> {
            let mut timeouts = self.timeouts.borrow_mut();
            timeouts.push(callback);
            Ok(TimerId(timeouts.len() as u64))
        }

        fn clear(&self, _id: TimerId) {}
    }

    fn recorder() -> (Rc<RefCell<Vec<(u64, &'static str)>>>, Rc<VirtualClock>) {
        (Rc::new(RefCell::new(Vec::new())), Rc::new(VirtualClock::new()))
    }

    #[test]
    fn cues_fire_at_offsets_in_order() {
        let (log, clock) = recorder();
        let script = Script::new()
            .at(1500, "c")
            .at(0, "a")
            .at(500, "b")
            .at(1500, "d");
        assert_eq!(script.duration_ms(), 1500);

        let (l, c) = (log.clone(), clock.clone());
        let _handle = script
            .play(clock.clone(), move |tag| l.borrow_mut().push((c.now_ms(), tag)))
            .unwrap();

        clock.advance(0);
        assert_eq!(*log.borrow(), vec![(0, "a")]);
        clock.advance(2000);
        assert_eq!(
            *log.borrow(),
            vec![(0, "a"), (500, "b"), (1500, "c"), (1500, "d")]
        );
    }

    #[test]
    fn cancel_detaches_unfired_cues() {
        let (log, clock) = recorder();
        let script = Script::new().at(100, "early").at(900, "late");

        let l = log.clone();
        let mut handle = script
            .play(clock.clone(), move |tag| l.borrow_mut().push((0, tag)))
            .unwrap();
        assert_eq!(handle.timer_count(), 2);

        clock.advance(500);
        handle.cancel();
        clock.advance(5000);
        assert_eq!(*log.borrow(), vec![(0, "early")]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn queued_cues_after_cancel_do_nothing() {
        let host = Rc::new(QueuedHost::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        let script = Script::new().at(0, "first").at(500, "second").at(900, "third");

        let l = log.clone();
        let mut handle = script
            .play(host.clone(), move |tag| l.borrow_mut().push(tag))
            .unwrap();

        assert!(host.fire_next());
        assert!(handle.cancel());
        while host.fire_next() {}
        assert_eq!(*log.borrow(), vec!["first"]);
    }

    #[test]
    fn empty_script_plays_nothing() {
        let clock = Rc::new(VirtualClock::new());
        let script: Script<u8> = Script::new();
        assert!(script.is_empty());
        let handle = script.play(clock.clone(), |_| panic!("no cues")).unwrap();
        assert_eq!(handle.timer_count(), 0);
        clock.advance(100);
    }
}
