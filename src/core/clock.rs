//! Host timer abstraction.
//!
//! Everything runs on one thread: callbacks are plain `FnMut`/`FnOnce` boxes, no `Send`.
//! The browser host implements [`Scheduler`] over `window.setInterval`/`setTimeout`;
//! [`VirtualClock`] is the deterministic implementation used by tests and the headless
//! runner, where time only moves when [`VirtualClock::advance`] is called.

use std::cell::RefCell;

use crate::error::{Result, VizError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

pub trait Scheduler {
    /// Run `callback` every `period_ms` until cleared.
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> Result<TimerId>;

    /// Run `callback` once, `delay_ms` from now.
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<TimerId>;

    /// Cancel a timer. Unknown, fired or already-cleared ids are ignored.
    fn clear(&self, id: TimerId);
}

enum Task {
    Once(Box<dyn FnOnce()>),
    Repeat {
        period_ms: u32,
        callback: Box<dyn FnMut()>,
    },
}

struct Pending {
    id: TimerId,
    due_ms: u64,
    task: Task,
}

#[derive(Default)]
struct ClockState {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending>,
    // The repeating timer whose callback is executing right now (it is out of `pending`).
    running: Option<TimerId>,
    running_cleared: bool,
    fired: u64,
}

/// Manually advanced clock.
///
/// Timers fire in `(due time, registration order)`. Callbacks may schedule new timers
/// (a zero delay fires within the same `advance`) and may clear any timer, including
/// the repeating timer that is currently running.
#[derive(Default)]
pub struct VirtualClock {
    state: RefCell<ClockState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Total callbacks run since creation.
    pub fn fired(&self) -> u64 {
        self.state.borrow().fired
    }

    /// Move time forward by `ms`, running every callback that falls due. Returns how many ran.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now_ms().saturating_add(ms);
        let mut ran = 0;

        loop {
            // Pop the next due timer without holding the borrow across the callback.
            let next = {
                let mut st = self.state.borrow_mut();
                let idx = st
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due_ms <= target)
                    .min_by_key(|(_, p)| (p.due_ms, p.id))
                    .map(|(i, _)| i);
                let Some(idx) = idx else {
                    break;
                };
                let p = st.pending.swap_remove(idx);
                st.now_ms = p.due_ms;
                st.fired += 1;
                if let Task::Repeat { .. } = p.task {
                    st.running = Some(p.id);
                    st.running_cleared = false;
                }
                p
            };

            ran += 1;
            match next.task {
                Task::Once(callback) => callback(),
                Task::Repeat {
                    period_ms,
                    mut callback,
                } => {
                    callback();
                    let mut st = self.state.borrow_mut();
                    let cleared = std::mem::take(&mut st.running_cleared);
                    st.running = None;
                    if !cleared {
                        st.pending.push(Pending {
                            id: next.id,
                            due_ms: next.due_ms + period_ms as u64,
                            task: Task::Repeat {
                                period_ms,
                                callback,
                            },
                        });
                    }
                }
            }
        }

        self.state.borrow_mut().now_ms = target;
        ran
    }

    fn register(&self, delay_ms: u32, task: Task) -> TimerId {
        let mut st = self.state.borrow_mut();
        let id = TimerId(st.next_id);
        st.next_id += 1;
        let due_ms = st.now_ms + delay_ms as u64;
        st.pending.push(Pending { id, due_ms, task });
        id
    }
}

impl Scheduler for VirtualClock {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> Result<TimerId> {
        if period_ms == 0 {
            return Err(VizError::Scheduler("interval period must be > 0".to_string()));
        }
        Ok(self.register(
            period_ms,
            Task::Repeat {
                period_ms,
                callback,
            },
        ))
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<TimerId> {
        Ok(self.register(delay_ms, Task::Once(callback)))
    }

    fn clear(&self, id: TimerId) {
        let mut st = self.state.borrow_mut();
        if st.running == Some(id) {
            st.running_cleared = true;
        }
        st.pending.retain(|p| p.id != id);
    }
}
