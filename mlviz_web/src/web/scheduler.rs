use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use mlviz::clock::{Scheduler, TimerId};
use mlviz::error::{Result, VizError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

struct Slot {
    handle: i32,
    repeating: bool,
    closure: Closure<dyn FnMut()>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    slots: HashMap<TimerId, Slot>,
    // Closures whose timers are done. A closure may still be on the JS stack when its
    // timer is cleared, so it is only freed from a later task (see `schedule_sweep`).
    retired: Vec<Closure<dyn FnMut()>>,
    sweep_pending: bool,
}

/// [`Scheduler`] over `window.setInterval` / `window.setTimeout`.
///
/// Owns the wasm closures it hands to JS and frees them once their timer can no longer
/// fire. Dropping the scheduler clears every timer still registered.
pub(super) struct BrowserScheduler {
    window: web_sys::Window,
    registry: Rc<RefCell<Registry>>,
}

impl BrowserScheduler {
    pub(super) fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(VizError::Scheduler("no window".to_string()))?;
        Ok(Self {
            window,
            registry: Rc::new(RefCell::new(Registry::default())),
        })
    }

    fn next_id(&self) -> TimerId {
        let mut r = self.registry.borrow_mut();
        let id = TimerId(r.next_id);
        r.next_id += 1;
        id
    }
}

fn retire(registry: &Rc<RefCell<Registry>>, window: &web_sys::Window, id: TimerId) {
    let needs_sweep = {
        let mut r = registry.borrow_mut();
        if let Some(slot) = r.slots.remove(&id) {
            r.retired.push(slot.closure);
        }
        let needs = !r.sweep_pending && !r.retired.is_empty();
        if needs {
            r.sweep_pending = true;
        }
        needs
    };
    if needs_sweep {
        schedule_sweep(Rc::downgrade(registry), window);
    }
}

fn schedule_sweep(registry: Weak<RefCell<Registry>>, window: &web_sys::Window) {
    let weak = registry.clone();
    let sweep = Closure::once_into_js(move || {
        if let Some(reg) = weak.upgrade() {
            let dead = {
                let mut r = reg.borrow_mut();
                r.sweep_pending = false;
                std::mem::take(&mut r.retired)
            };
            // Dropped outside the borrow: a closure may own the last handle to its scheduler.
            drop(dead);
        }
    });
    let scheduled = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(sweep.unchecked_ref(), 0)
        .is_ok();
    if !scheduled {
        // Leave them for the next retire to pick up.
        if let Some(reg) = registry.upgrade() {
            reg.borrow_mut().sweep_pending = false;
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> Result<TimerId> {
        if period_ms == 0 {
            return Err(VizError::Scheduler("interval period must be > 0".to_string()));
        }
        let id = self.next_id();
        let closure = Closure::wrap(callback);
        let handle = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .map_err(|_| VizError::Scheduler("setInterval threw".to_string()))?;
        self.registry.borrow_mut().slots.insert(
            id,
            Slot {
                handle,
                repeating: true,
                closure,
            },
        );
        Ok(id)
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<TimerId> {
        let id = self.next_id();
        let weak = Rc::downgrade(&self.registry);
        let window = self.window.clone();
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(cb) = callback.take() {
                cb();
            }
            if let Some(reg) = weak.upgrade() {
                retire(&reg, &window, id);
            }
        }) as Box<dyn FnMut()>);
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            )
            .map_err(|_| VizError::Scheduler("setTimeout threw".to_string()))?;
        self.registry.borrow_mut().slots.insert(
            id,
            Slot {
                handle,
                repeating: false,
                closure,
            },
        );
        Ok(id)
    }

    fn clear(&self, id: TimerId) {
        let slot = self.registry.borrow().slots.get(&id).map(|s| (s.handle, s.repeating));
        if let Some((handle, repeating)) = slot {
            if repeating {
                self.window.clear_interval_with_handle(handle);
            } else {
                self.window.clear_timeout_with_handle(handle);
            }
            retire(&self.registry, &self.window, id);
        }
    }
}

impl Drop for BrowserScheduler {
    fn drop(&mut self) {
        if let Ok(r) = self.registry.try_borrow() {
            for slot in r.slots.values() {
                if slot.repeating {
                    self.window.clear_interval_with_handle(slot.handle);
                } else {
                    self.window.clear_timeout_with_handle(slot.handle);
                }
            }
        }
    }
}
