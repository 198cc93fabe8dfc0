use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::info;

use crate::clock::Scheduler;
use crate::draw::Scene;
use crate::error::Result;
use crate::handle::{AnimationHandle, LiveFlag};

/// Where finished scenes go: a canvas painter in the browser, a logger in the headless runner.
pub trait RenderSink {
    fn present(&mut self, scene: &Scene);
}

impl<F: FnMut(&Scene)> RenderSink for F {
    fn present(&mut self, scene: &Scene) {
        self(scene)
    }
}

/// A view that advances in discrete ticks and can draw itself at any point.
pub trait Animated {
    /// Short name used in log lines.
    fn label(&self) -> &str;

    fn tick(&mut self);

    fn scene(&self) -> Scene;
}

/// A mounted periodic animation.
///
/// Mounting presents the initial scene synchronously, then ticks and presents every
/// `period_ms` until the driver is unmounted or dropped.
pub struct AnimationDriver<V: Animated> {
    view: Rc<RefCell<V>>,
    handle: AnimationHandle,
    label: String,
}

impl<V: Animated + 'static> AnimationDriver<V> {
    pub fn mount<S: RenderSink + 'static>(
        scheduler: Rc<dyn Scheduler>,
        period_ms: u32,
        view: V,
        mut sink: S,
    ) -> Result<Self> {
        let label = view.label().to_string();
        let view = Rc::new(RefCell::new(view));
        let live = LiveFlag::new();
        let mut handle = AnimationHandle::new(scheduler.clone(), live.clone());

        sink.present(&view.borrow().scene());

        let v = view.clone();
        let id = scheduler.set_interval(
            period_ms,
            Box::new(move || {
                if !live.is_live() {
                    return;
                }
                let scene = {
                    let mut view = v.borrow_mut();
                    view.tick();
                    view.scene()
                };
                sink.present(&scene);
            }),
        )?;
        handle.track(id);

        info!(view = %label, period_ms, "mounted");
        Ok(Self {
            view,
            handle,
            label,
        })
    }
}

impl<V: Animated> AnimationDriver<V> {
    pub fn view(&self) -> Ref<'_, V> {
        self.view.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_active()
    }

    /// Stop ticking. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.handle.cancel() {
            info!(view = %self.label, "unmounted");
        }
    }
}

impl<V: Animated> Drop for AnimationDriver<V> {
    fn drop(&mut self) {
        self.unmount();
    }
}
