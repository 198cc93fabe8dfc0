use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};

use mlviz::clock::Scheduler;
use mlviz::draw::{DrawCommand, Scene, Shape, TextAnchor};
use mlviz::driver::RenderSink;
use mlviz::handle::LiveFlag;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_time::Instant;

use crate::float_fmt::fmt_px;

const FRAME_MS: u32 = 16;
const BACKGROUND: &str = "#ffffff";

pub(super) fn context_2d(
    canvas: &web_sys::HtmlCanvasElement,
) -> Result<web_sys::CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "canvas: get_context threw".to_string())?
        .ok_or("canvas: missing 2d context".to_string())?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .map_err(|_| "canvas: context is not 2d".to_string())
}

/// Clear the canvas and draw every command of `scene` in order.
#[allow(deprecated)]
pub(super) fn paint(ctx: &web_sys::CanvasRenderingContext2d, scene: &Scene) -> Result<(), String> {
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style(&JsValue::from_str(BACKGROUND));
    ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

    for cmd in &scene.commands {
        paint_command(ctx, cmd)?;
    }
    ctx.set_global_alpha(1.0);
    Ok(())
}

#[allow(deprecated)]
fn paint_command(ctx: &web_sys::CanvasRenderingContext2d, cmd: &DrawCommand) -> Result<(), String> {
    let style = &cmd.style;
    if style.opacity <= 0.0 {
        return Ok(());
    }
    ctx.set_global_alpha(style.opacity.min(1.0));
    if let Some(fill) = style.fill {
        ctx.set_fill_style(&JsValue::from_str(fill.as_str()));
    }
    if let Some(stroke) = style.stroke {
        ctx.set_stroke_style(&JsValue::from_str(stroke.as_str()));
        ctx.set_line_width(style.stroke_width);
    }
    let dash = match style.dash {
        Some(d) => js_sys::Array::of2(&JsValue::from_f64(d), &JsValue::from_f64(d)),
        None => js_sys::Array::new(),
    };
    ctx.set_line_dash(&dash)
        .map_err(|_| "canvas: setLineDash threw".to_string())?;

    match &cmd.shape {
        Shape::Circle { cx, cy, r } => {
            ctx.begin_path();
            ctx.arc(*cx, *cy, r.max(0.0), 0.0, TAU)
                .map_err(|_| format!("canvas: arc threw for {}", cmd.key))?;
            if style.fill.is_some() {
                ctx.fill();
            }
            if style.stroke.is_some() {
                ctx.stroke();
            }
        }
        Shape::Line { x1, y1, x2, y2 } => {
            ctx.begin_path();
            ctx.move_to(*x1, *y1);
            ctx.line_to(*x2, *y2);
            ctx.stroke();
        }
        Shape::Polyline { points } => {
            let mut pts = points.iter();
            if let Some((x, y)) = pts.next() {
                ctx.begin_path();
                ctx.move_to(*x, *y);
                for (x, y) in pts {
                    ctx.line_to(*x, *y);
                }
                ctx.stroke();
            }
        }
        Shape::Text {
            x,
            y,
            text,
            anchor,
            size_px,
        } => {
            let mut font = fmt_px(*size_px);
            font.push_str(" sans-serif");
            ctx.set_font(&font);
            ctx.set_text_align(match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "center",
                TextAnchor::End => "end",
            });
            ctx.fill_text(text, *x, *y)
                .map_err(|_| format!("canvas: fillText threw for {}", cmd.key))?;
        }
    }
    Ok(())
}

/// [`RenderSink`] that paints onto a canvas, easing each shape from what is on screen
/// towards the presented scene over the command's `transition_ms`.
///
/// A new scene interrupts the running tween and starts from whatever was last painted.
pub(super) struct CanvasSink {
    ctx: web_sys::CanvasRenderingContext2d,
    scheduler: Weak<dyn Scheduler>,
    shown: Rc<RefCell<Scene>>,
    tween: LiveFlag,
    on_present: Option<Box<dyn FnMut()>>,
}

impl CanvasSink {
    pub(super) fn new(ctx: web_sys::CanvasRenderingContext2d, scheduler: &Rc<dyn Scheduler>) -> Self {
        Self {
            ctx,
            scheduler: Rc::downgrade(scheduler),
            shown: Rc::new(RefCell::new(Scene::default())),
            tween: LiveFlag::new(),
            on_present: None,
        }
    }

    /// Called after every presented scene (before its tween finishes).
    pub(super) fn with_on_present(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_present = Some(Box::new(f));
        self
    }
}

impl RenderSink for CanvasSink {
    fn present(&mut self, scene: &Scene) {
        self.tween.kill();
        let from = self.shown.borrow().clone();

        if from.commands.is_empty() || scene.max_transition_ms() == 0 {
            if let Err(e) = paint(&self.ctx, scene) {
                warn!(error = %e, "paint failed");
            }
            *self.shown.borrow_mut() = scene.clone();
        } else {
            let live = LiveFlag::new();
            self.tween = live.clone();
            let tween = Tween {
                ctx: self.ctx.clone(),
                scheduler: self.scheduler.clone(),
                shown: self.shown.clone(),
                from: Rc::new(from),
                target: Rc::new(scene.clone()),
                start: Instant::now(),
                live,
            };
            tween.frame();
        }

        if let Some(f) = self.on_present.as_mut() {
            f();
        }
    }
}

impl Drop for CanvasSink {
    fn drop(&mut self) {
        self.tween.kill();
    }
}

#[derive(Clone)]
struct Tween {
    ctx: web_sys::CanvasRenderingContext2d,
    // Weak: a pending frame must not keep the page's scheduler alive.
    scheduler: Weak<dyn Scheduler>,
    shown: Rc<RefCell<Scene>>,
    from: Rc<Scene>,
    target: Rc<Scene>,
    start: Instant,
    live: LiveFlag,
}

impl Tween {
    fn frame(self) {
        if !self.live.is_live() {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64() * 1000.0;
        let now = self.from.tween(&self.target, elapsed);
        if let Err(e) = paint(&self.ctx, &now) {
            warn!(error = %e, "paint failed");
        }
        *self.shown.borrow_mut() = now;

        if elapsed >= f64::from(self.target.max_transition_ms()) {
            return;
        }
        let Some(scheduler) = self.scheduler.upgrade() else {
            return;
        };
        if let Err(e) = scheduler.set_timeout(FRAME_MS, Box::new(move || self.frame())) {
            warn!(error = %e, "tween frame not scheduled");
        }
    }
}
