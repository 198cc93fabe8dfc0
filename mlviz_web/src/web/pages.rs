use std::rc::Rc;

use leptos::prelude::*;
use mlviz::clock::Scheduler;
use mlviz::config::{SequenceTiming, VizConfig};
use mlviz::driver::AnimationDriver;
use mlviz::error::VizError;
use mlviz::lessons::{comparison, intro};
use mlviz::network::{NetworkAnimator, NetworkLayout, NeuralNetworkView, Pass};
use mlviz::regression::RegressionView;
use mlviz::routes::Route;
use mlviz::update::{LinearSgd, LogisticSgd};
use mlviz::walkthrough::{Block, Track, Walkthrough};

use super::canvas::{context_2d, CanvasSink};
use super::markdown::render_markdown;
use super::scheduler::BrowserScheduler;
use super::Navigator;
use crate::ui_model::{status_line, ChartKind, PassButtons};

const CARD_STYLE: &str = "border: 1px solid #ddd; border-radius: 10px; padding: 14px 16px; background: #fafafa;";
const CANVAS_STYLE: &str = "border: 1px solid #ddd; border-radius: 6px; background: #fff; max-width: 100%;";
const ERROR_STYLE: &str = "color: #b91c1c; font-size: 13px; min-height: 1em;";

// ═══════════════════════════════════════════════════════════════════════════
// Shared pieces
// ═══════════════════════════════════════════════════════════════════════════

/// In-app link: pushes history and swaps the page without a reload.
#[component]
pub(super) fn RouteLink(
    to: Route,
    #[prop(optional)] active: bool,
    children: Children,
) -> impl IntoView {
    let nav = use_context::<Navigator>();
    let style = if active {
        "color: #111; font-weight: 700; text-decoration: none;"
    } else {
        "color: #2563eb; text-decoration: none;"
    };
    view! {
        <a
            href=to.path()
            style=style
            on:click=move |ev: web_sys::MouseEvent| {
                if let Some(nav) = nav {
                    ev.prevent_default();
                    nav.go(to);
                }
            }
        >
            {children()}
        </a>
    }
}

#[component]
fn Intro(route: Route) -> impl IntoView {
    view! { <div class="intro" inner_html=render_markdown(intro(route))></div> }
}

fn new_scheduler() -> Result<Rc<dyn Scheduler>, String> {
    let scheduler = BrowserScheduler::new().map_err(|e| status_line(&e))?;
    Ok(Rc::new(scheduler))
}

// ═══════════════════════════════════════════════════════════════════════════
// Home and section index
// ═══════════════════════════════════════════════════════════════════════════

#[component]
pub(super) fn HomePage() -> impl IntoView {
    let models = Route::nav_items()
        .into_iter()
        .filter(|r| *r != Route::Home)
        .map(|route| {
            view! {
                <div style=CARD_STYLE>
                    <RouteLink to=route>{route.title()}</RouteLink>
                </div>
            }
        })
        .collect_view();

    view! {
        <Intro route=Route::Home />
        <div style="display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 12px;">
            {models}
        </div>
    }
}

#[component]
pub(super) fn NeuralNetworksPage() -> impl IntoView {
    let links = Route::NeuralNetworks
        .children()
        .iter()
        .map(|&route| {
            view! {
                <li style="margin: 6px 0;">
                    <RouteLink to=route>{route.title()}</RouteLink>
                </li>
            }
        })
        .collect_view();

    view! {
        <Intro route=Route::NeuralNetworks />
        <ul>{links}</ul>
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Regression charts
// ═══════════════════════════════════════════════════════════════════════════

enum ChartDriver {
    Linear(AnimationDriver<RegressionView<LinearSgd>>),
    Logistic(AnimationDriver<RegressionView<LogisticSgd>>),
}

impl ChartDriver {
    fn mount(
        kind: ChartKind,
        cfg: &VizConfig,
        scheduler: Rc<dyn Scheduler>,
        sink: CanvasSink,
    ) -> mlviz::error::Result<Self> {
        let cfg_kind = kind.config(cfg);
        Ok(match kind {
            ChartKind::Linear => ChartDriver::Linear(AnimationDriver::mount(
                scheduler,
                cfg.tick_period_ms,
                RegressionView::linear(&cfg_kind)?,
                sink,
            )?),
            ChartKind::Logistic => ChartDriver::Logistic(AnimationDriver::mount(
                scheduler,
                cfg.tick_period_ms,
                RegressionView::logistic(&cfg_kind)?,
                sink,
            )?),
        })
    }

    fn readout(&self, kind: ChartKind) -> String {
        match self {
            ChartDriver::Linear(d) => {
                let v = d.view();
                kind.readout(v.params(), v.ticks())
            }
            ChartDriver::Logistic(d) => {
                let v = d.view();
                kind.readout(v.params(), v.ticks())
            }
        }
    }
}

fn mount_chart(
    kind: ChartKind,
    canvas: &web_sys::HtmlCanvasElement,
    frame: RwSignal<u64>,
) -> Result<ChartDriver, String> {
    let cfg = VizConfig::default();
    let ctx = context_2d(canvas)?;
    let scheduler = new_scheduler()?;
    let sink = CanvasSink::new(ctx, &scheduler).with_on_present(move || frame.update(|f| *f += 1));
    ChartDriver::mount(kind, &cfg, scheduler, sink).map_err(|e| status_line(&e))
}

/// A regression page: the chart starts animating as soon as the canvas is attached and
/// stops when the page is left.
#[component]
pub(super) fn ChartPage(kind: ChartKind) -> impl IntoView {
    let route = kind.route();
    let (width, height) = kind.canvas_size(&VizConfig::default());

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let driver = StoredValue::new_local(None::<ChartDriver>);
    let frame = RwSignal::new(0u64);
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        if driver.with_value(|d| d.is_some()) {
            return;
        }
        match mount_chart(kind, &canvas, frame) {
            Ok(d) => {
                driver.set_value(Some(d));
                frame.update(|f| *f += 1);
            }
            Err(e) => error.set(Some(e)),
        }
    });

    on_cleanup(move || {
        drop(driver.try_update_value(Option::take));
    });

    let readout = move || {
        frame.get();
        driver
            .with_value(|d| d.as_ref().map(|d| d.readout(kind)))
            .unwrap_or_default()
    };

    view! {
        <Intro route=route />
        <canvas node_ref=canvas_ref width=width height=height style=CANVAS_STYLE></canvas>
        <p style="font-variant-numeric: tabular-nums; color: #333;">{readout}</p>
        <p style=ERROR_STYLE>{move || error.get().unwrap_or_default()}</p>
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Neural network forward/backward
// ═══════════════════════════════════════════════════════════════════════════

fn mount_network(
    canvas: &web_sys::HtmlCanvasElement,
    timing: SequenceTiming,
    frame: RwSignal<u64>,
) -> Result<NetworkAnimator, String> {
    let ctx = context_2d(canvas)?;
    let scheduler = new_scheduler()?;
    let view = NeuralNetworkView::energy_prediction(timing).map_err(|e| status_line(&e))?;
    let sink = CanvasSink::new(ctx, &scheduler).with_on_present(move || frame.update(|f| *f += 1));
    Ok(NetworkAnimator::mount(scheduler, view, sink))
}

#[component]
pub(super) fn NeuronsPage() -> impl IntoView {
    let timing = VizConfig::default().sequence;
    let layout = NetworkLayout::energy_prediction();
    let (width, height) = (layout.width.round() as u32, layout.height.round() as u32);

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let animator = StoredValue::new_local(None::<NetworkAnimator>);
    let frame = RwSignal::new(0u64);
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        if animator.with_value(|a| a.is_some()) {
            return;
        }
        match mount_network(&canvas, timing, frame) {
            Ok(a) => {
                animator.set_value(Some(a));
                frame.update(|f| *f += 1);
            }
            Err(e) => error.set(Some(e)),
        }
    });

    on_cleanup(move || {
        drop(animator.try_update_value(Option::take));
    });

    let state = move || {
        frame.get();
        animator.with_value(|a| a.as_ref().map(|a| a.state()))
    };
    let buttons = move || PassButtons::for_state(state());

    let run = move |pass: Pass| {
        let result = animator.try_update_value(|a| match a {
            Some(a) => a.trigger(pass),
            None => Err(VizError::Unmounted),
        });
        match result {
            Some(Err(e)) => error.set(Some(status_line(&e))),
            _ => error.set(None),
        }
        frame.update(|f| *f += 1);
    };

    view! {
        <Intro route=Route::Neurons />
        <div style="display: flex; gap: 8px; margin: 8px 0;">
            <button on:click=move |_| run(Pass::Forward) disabled=move || !buttons().forward>
                "Forward Pass"
            </button>
            <button on:click=move |_| run(Pass::Backward) disabled=move || !buttons().backward>
                "Backpropagation"
            </button>
            <span style="align-self: center; color: #555;">
                {move || state().map(|s| s.to_string()).unwrap_or_default()}
            </span>
        </div>
        <canvas node_ref=canvas_ref width=width height=height style=CANVAS_STYLE></canvas>
        <p style=ERROR_STYLE>{move || error.get().unwrap_or_default()}</p>
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Static lessons
// ═══════════════════════════════════════════════════════════════════════════

#[component]
pub(super) fn ApplesOrangesPage() -> impl IntoView {
    let charts = comparison()
        .into_iter()
        .map(|pipeline| {
            let last = pipeline.steps.len().saturating_sub(1);
            let steps = pipeline
                .steps
                .iter()
                .enumerate()
                .map(|(i, step)| {
                    view! {
                        <div style="border: 1px solid #ccc; border-radius: 8px; padding: 8px 10px; text-align: center; min-width: 90px; background: #fff;">
                            <div style="font-size: 22px;">{step.icon}</div>
                            <div style="font-size: 13px; color: #333;">{step.label}</div>
                        </div>
                        {(i < last).then(|| view! { <span style="color: #888;">"→"</span> })}
                    }
                })
                .collect_view();
            view! {
                <div style=CARD_STYLE>
                    <h3 style="margin-top: 0;">{pipeline.title}</h3>
                    <div style="display: flex; align-items: center; gap: 8px; flex-wrap: wrap;">
                        {steps}
                    </div>
                </div>
            }
        })
        .collect_view();

    view! {
        <Intro route=Route::ApplesOranges />
        <div style="display: grid; gap: 12px;">{charts}</div>
    }
}

fn block_style(block: Block) -> &'static str {
    match (block.highlight, block.active) {
        (true, _) => "border: 2px solid #f59e0b; background: #fef3c7; border-radius: 8px; padding: 8px 12px; font-weight: 600;",
        (false, true) => "border: 1px solid #69b3a2; background: #ecfdf5; border-radius: 8px; padding: 8px 12px;",
        (false, false) => "border: 1px dashed #bbb; background: #fff; color: #999; border-radius: 8px; padding: 8px 12px;",
    }
}

#[component]
pub(super) fn TransformersPage() -> impl IntoView {
    let walk = RwSignal::new(Walkthrough::new());

    let tabs = Track::ALL
        .into_iter()
        .map(|track| {
            let style = move || {
                if walk.with(|w| w.track()) == track {
                    "font-weight: 700; border-bottom: 2px solid #2563eb;"
                } else {
                    "color: #555;"
                }
            };
            view! {
                <button style=style on:click=move |_| walk.update(|w| w.select(track))>
                    {track.label()}
                </button>
            }
        })
        .collect_view();

    let text = move || {
        let step = walk.with(|w| *w.current());
        view! {
            <h3>{step.title}</h3>
            <p>{step.explanation}</p>
            <pre style="background: #f5f5f5; padding: 8px; border-radius: 6px; white-space: pre-wrap;">
                {step.example}
            </pre>
        }
    };

    let diagram = move || {
        walk.with(|w| w.blocks())
            .into_iter()
            .map(|row| {
                let cells = row
                    .into_iter()
                    .map(|block| view! { <div style=block_style(block)>{block.title}</div> })
                    .collect_view();
                view! {
                    <div style="display: flex; gap: 8px; justify-content: center; margin: 6px 0;">
                        {cells}
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <Intro route=Route::Transformers />
        <div style="display: flex; gap: 8px; margin: 8px 0;">{tabs}</div>
        <div style=CARD_STYLE>{diagram}</div>
        {text}
        <div style="display: flex; gap: 8px; align-items: center;">
            <button
                disabled=move || !walk.with(|w| w.can_prev())
                on:click=move |_| {
                    walk.update(|w| {
                        w.prev();
                    })
                }
            >
                "Previous"
            </button>
            <span style="color: #555;">
                {move || walk.with(|w| format!("Step {} of {}", w.step() + 1, w.len()))}
            </span>
            <button
                disabled=move || !walk.with(|w| w.can_next())
                on:click=move |_| {
                    walk.update(|w| {
                        w.next();
                    })
                }
            >
                "Next"
            </button>
        </div>
    }
}
