//! mlviz headless preview.
//!
//! Mounts every animated page against a [`VirtualClock`] that follows wall time, logs
//! what would be drawn, then tears everything down and checks that nothing fires afterwards.
//! Takes no arguments and reads no environment.

use std::rc::Rc;
use std::time::Duration;

use mlviz::clock::VirtualClock;
use mlviz::config::VizConfig;
use mlviz::draw::{Scene, Shape};
use mlviz::driver::AnimationDriver;
use mlviz::network::{NetworkAnimator, NeuralNetworkView, Pass, ViewState};
use mlviz::regression::RegressionView;
use tokio::time::{self, Instant};
use tracing::{debug, info, Level};

const FRAME_MS: u64 = 16;
const CHART_PREVIEW_MS: u64 = 3_000;

// ═══════════════════════════════════════════════════════════════════════════
// Clock pump
// ═══════════════════════════════════════════════════════════════════════════

/// Advance `clock` in step with wall time for `ms` milliseconds.
async fn run_for(clock: &VirtualClock, ms: u64) {
    let base = clock.now_ms();
    let start = Instant::now();
    let mut frame = time::interval(Duration::from_millis(FRAME_MS));
    loop {
        frame.tick().await;
        let elapsed = (start.elapsed().as_millis() as u64).min(ms);
        let behind = (base + elapsed).saturating_sub(clock.now_ms());
        clock.advance(behind);
        if elapsed >= ms {
            break;
        }
    }
}

fn log_frame(page: &'static str) -> impl FnMut(&Scene) {
    move |scene: &Scene| {
        let fit = match scene.get("fit").map(|c| &c.shape) {
            Some(Shape::Line { y1, y2, .. }) => Some((*y1, *y2)),
            _ => None,
        };
        debug!(
            page,
            shapes = scene.commands.len(),
            transition_ms = scene.max_transition_ms(),
            ?fit,
            "frame"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let cfg = VizConfig::default();
    cfg.validate()?;
    let clock = Rc::new(VirtualClock::new());

    // Regression charts run side by side, each on its own handle.
    let mut linear = AnimationDriver::mount(
        clock.clone(),
        cfg.tick_period_ms,
        RegressionView::linear(&cfg.linear)?,
        log_frame("linear"),
    )?;
    let mut logistic = AnimationDriver::mount(
        clock.clone(),
        cfg.tick_period_ms,
        RegressionView::logistic(&cfg.logistic)?,
        log_frame("logistic"),
    )?;

    run_for(&clock, CHART_PREVIEW_MS).await;

    let (lin_ticks, log_ticks) = (linear.view().ticks(), logistic.view().ticks());
    info!(
        ticks = lin_ticks,
        weight = linear.view().params().weight,
        bias = linear.view().params().bias,
        "linear regression"
    );
    info!(
        ticks = log_ticks,
        weight = logistic.view().params().weight,
        bias = logistic.view().params().bias,
        "logistic regression"
    );

    linear.unmount();
    logistic.unmount();
    run_for(&clock, u64::from(cfg.tick_period_ms) * 3).await;
    if linear.view().ticks() != lin_ticks || logistic.view().ticks() != log_ticks {
        return Err("regression view ticked after unmount".into());
    }

    // Neural network: forward then backward, each to completion.
    let view = NeuralNetworkView::energy_prediction(cfg.sequence)?;
    let forward_ms = u64::from(view.forward_script().duration_ms());
    let backward_ms = u64::from(view.backward_script().duration_ms());
    let mut network = NetworkAnimator::mount(clock.clone(), view, log_frame("network"));

    for (pass, ms) in [(Pass::Forward, forward_ms), (Pass::Backward, backward_ms)] {
        network.trigger(pass)?;
        run_for(&clock, ms + FRAME_MS).await;
        if network.state() != ViewState::Idle {
            return Err(format!("{pass:?} pass did not return to idle").into());
        }
        info!(?pass, rest = network.view().emphasis().is_rest(), "pass complete");
    }
    network.unmount();

    let fired = clock.fired();
    run_for(&clock, 500).await;
    info!(
        callbacks = fired,
        pending = clock.pending(),
        "preview finished"
    );
    Ok(())
}
