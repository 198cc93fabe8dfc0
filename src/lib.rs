//! # mlviz
//!
//! Animated, host-agnostic models behind a small machine-learning teaching suite:
//! gradient-descent regression charts, a scripted neural-network forward/backward pass,
//! and a transformer walkthrough.
//!
//! Nothing here touches a browser. Views produce declarative [`draw::Scene`]s and are
//! driven by a [`clock::Scheduler`]; the `mlviz_web` crate supplies a canvas and
//! `window` timers, while tests and the headless runner use [`clock::VirtualClock`].
//!
//! ## Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use mlviz::prelude::*;
//!
//! let clock = Rc::new(VirtualClock::new());
//! let cfg = VizConfig::default();
//! let view = RegressionView::linear(&cfg.linear).unwrap();
//!
//! let mut chart = AnimationDriver::mount(clock.clone(), cfg.tick_period_ms, view, |_: &Scene| {})
//!     .unwrap();
//! clock.advance(900);
//! assert_eq!(chart.view().ticks(), 3);
//!
//! chart.unmount();
//! clock.advance(900);
//! assert_eq!(chart.view().ticks(), 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialize config, datasets and scenes
//! - `native`: The `mlviz` headless preview binary (tokio + tracing-subscriber)
//!
//! ## Modules
//!
//! - [`update`]: Linear and logistic update rules
//! - [`regression`]: Regression chart views
//! - [`network`]: Neural-network layout, emphasis state machine and animator
//! - [`driver`] / [`sequencer`]: Periodic and scripted animation on a [`clock::Scheduler`]

#[path = "core/clock.rs"]
pub mod clock;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/dataset.rs"]
pub mod dataset;

#[path = "core/draw.rs"]
pub mod draw;

#[path = "core/driver.rs"]
pub mod driver;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/handle.rs"]
pub mod handle;

#[path = "core/lessons.rs"]
pub mod lessons;

#[path = "core/network.rs"]
pub mod network;

#[path = "core/params.rs"]
pub mod params;

#[path = "core/regression.rs"]
pub mod regression;

#[path = "core/render.rs"]
pub mod render;

#[path = "core/routes.rs"]
pub mod routes;

#[path = "core/scale.rs"]
pub mod scale;

#[path = "core/sequencer.rs"]
pub mod sequencer;

#[path = "core/update.rs"]
pub mod update;

#[path = "core/walkthrough.rs"]
pub mod walkthrough;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::clock::{Scheduler, TimerId, VirtualClock};
    pub use crate::config::{DivergencePolicy, RegressionConfig, SequenceTiming, VizConfig};
    pub use crate::dataset::{DataPoint, Dataset};
    pub use crate::draw::{Color, DrawCommand, Scene, Shape, Style};
    pub use crate::driver::{Animated, AnimationDriver, RenderSink};
    pub use crate::error::{Result, VizError};
    pub use crate::handle::{AnimationHandle, LiveFlag};
    pub use crate::network::{NetworkAnimator, NetworkLayout, NeuralNetworkView, Pass, ViewState};
    pub use crate::params::Parameters;
    pub use crate::regression::RegressionView;
    pub use crate::render::PlotSpec;
    pub use crate::routes::Route;
    pub use crate::sequencer::Script;
    pub use crate::update::{sigmoid, LinearSgd, LogisticSgd, UpdateRule};
    pub use crate::walkthrough::{Track, Walkthrough};
}
