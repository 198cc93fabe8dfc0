//! UI models that should be available on both wasm and native.
//!
//! Keeping these out of the wasm-only `web` module lets the navigation and button logic
//! be unit-tested on the host.

use mlviz::config::{RegressionConfig, VizConfig};
use mlviz::error::VizError;
use mlviz::network::ViewState;
use mlviz::params::Parameters;
use mlviz::routes::Route;

use crate::float_fmt::fmt_fixed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub active: bool,
}

/// Top bar entries, with the current page's section marked active.
pub fn nav_items(current: Route) -> Vec<NavItem> {
    let section = current.section();
    Route::nav_items()
        .into_iter()
        .map(|route| NavItem {
            route,
            label: route.title(),
            active: route == section,
        })
        .collect()
}

pub fn document_title(route: Route) -> String {
    match route {
        Route::Home => "mlviz".to_string(),
        other => format!("{} · mlviz", other.title()),
    }
}

/// The two gradient-descent chart pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Linear,
    Logistic,
}

impl ChartKind {
    /// Page this chart lives on.
    pub fn route(self) -> Route {
        match self {
            ChartKind::Linear => Route::LinearRegression,
            ChartKind::Logistic => Route::LogisticRegression,
        }
    }

    pub fn config(self, cfg: &VizConfig) -> RegressionConfig {
        match self {
            ChartKind::Linear => cfg.linear,
            ChartKind::Logistic => cfg.logistic,
        }
    }

    /// Canvas pixel size for this chart.
    pub fn canvas_size(self, cfg: &VizConfig) -> (u32, u32) {
        let plot = self.config(cfg).plot;
        (plot.width.round() as u32, plot.height.round() as u32)
    }

    /// Names of the two fitted parameters as the page explains them.
    pub fn param_names(self) -> (&'static str, &'static str) {
        match self {
            ChartKind::Linear => ("slope", "intercept"),
            ChartKind::Logistic => ("weight", "bias"),
        }
    }

    pub fn readout(self, params: Parameters, ticks: u64) -> String {
        let (w, b) = self.param_names();
        let digits = match self {
            ChartKind::Linear => 2,
            ChartKind::Logistic => 4,
        };
        format!(
            "tick {ticks} · {w} = {} · {b} = {}",
            fmt_fixed(params.weight, digits),
            fmt_fixed(params.bias, digits)
        )
    }
}

/// Enablement of the Forward Pass / Backpropagation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassButtons {
    pub forward: bool,
    pub backward: bool,
}

impl PassButtons {
    pub fn for_state(state: Option<ViewState>) -> Self {
        let idle = state == Some(ViewState::Idle);
        Self {
            forward: idle,
            backward: idle,
        }
    }
}

/// One-line status text for a failure surfaced by the core.
pub fn status_line(err: &VizError) -> String {
    match err {
        VizError::AnimationInFlight { state } => {
            format!("a {state} pass is still playing")
        }
        VizError::UnknownRoute(path) => format!("no page at {path}"),
        VizError::Unmounted => "this page is no longer active".to_string(),
        other => other.to_string(),
    }
}
