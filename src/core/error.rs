use thiserror::Error;

use crate::network::ViewState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VizError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    /// A scripted sequence is still playing; entry actions are disabled until it returns to idle.
    #[error("animation already in flight ({state:?})")]
    AnimationInFlight { state: ViewState },

    /// The host refused to schedule a timer (no window, closed document, ...).
    #[error("scheduler: {0}")]
    Scheduler(String),

    /// The view was torn down; it accepts no further actions.
    #[error("view is unmounted")]
    Unmounted,

    #[error("unknown route: {0}")]
    UnknownRoute(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
