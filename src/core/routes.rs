use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};

/// Every page of the suite, one per URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Route {
    #[default]
    Home,
    LinearRegression,
    LogisticRegression,
    NeuralNetworks,
    ApplesOranges,
    Neurons,
    Transformers,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::LinearRegression,
        Route::LogisticRegression,
        Route::NeuralNetworks,
        Route::ApplesOranges,
        Route::Neurons,
        Route::Transformers,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::LinearRegression => "/linear-regression",
            Route::LogisticRegression => "/logistic-regression",
            Route::NeuralNetworks => "/neural-networks",
            Route::ApplesOranges => "/neural-networks/apples-oranges",
            Route::Neurons => "/neural-networks/neurons",
            Route::Transformers => "/neural-networks/transformers",
        }
    }

    /// Resolve a location path. A trailing slash, query string or fragment is ignored.
    pub fn from_path(path: &str) -> Result<Route> {
        let bare = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = bare.trim_end_matches('/');
        let wanted = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == wanted)
            .ok_or_else(|| VizError::UnknownRoute(path.to_string()))
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::LinearRegression => "Linear Regression",
            Route::LogisticRegression => "Logistic Regression",
            Route::NeuralNetworks => "Neural Networks",
            Route::ApplesOranges => "Apples vs Oranges - Pattern Recognition",
            Route::Neurons => "Neural Networks - How it works",
            Route::Transformers => "Transformers",
        }
    }

    /// Top navigation bar entries.
    pub fn nav_items() -> [Route; 4] {
        [
            Route::Home,
            Route::LinearRegression,
            Route::LogisticRegression,
            Route::NeuralNetworks,
        ]
    }

    /// Sub-pages listed on the neural-networks index.
    pub fn children(self) -> &'static [Route] {
        match self {
            Route::NeuralNetworks => &[Route::Neurons, Route::ApplesOranges, Route::Transformers],
            _ => &[],
        }
    }

    /// Top-level section this page belongs to, for highlighting the nav bar.
    pub fn section(self) -> Route {
        match self {
            Route::ApplesOranges | Route::Neurons | Route::Transformers => Route::NeuralNetworks,
            other => other,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
