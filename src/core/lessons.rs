//! Static page copy.
//!
//! Intros are markdown; hosts render them (the web app goes through `pulldown-cmark`).

use crate::routes::Route;

/// Markdown shown above each page's interactive part.
pub fn intro(route: Route) -> &'static str {
    match route {
        Route::Home => "## Select a Model\n\nPick a page from the navigation bar above.",
        Route::LinearRegression => {
            "### Linear Regression: Predicting Insurance Charges Based on Age & BMI\n\n\
             The red line is refit every 300 ms by one pass of gradient descent over the six \
             samples. Dashed orange lines are the **residuals**: the gap between each charge \
             and the line's prediction at that age."
        }
        Route::LogisticRegression => {
            "### Logistic Regression\n\n\
             Five pass/fail outcomes. The curve is `sigmoid(w * x + b)`, nudged towards the \
             labels on every tick until it separates the failures from the passes."
        }
        Route::NeuralNetworks => "### Neural Networks\n\nExplore how neural networks work:",
        Route::ApplesOranges => "### Machine Learning vs Deep Learning",
        Route::Neurons => {
            "### Neural Network Animation\n\n\
             *Forward Pass* lights the neurons that fire from input to output. \
             *Backpropagation* walks the other way, flashing the weights that get adjusted."
        }
        Route::Transformers => {
            "### Transformers\n\nStep through the architecture, or through how a model is \
             pre-trained and then fine-tuned."
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowStep {
    pub icon: &'static str,
    pub label: &'static str,
}

/// A left-to-right flowchart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    pub title: &'static str,
    pub steps: &'static [FlowStep],
}

const fn step(icon: &'static str, label: &'static str) -> FlowStep {
    FlowStep { icon, label }
}

const MACHINE_LEARNING: [FlowStep; 4] = [
    step("🚗", "Input"),
    step("👨‍💻", "Feature Extraction"),
    step("🔵🔵🔵", "Classification"),
    step("🚗✅", "Output: Car"),
];

const DEEP_LEARNING: [FlowStep; 3] = [
    step("🚗", "Input"),
    step("🔵🔵🔵", "Feature Extraction + Classification"),
    step("🚗✅", "Output: Car"),
];

/// Hand-engineered features versus a network that learns them.
pub fn comparison() -> [Pipeline; 2] {
    [
        Pipeline {
            title: "Machine Learning",
            steps: &MACHINE_LEARNING,
        },
        Pipeline {
            title: "Deep Learning",
            steps: &DEEP_LEARNING,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_page_has_a_heading() {
        for route in Route::ALL {
            assert!(intro(route).starts_with('#'), "{route} has no heading");
        }
        assert!(intro(Route::Home).contains("Select a Model"));
    }

    #[test]
    fn deep_learning_merges_feature_extraction() {
        let [ml, dl] = comparison();
        assert_eq!(ml.steps.len(), 4);
        assert_eq!(dl.steps.len(), 3);
        assert_eq!(ml.steps.last(), dl.steps.last());
        assert_eq!(dl.steps[1].label, "Feature Extraction + Classification");
    }
}
