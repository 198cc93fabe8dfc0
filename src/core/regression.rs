//! The two gradient-descent chart views.
//!
//! A [`RegressionView`] owns its parameters outright; nothing about a running chart lives
//! outside the view instance. Mount it with [`crate::driver::AnimationDriver`].

use tracing::{debug, warn};

use crate::config::{DivergencePolicy, RegressionConfig};
use crate::dataset::Dataset;
use crate::draw::Scene;
use crate::driver::Animated;
use crate::error::Result;
use crate::params::Parameters;
use crate::render::{render_regression, PlotSpec};
use crate::update::{LinearSgd, LogisticSgd, UpdateRule};

pub struct RegressionView<U: UpdateRule> {
    label: &'static str,
    dataset: Dataset,
    rule: U,
    params: Parameters,
    plot: PlotSpec,
    divergence: DivergencePolicy,
    ticks: u64,
    halted: bool,
}

impl<U: UpdateRule> RegressionView<U> {
    pub fn new(
        label: &'static str,
        dataset: Dataset,
        rule: U,
        initial: Parameters,
        plot: PlotSpec,
        divergence: DivergencePolicy,
    ) -> Self {
        Self {
            label,
            dataset,
            rule,
            params: initial,
            plot,
            divergence,
            ticks: 0,
            halted: false,
        }
    }

    pub fn params(&self) -> Parameters {
        self.params
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn plot(&self) -> &PlotSpec {
        &self.plot
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// `true` once a [`DivergencePolicy::Halt`] guard has frozen the parameters.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.rule.predict(self.params, x)
    }

    pub fn render(&self) -> Scene {
        render_regression(&self.plot, &self.dataset, |x| self.predict(x))
    }

    /// Apply one update pass.
    pub fn step(&mut self) {
        if self.halted {
            return;
        }
        let next = self.rule.step(self.params, self.dataset.points());
        self.ticks += 1;

        if self.divergence == DivergencePolicy::Halt && !next.is_finite() {
            self.halted = true;
            warn!(
                view = self.label,
                tick = self.ticks,
                weight = self.params.weight,
                bias = self.params.bias,
                "parameters diverged; holding last finite values"
            );
            return;
        }

        self.params = next;
        debug!(
            view = self.label,
            tick = self.ticks,
            weight = self.params.weight,
            bias = self.params.bias,
            "tick"
        );
    }
}

impl RegressionView<LinearSgd> {
    /// Charges against age on the insurance sample.
    pub fn linear(cfg: &RegressionConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::new(
            "linear-regression",
            Dataset::insurance_charges(),
            LinearSgd::new(cfg.learning_rate),
            cfg.initial,
            cfg.plot,
            cfg.divergence,
        ))
    }
}

impl RegressionView<LogisticSgd> {
    /// Sigmoid fit of the pass/fail sample.
    pub fn logistic(cfg: &RegressionConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::new(
            "logistic-regression",
            Dataset::pass_fail(),
            LogisticSgd::new(cfg.learning_rate),
            cfg.initial,
            cfg.plot,
            cfg.divergence,
        ))
    }
}

impl<U: UpdateRule> Animated for RegressionView<U> {
    fn label(&self) -> &str {
        self.label
    }

    fn tick(&mut self) {
        self.step();
    }

    fn scene(&self) -> Scene {
        self.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use crate::dataset::DataPoint;
    use crate::draw::Shape;
    use crate::driver::AnimationDriver;
    use crate::error::VizError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn diverging(policy: DivergencePolicy) -> RegressionView<LinearSgd> {
        let data = Dataset::new("big", "x", "y", vec![DataPoint::new(1e6, 1e6)]);
        RegressionView::new(
            "big",
            data,
            LinearSgd::new(10.0),
            Parameters::default(),
            PlotSpec::linear_preset(),
            policy,
        )
    }

    #[test]
    fn linear_defaults_match_classroom_values() {
        let view = RegressionView::linear(&RegressionConfig::linear_default()).unwrap();
        assert_eq!(view.params(), Parameters::new(100.0, 2000.0));
        assert_eq!(view.dataset().len(), 6);
        assert_eq!(view.predict(10.0), 3000.0);
    }

    #[test]
    fn logistic_starts_flat() {
        let view = RegressionView::logistic(&RegressionConfig::logistic_default()).unwrap();
        assert_eq!(view.predict(-4.0), 0.5);
        assert_eq!(view.predict(4.0), 0.5);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = RegressionConfig::linear_default().with_learning_rate(0.0);
        assert!(matches!(
            RegressionView::linear(&cfg),
            Err(VizError::InvalidConfig(_))
        ));
    }

    #[test]
    fn logistic_curve_moves_towards_labels() {
        let mut view = RegressionView::logistic(&RegressionConfig::logistic_default()).unwrap();
        for _ in 0..200 {
            view.step();
        }
        assert!(view.predict(1.0) < 0.5);
        assert!(view.predict(5.0) > 0.5);
        assert_eq!(view.ticks(), 200);
    }

    #[test]
    fn ignore_policy_lets_parameters_run_away() {
        let mut view = diverging(DivergencePolicy::Ignore);
        for _ in 0..40 {
            view.step();
        }
        assert!(!view.params().is_finite());
        assert!(!view.is_halted());
    }

    #[test]
    fn halt_policy_keeps_last_finite_parameters() {
        let mut view = diverging(DivergencePolicy::Halt);
        for _ in 0..40 {
            view.step();
        }
        assert!(view.is_halted());
        assert!(view.params().is_finite());

        let frozen = view.params();
        let ticks = view.ticks();
        view.step();
        assert_eq!(view.params(), frozen);
        assert_eq!(view.ticks(), ticks);
    }

    #[test]
    fn mounted_linear_view_redraws_fit_each_tick() {
        let clock = Rc::new(VirtualClock::new());
        let frames = Rc::new(RefCell::new(Vec::new()));
        let f = frames.clone();
        let view = RegressionView::linear(&RegressionConfig::linear_default()).unwrap();
        let mut driver = AnimationDriver::mount(clock.clone(), 300, view, move |s: &Scene| {
            f.borrow_mut().push(s.clone())
        })
        .unwrap();

        clock.advance(600);
        assert_eq!(driver.view().ticks(), 2);
        driver.unmount();
        clock.advance(600);
        assert_eq!(driver.view().ticks(), 2);

        let frames = frames.borrow();
        assert_eq!(frames.len(), 3);
        let fit = |s: &Scene| match s.get("fit").map(|c| c.shape.clone()) {
            Some(Shape::Line { y2, .. }) => y2,
            other => panic!("{other:?}"),
        };
        assert_ne!(fit(&frames[0]), fit(&frames[1]));
    }
}
