use crate::error::{Result, VizError};
use crate::params::Parameters;
use crate::render::PlotSpec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a regression view does when an update produces a non-finite parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DivergencePolicy {
    /// Keep updating; the chart degrades silently. Matches the classroom demos.
    #[default]
    Ignore,
    /// Keep the last finite parameters and stop updating.
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegressionConfig {
    pub learning_rate: f64,
    pub initial: Parameters,
    #[cfg_attr(feature = "serde", serde(default))]
    pub divergence: DivergencePolicy,
    pub plot: PlotSpec,
}

impl RegressionConfig {
    pub fn linear_default() -> Self {
        Self {
            learning_rate: 0.00001,
            initial: Parameters::new(100.0, 2000.0),
            divergence: DivergencePolicy::Ignore,
            plot: PlotSpec::linear_preset(),
        }
    }

    pub fn logistic_default() -> Self {
        Self {
            learning_rate: 0.1,
            initial: Parameters::new(0.0, 0.0),
            divergence: DivergencePolicy::Ignore,
            plot: PlotSpec::logistic_preset(),
        }
    }

    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    pub fn with_initial(mut self, initial: Parameters) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_divergence(mut self, policy: DivergencePolicy) -> Self {
        self.divergence = policy;
        self
    }

    pub fn with_plot(mut self, plot: PlotSpec) -> Self {
        self.plot = plot;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(VizError::InvalidConfig(
                "learning_rate must be finite and > 0",
            ));
        }
        if !self.initial.is_finite() {
            return Err(VizError::InvalidConfig("initial parameters must be finite"));
        }
        self.plot.validate()
    }
}

/// Delays of the neural-network scripted sequences, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceTiming {
    /// Forward pass: delay before the first layer lights up.
    pub lead_in_ms: u32,
    /// Gap between consecutive layers (both directions).
    pub layer_step_ms: u32,
    /// Duration of each emphasis transition; the backward pass settles a layer after this.
    pub transition_ms: u32,
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self {
            lead_in_ms: 500,
            layer_step_ms: 1000,
            transition_ms: 500,
        }
    }
}

impl SequenceTiming {
    pub fn validate(&self) -> Result<()> {
        if self.layer_step_ms == 0 {
            return Err(VizError::InvalidConfig("layer_step_ms must be > 0"));
        }
        if self.transition_ms > self.layer_step_ms {
            return Err(VizError::InvalidConfig(
                "transition_ms must not exceed layer_step_ms",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VizConfig {
    /// Period of the regression animation timer.
    pub tick_period_ms: u32,
    pub linear: RegressionConfig,
    pub logistic: RegressionConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sequence: SequenceTiming,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 300,
            linear: RegressionConfig::linear_default(),
            logistic: RegressionConfig::logistic_default(),
            sequence: SequenceTiming::default(),
        }
    }
}

impl VizConfig {
    pub fn with_tick_period_ms(mut self, ms: u32) -> Self {
        self.tick_period_ms = ms;
        self
    }

    pub fn with_linear(mut self, cfg: RegressionConfig) -> Self {
        self.linear = cfg;
        self
    }

    pub fn with_logistic(mut self, cfg: RegressionConfig) -> Self {
        self.logistic = cfg;
        self
    }

    pub fn with_sequence(mut self, timing: SequenceTiming) -> Self {
        self.sequence = timing;
        self
    }

    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(VizError::InvalidConfig("tick_period_ms must be > 0"));
        }
        self.linear.validate()?;
        self.logistic.validate()?;
        self.sequence.validate()
    }
}
