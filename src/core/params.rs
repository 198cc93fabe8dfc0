#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two scalars a regression view fits: a multiplicative weight and an additive bias.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    pub weight: f64,
    pub bias: f64,
}

impl Parameters {
    pub const fn new(weight: f64, bias: f64) -> Self {
        Self { weight, bias }
    }

    /// `weight * x + bias`.
    #[inline]
    pub fn linear(&self, x: f64) -> f64 {
        self.weight * x + self.bias
    }

    pub fn is_finite(&self) -> bool {
        self.weight.is_finite() && self.bias.is_finite()
    }
}
