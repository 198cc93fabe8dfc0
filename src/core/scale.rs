#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Affine map from a data interval onto a pixel interval.
///
/// Either interval may be reversed (screen `y` usually is). A degenerate domain maps
/// every value to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    #[inline]
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (v - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Pixel back to data. A degenerate range maps to the middle of the domain.
    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        LinearScale::new(self.range, self.domain).apply(px)
    }

    /// `count` evenly spaced values across the domain, both ends included.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        match count {
            0 => Vec::new(),
            1 => vec![d0],
            n => (0..n)
                .map(|i| d0 + (d1 - d0) * (i as f64) / ((n - 1) as f64))
                .collect(),
        }
    }
}
