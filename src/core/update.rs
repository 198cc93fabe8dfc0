//! Online gradient-style update rules.
//!
//! One call to [`UpdateRule::step`] is one tick: a single pass over the dataset in order,
//! where every point sees the parameters already nudged by the point before it.

use crate::dataset::DataPoint;
use crate::params::Parameters;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Logistic squashing function, stable for any finite `z`.
///
/// Branches on the sign so `exp` is only ever taken of a non-positive number.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

pub trait UpdateRule {
    fn learning_rate(&self) -> f64;

    /// Model output for input `x` under `params`.
    fn predict(&self, params: Parameters, x: f64) -> f64;

    /// One sequential pass over `points`.
    ///
    /// An empty slice is a no-op: the parameters come back unchanged.
    fn step(&self, params: Parameters, points: &[DataPoint]) -> Parameters {
        let lr = self.learning_rate();
        points.iter().fold(params, |p, point| {
            let error = point.y - self.predict(p, point.x);
            Parameters {
                weight: p.weight + lr * error * point.x,
                bias: p.bias + lr * error,
            }
        })
    }
}

/// Least-squares SGD on `y = w*x + b`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearSgd {
    pub learning_rate: f64,
}

impl LinearSgd {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.00001;

    pub const fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Default for LinearSgd {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE)
    }
}

impl UpdateRule for LinearSgd {
    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    fn predict(&self, params: Parameters, x: f64) -> f64 {
        params.linear(x)
    }
}

/// Same update shape as [`LinearSgd`], with the prediction passed through [`sigmoid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogisticSgd {
    pub learning_rate: f64,
}

impl LogisticSgd {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

    pub const fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Default for LogisticSgd {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE)
    }
}

impl UpdateRule for LogisticSgd {
    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    fn predict(&self, params: Parameters, x: f64) -> f64 {
        sigmoid(params.linear(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
    }

    #[test]
    fn linear_tick_matches_sequential_accumulation() {
        let data = Dataset::insurance_charges();
        let rule = LinearSgd::default();
        let start = Parameters::new(100.0, 2000.0);

        let next = rule.step(start, data.points());

        // Closed form: sum the per-point deltas, each computed from the running params.
        let lr = 0.00001;
        let (mut m, mut b) = (100.0_f64, 2000.0_f64);
        let (mut dm, mut db) = (0.0, 0.0);
        for &(x, y) in &[
            (18.0, 2000.0),
            (22.0, 3000.0),
            (30.0, 4500.0),
            (35.0, 6000.0),
            (40.0, 7200.0),
            (50.0, 9000.0),
        ] {
            let err: f64 = y - (m * x + b);
            m += lr * err * x;
            b += lr * err;
            dm += lr * err * x;
            db += lr * err;
        }

        assert_close(next.weight, 100.0 + dm, 1e-9);
        assert_close(next.bias, 2000.0 + db, 1e-9);
        assert_close(next.weight, m, 1e-9);
        assert_close(next.bias, b, 1e-9);
    }

    #[test]
    fn linear_first_point_is_seen_by_second() {
        // Two identical points: the second error must be smaller than the first.
        let rule = LinearSgd::new(0.01);
        let p = DataPoint::new(1.0, 10.0);
        let after_one = rule.step(Parameters::default(), &[p]);
        let after_two = rule.step(Parameters::default(), &[p, p]);

        let first_err = 10.0;
        let second_err = 10.0 - after_one.linear(1.0);
        assert!(second_err < first_err);
        assert_close(after_two.bias, after_one.bias + 0.01 * second_err, 1e-12);
    }

    #[test]
    fn logistic_tick_matches_sequential_rule() {
        let data = Dataset::pass_fail();
        let rule = LogisticSgd::default();
        let next = rule.step(Parameters::new(0.0, 0.0), data.points());

        let (mut w, mut b) = (0.0_f64, 0.0_f64);
        for &(x, y) in &[(1.0, 0.0), (2.0, 0.0), (3.0, 1.0), (4.0, 1.0), (5.0, 1.0)] {
            let err: f64 = y - 1.0 / (1.0 + (-(w * x + b)).exp());
            w += 0.1 * err * x;
            b += 0.1 * err;
        }

        assert_close(next.weight, w, 1e-12);
        assert_close(next.bias, b, 1e-12);
        // First point at w=b=0 predicts 0.5 for a 0 label, so bias starts by going down.
        let first = rule.step(Parameters::new(0.0, 0.0), &data.points()[..1]);
        assert_close(first.bias, -0.05, 1e-12);
        assert!(first.weight < 0.0);
    }

    #[test]
    fn sigmoid_properties() {
        assert_eq!(sigmoid(0.0), 0.5);

        let mut prev = 0.0;
        let mut z = -30.0;
        while z <= 30.0 {
            let s = sigmoid(z);
            assert!(s > 0.0 && s < 1.0, "sigmoid({z}) = {s}");
            assert!(s > prev, "not increasing at {z}");
            prev = s;
            z += 0.25;
        }

        // Large magnitudes must not overflow into NaN.
        assert!(sigmoid(1000.0).is_finite());
        assert!(sigmoid(-1000.0).is_finite());
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
    }

    #[test]
    fn zero_error_is_a_fixed_point() {
        // y = 3x + 1 exactly.
        let points: Vec<DataPoint> = (0..6)
            .map(|i| {
                let x = i as f64;
                DataPoint::new(x, 3.0 * x + 1.0)
            })
            .collect();
        let p = Parameters::new(3.0, 1.0);
        assert_eq!(LinearSgd::new(0.05).step(p, &points), p);
    }

    #[test]
    fn empty_dataset_is_noop() {
        let p = Parameters::new(1.5, -2.0);
        assert_eq!(LinearSgd::default().step(p, &[]), p);
        assert_eq!(LogisticSgd::default().step(p, &[]), p);
    }
}
