use crate::dataset::Dataset;
use crate::draw::{palette, Scene, Shape, Style, TextAnchor};
use crate::error::{Result, VizError};
use crate::scale::LinearScale;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Canvas geometry and cosmetics for one regression chart.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlotSpec {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    pub point_radius: f64,
    pub fit_width: f64,
    /// Points at which the fitted curve is evaluated; 2 means "domain extremes only".
    pub curve_samples: usize,
    pub show_residuals: bool,
    pub axis_ticks: usize,
    pub transition_ms: u32,
}

impl PlotSpec {
    pub const DEFAULT_TRANSITION_MS: u32 = 200;

    /// 600x400 chart of charges against age.
    pub fn linear_preset() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            margin: Margin::new(20.0, 30.0, 40.0, 50.0),
            x_domain: (15.0, 55.0),
            y_domain: (1000.0, 10000.0),
            point_radius: 6.0,
            fit_width: 2.0,
            curve_samples: 2,
            show_residuals: true,
            axis_ticks: 5,
            transition_ms: Self::DEFAULT_TRANSITION_MS,
        }
    }

    /// 500x300 chart of a probability in [0, 1].
    pub fn logistic_preset() -> Self {
        Self {
            width: 500.0,
            height: 300.0,
            margin: Margin::new(20.0, 30.0, 40.0, 40.0),
            x_domain: (0.0, 6.0),
            y_domain: (0.0, 1.0),
            point_radius: 5.0,
            fit_width: 2.0,
            curve_samples: 2,
            show_residuals: false,
            axis_ticks: 5,
            transition_ms: Self::DEFAULT_TRANSITION_MS,
        }
    }

    pub fn with_curve_samples(mut self, samples: usize) -> Self {
        self.curve_samples = samples;
        self
    }

    pub fn with_residuals(mut self, show: bool) -> Self {
        self.show_residuals = show;
        self
    }

    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Data `x` to absolute canvas pixels (margin included).
    pub fn x_scale(&self) -> LinearScale {
        LinearScale::new(
            self.x_domain,
            (self.margin.left, self.margin.left + self.inner_width()),
        )
    }

    /// Data `y` to absolute canvas pixels; larger values sit higher.
    pub fn y_scale(&self) -> LinearScale {
        LinearScale::new(
            self.y_domain,
            (self.margin.top + self.inner_height(), self.margin.top),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(VizError::InvalidConfig("canvas must have positive size"));
        }
        if !(self.inner_width() > 0.0 && self.inner_height() > 0.0) {
            return Err(VizError::InvalidConfig("margins leave no drawing area"));
        }
        if self.x_domain.0 == self.x_domain.1 || self.y_domain.0 == self.y_domain.1 {
            return Err(VizError::InvalidConfig("axis domain is degenerate"));
        }
        if self.curve_samples < 2 {
            return Err(VizError::InvalidConfig("curve_samples must be >= 2"));
        }
        Ok(())
    }
}

/// Draw axes, the samples, the current model curve and (optionally) residual connectors.
///
/// `model` maps an input to the plotted output under the current parameters.
pub fn render_regression(plot: &PlotSpec, dataset: &Dataset, model: impl Fn(f64) -> f64) -> Scene {
    let sx = plot.x_scale();
    let sy = plot.y_scale();
    let ms = plot.transition_ms;
    let mut scene = Scene::new(plot.width, plot.height);

    push_axes(&mut scene, plot, &sx, &sy);

    for (i, p) in dataset.points().iter().enumerate() {
        scene.push(
            format!("point-{i}"),
            Shape::Circle {
                cx: sx.apply(p.x),
                cy: sy.apply(p.y),
                r: plot.point_radius,
            },
            Style::filled(palette::POINT),
            0,
        );
    }

    let (x0, x1) = plot.x_domain;
    let fit = if plot.curve_samples <= 2 {
        Shape::Line {
            x1: sx.apply(x0),
            y1: sy.apply(model(x0)),
            x2: sx.apply(x1),
            y2: sy.apply(model(x1)),
        }
    } else {
        let n = plot.curve_samples;
        Shape::Polyline {
            points: (0..n)
                .map(|i| {
                    let x = x0 + (x1 - x0) * (i as f64) / ((n - 1) as f64);
                    (sx.apply(x), sy.apply(model(x)))
                })
                .collect(),
        }
    };
    scene.push("fit", fit, Style::stroked(palette::FIT, plot.fit_width), ms);

    if plot.show_residuals {
        for (i, p) in dataset.points().iter().enumerate() {
            let x = sx.apply(p.x);
            scene.push(
                format!("residual-{i}"),
                Shape::Line {
                    x1: x,
                    y1: sy.apply(p.y),
                    x2: x,
                    y2: sy.apply(model(p.x)),
                },
                Style::stroked(palette::RESIDUAL, 1.0).dashed(3.0),
                ms,
            );
        }
    }

    scene
}

fn push_axes(scene: &mut Scene, plot: &PlotSpec, sx: &LinearScale, sy: &LinearScale) {
    let left = plot.margin.left;
    let top = plot.margin.top;
    let right = left + plot.inner_width();
    let bottom = top + plot.inner_height();
    let axis = Style::stroked(palette::AXIS, 1.0);

    scene.push(
        "axis-x",
        Shape::Line {
            x1: left,
            y1: bottom,
            x2: right,
            y2: bottom,
        },
        axis,
        0,
    );
    scene.push(
        "axis-y",
        Shape::Line {
            x1: left,
            y1: top,
            x2: left,
            y2: bottom,
        },
        axis,
        0,
    );

    let label = Style::filled(palette::LABEL);
    for (i, v) in sx.ticks(plot.axis_ticks).into_iter().enumerate() {
        scene.push(
            format!("tick-x-{i}"),
            Shape::Text {
                x: sx.apply(v),
                y: bottom + 16.0,
                text: fmt_tick(v),
                anchor: TextAnchor::Middle,
                size_px: 11.0,
            },
            label,
            0,
        );
    }
    for (i, v) in sy.ticks(plot.axis_ticks).into_iter().enumerate() {
        scene.push(
            format!("tick-y-{i}"),
            Shape::Text {
                x: left - 6.0,
                y: sy.apply(v) + 4.0,
                text: fmt_tick(v),
                anchor: TextAnchor::End,
                size_px: 11.0,
            },
            label,
            0,
        );
    }
}

/// `v` with exactly `decimals` fractional digits (capped at 9).
///
/// Scales into an `i64` and prints integers, so wasm builds never hit the float
/// formatting machinery (`{:.N}` has panicked on some wasm toolchain/browser combinations).
pub fn fmt_fixed(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }

    let decimals = decimals.min(9);
    let scale = 10_i64.pow(decimals as u32);
    let scaled = (v * scale as f64).round();
    if !scaled.is_finite() || scaled.abs() > i64::MAX as f64 {
        return if v < 0.0 { "-Inf" } else { "Inf" }.to_string();
    }

    let scaled = scaled as i64;
    let mut out = String::new();
    if scaled < 0 {
        out.push('-');
    }
    let abs = scaled.unsigned_abs();
    let scale = scale as u64;
    out.push_str(&(abs / scale).to_string());
    if decimals > 0 {
        let frac = (abs % scale).to_string();
        out.push('.');
        out.extend(std::iter::repeat('0').take(decimals - frac.len()));
        out.push_str(&frac);
    }
    out
}

/// Axis label: whole numbers print without decimals, everything else with two.
pub fn fmt_tick(v: f64) -> String {
    let whole = (v * 100.0).round() % 100.0 == 0.0;
    fmt_fixed(v, if whole { 0 } else { 2 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use crate::update::sigmoid;

    fn shape<'a>(scene: &'a Scene, key: &str) -> &'a Shape {
        &scene.get(key).unwrap_or_else(|| panic!("missing {key}")).shape
    }

    #[test]
    fn linear_scene_has_points_fit_and_residuals() {
        let plot = PlotSpec::linear_preset();
        let data = Dataset::insurance_charges();
        let p = Parameters::new(100.0, 2000.0);
        let scene = render_regression(&plot, &data, |x| p.linear(x));

        assert_eq!(scene.width, 600.0);
        assert_eq!(scene.keys_with_prefix("point-").count(), 6);
        assert_eq!(scene.keys_with_prefix("residual-").count(), 6);

        // Age 35 sits at the middle of [15, 55]; inner width is 520 with a 50px left margin.
        match shape(&scene, "point-3") {
            Shape::Circle { cx, r, .. } => {
                assert_eq!(*cx, 50.0 + 260.0);
                assert_eq!(*r, 6.0);
            }
            other => panic!("{other:?}"),
        }

        // Fit evaluated at the domain extremes: 100*15+2000 = 3500 and 100*55+2000 = 7500.
        let sy = plot.y_scale();
        match shape(&scene, "fit") {
            Shape::Line { x1, y1, x2, y2 } => {
                assert_eq!(*x1, 50.0);
                assert_eq!(*x2, 570.0);
                assert!((*y1 - sy.apply(3500.0)).abs() < 1e-9);
                assert!((*y2 - sy.apply(7500.0)).abs() < 1e-9);
            }
            other => panic!("{other:?}"),
        }
        assert_eq!(scene.get("fit").map(|c| c.transition_ms), Some(200));
    }

    #[test]
    fn residual_connects_truth_to_model() {
        let plot = PlotSpec::linear_preset();
        let data = Dataset::insurance_charges();
        let p = Parameters::new(100.0, 2000.0);
        let scene = render_regression(&plot, &data, |x| p.linear(x));
        let sy = plot.y_scale();

        match shape(&scene, "residual-0") {
            Shape::Line { x1, y1, x2, y2 } => {
                assert_eq!(x1, x2);
                assert!((*y1 - sy.apply(2000.0)).abs() < 1e-9);
                assert!((*y2 - sy.apply(100.0 * 18.0 + 2000.0)).abs() < 1e-9);
            }
            other => panic!("{other:?}"),
        }
        let style = scene.get("residual-0").map(|c| c.style);
        assert_eq!(style.and_then(|s| s.dash), Some(3.0));
    }

    #[test]
    fn logistic_scene_samples_curve_when_asked() {
        let plot = PlotSpec::logistic_preset().with_curve_samples(13);
        let data = Dataset::pass_fail();
        let scene = render_regression(&plot, &data, |x| sigmoid(2.0 * x - 6.0));

        assert_eq!(scene.keys_with_prefix("residual-").count(), 0);
        match shape(&scene, "fit") {
            Shape::Polyline { points } => {
                assert_eq!(points.len(), 13);
                // x = 3 is the midpoint sample, where the curve crosses 0.5.
                let mid = points[6];
                assert!((mid.1 - plot.y_scale().apply(0.5)).abs() < 1e-9);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn presets_validate() {
        assert!(PlotSpec::linear_preset().validate().is_ok());
        assert!(PlotSpec::logistic_preset().validate().is_ok());

        let mut bad = PlotSpec::logistic_preset();
        bad.x_domain = (2.0, 2.0);
        assert_eq!(
            bad.validate(),
            Err(VizError::InvalidConfig("axis domain is degenerate"))
        );
        assert!(PlotSpec::linear_preset().with_curve_samples(1).validate().is_err());
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(fmt_tick(1000.0), "1000");
        assert_eq!(fmt_tick(0.25), "0.25");
        assert_eq!(fmt_tick(-1.5), "-1.50");
        assert_eq!(fmt_tick(-0.004), "0");
        assert_eq!(fmt_tick(f64::NAN), "NaN");
        assert_eq!(fmt_tick(f64::INFINITY), "Inf");
        assert_eq!(fmt_tick(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn fixed_formatting_edges() {
        assert_eq!(fmt_fixed(3.14159, 2), "3.14");
        assert_eq!(fmt_fixed(0.05, 3), "0.050");
        assert_eq!(fmt_fixed(-0.25, 1), "-0.3");
        assert_eq!(fmt_fixed(1e300, 4), "Inf");
        assert_eq!(fmt_fixed(-1e300, 0), "-Inf");
        // Exactly i64::MIN after scaling.
        assert_eq!(fmt_fixed(-(2f64.powi(63)), 0), "-9223372036854775808");
    }
}
