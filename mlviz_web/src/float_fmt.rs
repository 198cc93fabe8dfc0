//! Float formatting that never goes through `format!("{:.N}")`.
//!
//! Float-to-decimal formatting has panicked on some wasm toolchain/browser combinations,
//! so readouts and canvas font strings go through the core's integer-based [`fmt_fixed`].

pub use mlviz::render::fmt_fixed;

/// Whole-pixel value for CSS strings such as `"12px sans-serif"`.
pub fn fmt_px(v: f64) -> String {
    let mut s = fmt_fixed(v, 0);
    s.push_str("px");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_digits() {
        assert_eq!(fmt_fixed(3.14159, 2), "3.14");
        assert_eq!(fmt_fixed(2000.0, 2), "2000.00");
        assert_eq!(fmt_fixed(0.05, 3), "0.050");
        assert_eq!(fmt_fixed(-0.25, 1), "-0.3");
        assert_eq!(fmt_fixed(-0.004, 2), "0.00");
        assert_eq!(fmt_fixed(12.6, 0), "13");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(fmt_fixed(f64::NAN, 2), "NaN");
        assert_eq!(fmt_fixed(f64::INFINITY, 2), "Inf");
        assert_eq!(fmt_fixed(f64::NEG_INFINITY, 0), "-Inf");
        assert_eq!(fmt_fixed(1e300, 4), "Inf");
    }

    #[test]
    fn pixel_strings() {
        assert_eq!(fmt_px(16.0), "16px");
        assert_eq!(fmt_px(11.4), "11px");
    }
}
