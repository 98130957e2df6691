//! Interpolation functions.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

/// Function that maps a float from the range 0.0 to 1.0 to another float
/// from 0.0 to 1.0.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[allow(missing_docs)]
pub enum InterpolateFn {
    Lerp,
    Cosine,
    Cubic,
    /// Ease in and out along [`CubicBezier::EASE_IN_OUT`].
    #[default]
    Spline,
    Circular,
    Overshoot,
    CriticallyDamped,
}

impl InterpolateFn {
    /// Returns the interpolation value for `t` in the range [0, 1]. The
    /// result is 0 at `t = 0` and 1 at `t = 1`; in between, it may leave
    /// [0, 1] for curves that overshoot.
    pub fn interpolate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Lerp => t,

            Self::Cosine => (1.0 - (t * PI).cos()) / 2.0,

            Self::Cubic => (3.0 - 2.0 * t) * t * t,

            Self::Spline => CubicBezier::EASE_IN_OUT.interpolate(t),

            Self::Circular => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) * 0.5
                } else {
                    (1.0 + (1.0 - (-2.0 * t + 2.0).powi(2)).sqrt()) * 0.5
                }
            }

            Self::Overshoot => {
                // https://easings.net/#easeOutBack
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }

            Self::CriticallyDamped => {
                if t >= 1.0 {
                    // The curve only approaches 1 asymptotically.
                    1.0
                } else {
                    (-5.0 * t - 1.0) * (-8.0 * t).exp() + 1.0
                }
            }
        }
    }
}

/// Cubic Bézier curve from (0, 0) to (1, 1), used as a function of X.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CubicBezier {
    /// First control point.
    pub p1: (f32, f32),
    /// Second control point.
    pub p2: (f32, f32),
}

impl CubicBezier {
    /// Slow start and slow end.
    pub const EASE_IN_OUT: Self = Self {
        p1: (0.25, 0.0),
        p2: (0.75, 1.0),
    };

    const NEWTON_ITERATIONS: usize = 8;
    const BISECTION_ITERATIONS: usize = 32;
    const TOLERANCE: f32 = 1e-6;

    /// Returns the Y coordinate of the curve at X coordinate `x`. Control
    /// point X coordinates must be within [0, 1] so that the curve is a
    /// function of X.
    pub fn interpolate(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let s = self.solve_for_x(x);
        bezier(self.p1.1, self.p2.1, s)
    }

    /// Returns the curve parameter at which the X coordinate equals `x`.
    fn solve_for_x(&self, x: f32) -> f32 {
        let (x1, x2) = (self.p1.0, self.p2.0);

        // Newton's method converges quickly except near flat spots.
        let mut s = x;
        for _ in 0..Self::NEWTON_ITERATIONS {
            let err = bezier(x1, x2, s) - x;
            if err.abs() < Self::TOLERANCE {
                return s;
            }
            let slope = bezier_slope(x1, x2, s);
            if slope.abs() < Self::TOLERANCE {
                break;
            }
            s -= err / slope;
        }

        // Fall back to bisection; X is monotonic in the parameter.
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..Self::BISECTION_ITERATIONS {
            let value = bezier(x1, x2, s);
            if (value - x).abs() < Self::TOLERANCE {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}

/// Evaluates one coordinate of a cubic Bézier curve from 0 to 1 with control
/// coordinates `a` and `b`.
fn bezier(a: f32, b: f32, s: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * s * a + 3.0 * u * s * s * b + s * s * s
}
fn bezier_slope(a: f32, b: f32, s: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * a + 6.0 * u * s * (b - a) + 3.0 * s * s * (1.0 - b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_endpoints() {
        for &f in InterpolateFn::VARIANTS {
            assert_close(f.interpolate(0.0), 0.0);
            assert_close(f.interpolate(1.0), 1.0);
            assert_close(f.interpolate(-1.0), 0.0);
            assert_close(f.interpolate(2.0), 1.0);
        }
    }

    #[test]
    fn test_monotonic_curves() {
        for f in [
            InterpolateFn::Lerp,
            InterpolateFn::Cosine,
            InterpolateFn::Cubic,
            InterpolateFn::Spline,
            InterpolateFn::Circular,
        ] {
            let mut prev = 0.0;
            for i in 1..=100 {
                let y = f.interpolate(i as f32 / 100.0);
                assert!(y >= prev - 1e-6, "{f} decreases at {i}");
                prev = y;
            }
        }
    }

    #[test]
    fn test_spline_is_symmetric_ease_in_out() {
        let f = InterpolateFn::Spline;
        assert_close(f.interpolate(0.5), 0.5);
        for t in [0.1, 0.2, 0.3, 0.4] {
            assert_close(f.interpolate(t) + f.interpolate(1.0 - t), 1.0);
            // Slow start
            assert!(f.interpolate(t) < t);
        }
    }

    #[test]
    fn test_bezier_inverts_x() {
        let curve = CubicBezier {
            p1: (0.1, 0.7),
            p2: (0.9, 0.2),
        };
        for i in 1..20 {
            let x = i as f32 / 20.0;
            let s = curve.solve_for_x(x);
            assert_close(bezier(0.1, 0.9, s), x);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(InterpolateFn::CriticallyDamped.to_string(), "critically_damped");
        assert_eq!("spline".parse(), Ok(InterpolateFn::Spline));
    }
}
