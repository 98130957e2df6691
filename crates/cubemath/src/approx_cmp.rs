//! Approximate comparison functions that automatically use [`EPSILON`].

pub use approx::AbsDiffEq;

use crate::{EPSILON, Float};

/// Compares two values, but considers them equal if they are separated by
/// less than `EPSILON`.
pub fn approx_eq<T: AbsDiffEq<Epsilon = Float>>(a: &T, b: &T) -> bool {
    approx::abs_diff_eq!(a, b, epsilon = EPSILON)
}

/// Returns `x` snapped to the nearest integer if it is within `EPSILON` of
/// one, or `x` unchanged otherwise.
///
/// Rotations by multiples of a quarter turn leave tiny residues like `-4e-8`
/// in their matrices; snapping keeps printed transforms readable.
pub fn snap(x: Float) -> Float {
    let rounded = x.round();
    if (x - rounded).abs() < EPSILON {
        // avoid printing `-0`
        rounded + 0.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap() {
        assert_eq!(snap(0.99999), 1.0);
        assert_eq!(snap(-4e-8), 0.0);
        assert!(snap(-4e-8).is_sign_positive());
        assert_eq!(snap(0.5), 0.5);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(&1.0_f32, &1.00001));
        assert!(!approx_eq(&1.0_f32, &1.01));
    }
}
