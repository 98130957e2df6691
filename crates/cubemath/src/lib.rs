//! Affine transform primitives for the Pocket Cube scene.
//!
//! All rotations follow the screen-space convention of the renderer that
//! consumes the scene: see [`Transform::rotate()`].

pub use {approx, cgmath};

/// Floating-point type used for geometry.
pub type Float = f32;

/// Small floating-point value used for comparisons.
pub const EPSILON: Float = 0.0001;

/// π
pub const PI: Float = std::f32::consts::PI;
/// π/2, which is one quarter turn.
pub const HALF_PI: Float = std::f32::consts::FRAC_PI_2;

/// Asserts that both arguments are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $crate::EPSILON)
    };
}

pub mod approx_cmp;
pub mod transform;

pub use approx_cmp::approx_eq;
pub use transform::Transform;
