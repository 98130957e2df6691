//! Affine 3D transforms.

use std::fmt;
use std::ops::Mul;

use approx::AbsDiffEq;
use cgmath::{Matrix4, Point3, Rad, SquareMatrix, Vector3};

use crate::{EPSILON, Float};

/// Affine transform in homogeneous coordinates.
///
/// The mutating methods ([`Self::rotate()`], [`Self::shift()`],
/// [`Self::scale()`], [`Self::transform()`]) all compose the new operation
/// **after** the existing one; i.e., they multiply from the left. This makes
/// a sequence of calls read in the order that the operations are applied to
/// a point.
#[derive(Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4<Float>,
}
impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Print row by row, which is how humans write matrices.
        let rows = self.rows();
        f.debug_list().entries(rows.iter()).finish()
    }
}
impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
impl From<Matrix4<Float>> for Transform {
    fn from(matrix: Matrix4<Float>) -> Self {
        Self { matrix }
    }
}
impl From<Transform> for Matrix4<Float> {
    fn from(t: Transform) -> Self {
        t.matrix
    }
}
impl Mul for Transform {
    type Output = Transform;

    /// Returns the transform that applies `rhs` first and then `self`.
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
impl<'a> Mul<&'a Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: Self) -> Self::Output {
        *self * *rhs
    }
}
impl AbsDiffEq for Transform {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.matrix.abs_diff_eq(&other.matrix, epsilon)
    }
}

impl Transform {
    /// Returns the identity transform.
    pub fn identity() -> Self {
        Matrix4::identity().into()
    }
    /// Constructs a rotation. See [`Self::rotate()`].
    pub fn rotation(dx: Float, dy: Float, dz: Float) -> Self {
        let mut ret = Self::identity();
        ret.rotate(dx, dy, dz);
        ret
    }
    /// Constructs a translation.
    pub fn translation(dx: Float, dy: Float, dz: Float) -> Self {
        Matrix4::from_translation(Vector3::new(dx, dy, dz)).into()
    }
    /// Constructs a uniform scaling.
    pub fn scaling(factor: Float) -> Self {
        Matrix4::from_scale(factor).into()
    }

    /// Returns the matrix as a list of rows.
    pub fn rows(&self) -> [[Float; 4]; 4] {
        let m = &self.matrix;
        // cgmath stores columns, so `m[col][row]`.
        std::array::from_fn(|row| std::array::from_fn(|col| m[col][row]))
    }

    /// Rotates about the X axis by `dx`, then about the Y axis by `dy`, then
    /// about the Z axis by `dz`. Angles are in radians; zero angles are
    /// skipped.
    ///
    /// Seen from the positive end of the axis in a right-handed frame,
    /// positive angles about X and Z turn clockwise and positive angles about
    /// Y turn counterclockwise. This matches the renderer that consumes the
    /// scene.
    pub fn rotate(&mut self, dx: Float, dy: Float, dz: Float) {
        if dx != 0.0 {
            self.matrix = Matrix4::from_angle_x(Rad(-dx)) * self.matrix;
        }
        if dy != 0.0 {
            self.matrix = Matrix4::from_angle_y(Rad(dy)) * self.matrix;
        }
        if dz != 0.0 {
            self.matrix = Matrix4::from_angle_z(Rad(-dz)) * self.matrix;
        }
    }
    /// Translates by `(dx, dy, dz)`.
    pub fn shift(&mut self, dx: Float, dy: Float, dz: Float) {
        self.matrix = Matrix4::from_translation(Vector3::new(dx, dy, dz)) * self.matrix;
    }
    /// Scales uniformly by `factor`.
    pub fn scale(&mut self, factor: Float) {
        self.matrix = Matrix4::from_scale(factor) * self.matrix;
    }
    /// Applies `other` after this transform (`self = other * self`).
    pub fn transform(&mut self, other: &Transform) {
        self.matrix = other.matrix * self.matrix;
    }

    /// Returns the inverse transform, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.invert().map(Self::from)
    }

    /// Transforms a point.
    pub fn transform_point(&self, p: Point3<Float>) -> Point3<Float> {
        <Matrix4<Float> as cgmath::Transform<Point3<Float>>>::transform_point(&self.matrix, p)
    }
    /// Transforms a vector, ignoring translation.
    pub fn transform_vector(&self, v: Vector3<Float>) -> Vector3<Float> {
        <Matrix4<Float> as cgmath::Transform<Point3<Float>>>::transform_vector(&self.matrix, v)
    }
    /// Returns the image of the origin.
    pub fn origin(&self) -> Point3<Float> {
        self.transform_point(Point3::new(0.0, 0.0, 0.0))
    }
}
