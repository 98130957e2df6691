use thiserror::Error;

/// Error produced by an invalid operation on the cube model.
///
/// An operation that fails leaves the cube unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    /// Twist axis not in `0..=2`
    #[error("invalid axis {0}; expected 0, 1, or 2")]
    InvalidAxis(u8),
    /// Layer mask with bits other than the two layers
    #[error("invalid layer mask {0}; expected 0 to 3")]
    InvalidLayerMask(u8),
    /// Twist angle not in `-2..=2` quarter turns
    #[error("invalid angle {0}; expected -2 to 2 quarter turns")]
    InvalidAngle(i8),
    /// Part ID out of range
    #[error("invalid part {0}")]
    InvalidPart(u8),
    /// State that is not a permutation of the corners with valid
    /// orientations
    #[error("invalid cube state: {0}")]
    InvalidState(String),
}
