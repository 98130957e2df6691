use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Axis, CubeError, Face, LayerMask, Location};

/// Twist of one or both layers along an axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Twist {
    /// Axis to twist around.
    pub axis: Axis,
    /// Layers to twist.
    pub layers: LayerMask,
    /// Signed number of quarter turns in `-2..=2`. Positive values turn the
    /// right/up/front layer clockwise as seen from that face.
    pub angle: i8,
}

impl Twist {
    /// Clockwise quarter turn of the right face.
    pub const R: Self = Self::face(Face::R, 1);
    /// Clockwise quarter turn of the up face.
    pub const U: Self = Self::face(Face::U, 1);
    /// Clockwise quarter turn of the front face.
    pub const F: Self = Self::face(Face::F, 1);
    /// Clockwise quarter turn of the left face.
    pub const L: Self = Self::face(Face::L, 1);
    /// Clockwise quarter turn of the down face.
    pub const D: Self = Self::face(Face::D, 1);
    /// Clockwise quarter turn of the back face.
    pub const B: Self = Self::face(Face::B, 1);

    /// Returns a twist, or an error if any of the arguments is out of range.
    pub fn new(axis: u8, layers: u8, angle: i8) -> Result<Self, CubeError> {
        let axis = Axis::from_index(axis)?;
        let layers = LayerMask::new(layers)?;
        if !(-2..=2).contains(&angle) {
            return Err(CubeError::InvalidAngle(angle));
        }
        Ok(Self {
            axis,
            layers,
            angle,
        })
    }

    /// Returns a twist of a single face by `turns` clockwise quarter turns,
    /// as seen from that face.
    pub const fn face(face: Face, turns: i8) -> Self {
        // Clockwise from the left/down/back side is counterclockwise from
        // the right/up/front side.
        let (axis, layers, angle) = match face {
            Face::R => (Axis::X, LayerMask::POSITIVE, turns),
            Face::U => (Axis::Y, LayerMask::POSITIVE, turns),
            Face::F => (Axis::Z, LayerMask::POSITIVE, turns),
            Face::L => (Axis::X, LayerMask::NEGATIVE, turns.wrapping_neg()),
            Face::D => (Axis::Y, LayerMask::NEGATIVE, turns.wrapping_neg()),
            Face::B => (Axis::Z, LayerMask::NEGATIVE, turns.wrapping_neg()),
        };
        Self {
            axis,
            layers,
            angle,
        }
    }

    /// Returns a rotation of the whole cube by `turns` quarter turns in the
    /// same direction as the right/up/front face.
    pub const fn whole_cube(axis: Axis, turns: i8) -> Self {
        Self {
            axis,
            layers: LayerMask::ALL,
            angle: turns,
        }
    }

    /// Returns the twist that undoes this one.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            angle: self.angle.wrapping_neg(),
            ..self
        }
    }

    /// Returns whether the twist has no effect on the cube.
    pub fn is_identity(self) -> bool {
        self.angle == 0 || self.layers.is_empty()
    }

    /// Returns the number of clockwise quarter turns of `face` that perform
    /// this twist on that face's layer, or `None` if the layer does not
    /// turn.
    pub(crate) fn face_quarter_turns(self, face: Face) -> Option<u8> {
        if face.axis() != self.axis || (self.layers & face.layer()).is_empty() {
            return None;
        }
        let angle = match face.layer() {
            LayerMask::POSITIVE => self.angle,
            _ => self.angle.wrapping_neg(),
        };
        Some(angle.rem_euclid(4) as u8)
    }

    /// Returns the locations whose parts move during the twist: the corner
    /// locations in every turning layer, plus the center when the whole cube
    /// rotates.
    pub fn affected_locations(self) -> SmallVec<[Location; 9]> {
        let mut ret = SmallVec::new();
        if self.is_identity() {
            return ret;
        }
        for positive in [true, false] {
            let face = Face::from_axis_layer(self.axis, positive);
            if !(self.layers & face.layer()).is_empty() {
                ret.extend(face.corner_locations());
            }
        }
        if self.layers.is_all() {
            ret.push(Location::CENTER);
        }
        ret.sort();
        ret
    }

    /// Returns a random quarter or half turn of a single face.
    pub fn random(rng: &mut impl Rng) -> Self {
        let face = Face::from_axis_layer(
            Axis::from_repr(rng.random_range(0..3)).unwrap_or(Axis::X),
            rng.random_bool(0.5),
        );
        let turns = [1, -1, 2][rng.random_range(0..3)];
        Self::face(face, turns)
    }
}

impl fmt::Display for Twist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, turns) = match self.layers {
            LayerMask::POSITIVE => (Face::from_axis_layer(self.axis, true).to_string(), self.angle),
            LayerMask::NEGATIVE => (
                Face::from_axis_layer(self.axis, false).to_string(),
                self.angle.wrapping_neg(),
            ),
            LayerMask::ALL => (self.axis.to_string(), self.angle),
            _ => return write!(f, "{}-{}", self.axis, self.angle),
        };
        let suffix = match turns.rem_euclid(4) {
            0 => return write!(f, "{name}0"),
            1 => "",
            2 => "2",
            _ => "'",
        };
        write!(f, "{name}{suffix}")
    }
}
