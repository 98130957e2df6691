use std::fmt;
use std::ops::BitAnd;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr};

use crate::{CORNER_COUNT, CubeError, PART_COUNT};

/// Constructs a struct that is a simple wrapper around a `u8` used as an
/// index into the per-location and per-part tables.
macro_rules! idx_struct {
    (
        $(
            $(#[$attr:meta])*
            $struct_vis:vis struct $struct_name:ident(pub u8);
        )+
    ) => {
        $(
            $(#[$attr])*
            #[derive(
                Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            #[repr(transparent)]
            $struct_vis struct $struct_name(pub u8);

            impl fmt::Debug for $struct_name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "#{:?}", self.0)
                }
            }

            impl $struct_name {
                /// Returns the index as a `usize`.
                pub fn to_usize(self) -> usize {
                    self.0 as usize
                }
                /// Returns an iterator over all values.
                pub fn iter() -> impl Clone + Iterator<Item = Self> {
                    (0..PART_COUNT as u8).map(Self)
                }
                /// Returns an iterator over all corner values.
                pub fn corners() -> impl Clone + Iterator<Item = Self> {
                    (0..CORNER_COUNT as u8).map(Self)
                }
                /// Returns whether this is the center.
                pub fn is_center(self) -> bool {
                    self == Self::CENTER
                }
            }
        )+
    };
}

idx_struct! {
    /// ID of a **part**, which is a rigid piece of the cube. Parts `0..8` are
    /// corners; part `8` is the center.
    pub struct Part(pub u8);

    /// ID of a **location**, which is one of the fixed slots that a part can
    /// occupy. Locations `0..8` are corner slots; location `8` is the center.
    pub struct Location(pub u8);
}

impl Part {
    /// Center part, which never leaves [`Location::CENTER`].
    pub const CENTER: Self = Self(CORNER_COUNT as u8);

    /// Returns the part with the given ID, or an error if it is out of range.
    pub fn new(id: u8) -> Result<Self, CubeError> {
        if (id as usize) < PART_COUNT {
            Ok(Self(id))
        } else {
            Err(CubeError::InvalidPart(id))
        }
    }
}

impl Location {
    /// Center location.
    pub const CENTER: Self = Self(CORNER_COUNT as u8);

    /// Short names of the corner locations, listing the faces that meet
    /// there.
    pub const CORNER_NAMES: [&'static str; CORNER_COUNT] =
        ["urf", "dfr", "ubr", "drb", "ulb", "dbl", "ufl", "dlf"];

    /// Returns the short name of the location, such as `urf`.
    pub fn name(self) -> &'static str {
        Self::CORNER_NAMES
            .get(self.to_usize())
            .copied()
            .unwrap_or("center")
    }
}
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_center() {
            write!(f, "center")
        } else {
            write!(f, "corner {}", self.0)
        }
    }
}

/// How far a corner part is twisted within its location, in thirds of a
/// turn.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Orientation(u8);
impl Orientation {
    /// Number of distinct orientations of a corner.
    pub const COUNT: u8 = 3;
    /// Untwisted orientation.
    pub const ZERO: Self = Self(0);

    /// Returns the orientation with the given code, or `None` if the code is
    /// not in `0..3`.
    pub fn from_code(code: u8) -> Option<Self> {
        (code < Self::COUNT).then_some(Self(code))
    }
    /// Returns the orientation code in `0..3`.
    pub fn code(self) -> u8 {
        self.0
    }
    /// Returns the orientation after twisting by `delta` more thirds.
    #[must_use]
    pub fn twisted(self, delta: u8) -> Self {
        Self((self.0 + delta) % Self::COUNT)
    }
}
impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Twist axis.
#[derive(
    Debug, Display, Copy, Clone, PartialEq, Eq, Hash, EnumIter, FromRepr, Serialize, Deserialize,
)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Axis {
    #[strum(serialize = "x")]
    X = 0,
    #[strum(serialize = "y")]
    Y = 1,
    #[strum(serialize = "z")]
    Z = 2,
}
impl Axis {
    /// Returns the axis with the given index, or an error if it is not in
    /// `0..=2`.
    pub fn from_index(index: u8) -> Result<Self, CubeError> {
        Self::from_repr(index).ok_or(CubeError::InvalidAxis(index))
    }
    /// Returns the axis index in `0..=2`.
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Face of the cube.
#[derive(
    Debug, Display, Copy, Clone, PartialEq, Eq, Hash, EnumIter, FromRepr, Serialize, Deserialize,
)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Face {
    R = 0,
    U = 1,
    F = 2,
    L = 3,
    D = 4,
    B = 5,
}
impl Face {
    /// Returns the axis perpendicular to the face.
    pub fn axis(self) -> Axis {
        match self {
            Face::R | Face::L => Axis::X,
            Face::U | Face::D => Axis::Y,
            Face::F | Face::B => Axis::Z,
        }
    }
    /// Returns the layer that turns when the face is twisted.
    pub fn layer(self) -> LayerMask {
        match self {
            Face::R | Face::U | Face::F => LayerMask::POSITIVE,
            Face::L | Face::D | Face::B => LayerMask::NEGATIVE,
        }
    }
    /// Returns the face with the same layer on the given axis.
    pub fn from_axis_layer(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, true) => Face::R,
            (Axis::Y, true) => Face::U,
            (Axis::Z, true) => Face::F,
            (Axis::X, false) => Face::L,
            (Axis::Y, false) => Face::D,
            (Axis::Z, false) => Face::B,
        }
    }
    /// Returns the four-cycle of locations and orientation increments for a
    /// clockwise quarter turn of the face.
    pub(crate) fn cycle(self) -> ([usize; 4], [u8; 4]) {
        match self {
            Face::R => ([0, 1, 3, 2], [1, 2, 1, 2]),
            Face::U => ([0, 2, 4, 6], [0, 0, 0, 0]),
            Face::F => ([6, 7, 1, 0], [1, 2, 1, 2]),
            Face::L => ([6, 4, 5, 7], [2, 1, 2, 1]),
            Face::D => ([7, 5, 3, 1], [0, 0, 0, 0]),
            Face::B => ([2, 3, 5, 4], [1, 2, 1, 2]),
        }
    }
    /// Returns the corner locations in the layer behind the face.
    pub fn corner_locations(self) -> [Location; 4] {
        let ids = match self {
            Face::R => [0, 1, 2, 3],
            Face::L => [4, 5, 6, 7],
            Face::U => [0, 2, 4, 6],
            Face::D => [1, 3, 5, 7],
            Face::F => [0, 1, 6, 7],
            Face::B => [2, 3, 4, 5],
        };
        ids.map(Location)
    }
}

/// Bitmask of layers along an axis. Bit 0 is the left/down/back layer and
/// bit 1 is the right/up/front layer.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u8);
impl LayerMask {
    /// Left, down, or back layer.
    pub const NEGATIVE: Self = Self(1);
    /// Right, up, or front layer.
    pub const POSITIVE: Self = Self(2);
    /// Both layers, which rotates the whole cube.
    pub const ALL: Self = Self(3);

    /// Returns the layer mask, or an error if it has bits other than the two
    /// layers.
    pub fn new(bits: u8) -> Result<Self, CubeError> {
        if bits <= Self::ALL.0 {
            Ok(Self(bits))
        } else {
            Err(CubeError::InvalidLayerMask(bits))
        }
    }
    /// Returns whether the mask includes every layer.
    pub fn is_all(self) -> bool {
        self == Self::ALL
    }
    /// Returns whether the mask is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}
impl BitAnd for LayerMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}
