//! Pocket Cube (2x2x2) puzzle model.
//!
//! The model tracks which corner part occupies each corner location and how
//! it is twisted there. Every change is reported to subscribers as a
//! [`CubeEvent`] over a channel, so that views can animate it.
//!
//! ```
//! use pocketcube::{PocketCube, Twist};
//!
//! let mut cube = PocketCube::new();
//! let events = cube.subscribe();
//! cube.twist(Twist::R)?;
//! assert!(!cube.is_solved());
//! assert!(events.try_recv().is_ok());
//! # Ok::<(), pocketcube::CubeError>(())
//! ```

mod cube;
mod error;
mod event;
pub mod notation;
mod twist;
mod types;

pub use cube::{PocketCube, SharedCube};
pub use error::CubeError;
pub use event::{CubeEvent, PartPlacement, Subscribers, TwistEvent};
pub use notation::{NotationError, parse_moves};
pub use twist::Twist;
pub use types::{Axis, Face, LayerMask, Location, Orientation, Part};

/// Number of corner parts (and corner locations).
pub const CORNER_COUNT: usize = 8;
/// Number of parts including the center part.
pub const PART_COUNT: usize = CORNER_COUNT + 1;
