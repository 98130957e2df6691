//! Display and animation attributes for the Pocket Cube view.
//!
//! Attributes are layered with the `config` crate: the built-in defaults,
//! then an optional user YAML file, then `CUBE_*` environment variables.

#[macro_use]
extern crate lazy_static;

mod attributes;
mod error;
pub mod interpolation;

pub use attributes::*;
pub use error::PrefsError;
pub use interpolation::{CubicBezier, InterpolateFn};
