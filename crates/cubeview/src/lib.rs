//! Animated transform tree for a Pocket Cube.
//!
//! A [`CubeView`] watches a [`pocketcube::SharedCube`] and keeps a
//! [`CubeScene`] in sync with it, animating every twist over time. Renderers
//! read part transforms from the scene and subscribe to [`ViewEvent`]s to
//! learn when to redraw.
//!
//! ```
//! use cubeprefs::CubeAttributes;
//! use cubeview::{Animator, CubeView, WaitMode};
//! use pocketcube::{SharedCube, Twist};
//!
//! let view = CubeView::new(
//!     SharedCube::default(),
//!     CubeAttributes::default(),
//!     Animator::synchronous(),
//! );
//! view.twist(Twist::R, WaitMode::Blocking)?;
//! assert!(!view.cube().lock().is_solved());
//! # Ok::<(), pocketcube::CubeError>(())
//! ```

pub mod animator;
mod notify;
pub mod scene;
pub mod tree;
pub mod twist;
mod view;

pub use animator::{AnimationHandle, Animator, Interpolator};
pub use notify::{ChangeNotifier, ViewEvent};
pub use scene::CubeScene;
pub use tree::{NodeId, TransformTree};
pub use twist::TwistAnimation;
pub use view::{CubeView, WaitMode};
