//! Twist animation.

use std::sync::Arc;

use cubemath::{Float, HALF_PI, Transform};
use cubeprefs::InterpolateFn;
use parking_lot::Mutex;
use pocketcube::{Axis, Orientation, PartPlacement, SharedCube, TwistEvent};
use smallvec::SmallVec;
use web_time::Duration;

use crate::animator::Interpolator;
use crate::notify::ChangeNotifier;
use crate::scene::CubeScene;

/// Returns the rotation that remains to be done of a twist by `angle`
/// quarter turns about `axis` once it is `progress` of the way done.
///
/// The rotation about X uses the angle as is; the rotations about Y and Z
/// use its negation.
///
/// At progress 0 this rotation takes a corner part back to its pre-twist
/// pose. The center has no tracked orientation, so during a whole-cube
/// rotation it starts from its identity rotated back by the full angle
/// rather than from its actual pre-twist pose.
pub fn twist_rotation(axis: Axis, angle: i8, progress: Float) -> Transform {
    let remaining = HALF_PI * angle as Float * (1.0 - progress);
    match axis {
        Axis::X => Transform::rotation(remaining, 0.0, 0.0),
        Axis::Y => Transform::rotation(0.0, -remaining, 0.0),
        Axis::Z => Transform::rotation(0.0, 0.0, -remaining),
    }
}

/// Returns the rotation of a corner part within its location for the given
/// orientation.
pub fn orientation_correction(orientation: Orientation) -> Transform {
    let mut t = Transform::identity();
    match orientation.code() {
        1 => t.rotate(-HALF_PI, 0.0, HALF_PI),
        2 => {
            t.rotate(0.0, 0.0, -HALF_PI);
            t.rotate(HALF_PI, 0.0, 0.0);
        }
        _ => (),
    }
    t
}

/// Animation of one twist, which rotates the affected parts from their
/// pre-twist pose to their post-twist pose.
///
/// Only corner parts are guaranteed to start exactly at their pre-twist
/// pose. See [`twist_rotation`].
#[derive(Debug)]
pub struct TwistAnimation {
    axis: Axis,
    angle: i8,
    /// Placement of each affected part after the twist.
    affected: SmallVec<[PartPlacement; 9]>,
    timespan: Duration,
    curve: InterpolateFn,

    cube: SharedCube,
    scene: Arc<Mutex<CubeScene>>,
    notifier: Arc<ChangeNotifier>,
}

impl TwistAnimation {
    /// Constructs an animation for a twist that the cube has already done.
    ///
    /// `quarter_turn_duration` is multiplied by the number of quarter turns.
    pub fn new(
        event: TwistEvent,
        quarter_turn_duration: Duration,
        curve: InterpolateFn,
        cube: SharedCube,
        scene: Arc<Mutex<CubeScene>>,
        notifier: Arc<ChangeNotifier>,
    ) -> Self {
        let TwistEvent { twist, affected } = event;
        Self {
            axis: twist.axis,
            angle: twist.angle,
            affected,
            timespan: quarter_turn_duration * twist.angle.unsigned_abs() as u32,
            curve,

            cube,
            scene,
            notifier,
        }
    }

    /// Returns the placements of the parts that move.
    pub fn affected(&self) -> &[PartPlacement] {
        &self.affected
    }
}

impl Interpolator for TwistAnimation {
    fn timespan(&self) -> Duration {
        self.timespan
    }

    fn curve(&self) -> InterpolateFn {
        self.curve
    }

    fn is_sequential(&self) -> bool {
        true
    }

    fn update(&mut self, progress: f32) {
        let rotation = twist_rotation(self.axis, self.angle, progress);
        {
            let _cube = self.cube.lock();
            let mut scene = self.scene.lock();
            for &placement in &self.affected {
                scene.seat_part(placement, &rotation);
            }
        }
        log::trace!(
            "twist on {} by {} at progress {progress}",
            self.axis,
            self.angle,
        );
        self.notifier.notify();
    }
}
