use std::sync::{Arc, mpsc};

use cubemath::{Float, Transform};
use cubeprefs::{CubeAttributes, PrefsError};
use parking_lot::{Mutex, MutexGuard};
use pocketcube::{CubeError, CubeEvent, PART_COUNT, Part, SharedCube, Twist, TwistEvent};
use web_time::Duration;

use crate::animator::{AnimationHandle, Animator};
use crate::notify::{ChangeNotifier, ViewEvent};
use crate::scene::CubeScene;
use crate::twist::TwistAnimation;

/// Whether to wait for an animation to finish.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WaitMode {
    /// Return as soon as the animation is dispatched.
    #[default]
    NonBlocking,
    /// Return once the animation has finished.
    Blocking,
}

/// Animated view of a shared cube.
///
/// The view listens to the cube's events. Twists made through
/// [`CubeView::twist()`] are animated right away; changes made to the cube
/// directly are animated on the next call to [`CubeView::process_events()`].
///
/// Locks are always taken in the same order: the view's event queue, then
/// the cube, then the scene. Do not call methods on the view while holding
/// the cube's lock.
#[derive(Debug)]
pub struct CubeView {
    cube: SharedCube,
    cube_events: Mutex<mpsc::Receiver<CubeEvent>>,
    scene: Arc<Mutex<CubeScene>>,
    notifier: Arc<ChangeNotifier>,
    attrs: Mutex<CubeAttributes>,
    animator: Animator,
}

impl CubeView {
    /// Constructs a view of `cube` that animates using `animator`.
    pub fn new(cube: SharedCube, attrs: CubeAttributes, animator: Animator) -> Self {
        let cube_events = cube.lock().subscribe();
        animator.set_dynamic_speed(attrs.dynamic_twist_speed);
        let ret = Self {
            scene: Arc::new(Mutex::new(CubeScene::new(&attrs))),
            cube,
            cube_events: Mutex::new(cube_events),
            notifier: Arc::new(ChangeNotifier::new()),
            attrs: Mutex::new(attrs),
            animator,
        };
        ret.sync_to_model();
        ret
    }

    /// Constructs a view of `cube` with an animator thread running at the
    /// frame rate from `attrs`.
    pub fn with_animator_thread(cube: SharedCube, attrs: CubeAttributes) -> Self {
        let animator = Animator::threaded(attrs.frame_rate);
        Self::new(cube, attrs, animator)
    }

    /// Returns the cube.
    pub fn cube(&self) -> &SharedCube {
        &self.cube
    }
    /// Returns the animator.
    pub fn animator(&self) -> &Animator {
        &self.animator
    }
    /// Locks and returns the scene.
    pub fn scene(&self) -> MutexGuard<'_, CubeScene> {
        self.scene.lock()
    }
    /// Returns a copy of the current attributes.
    pub fn attributes(&self) -> CubeAttributes {
        self.attrs.lock().clone()
    }

    /// Returns a channel that receives a notification every time the scene
    /// changes.
    pub fn subscribe(&self) -> mpsc::Receiver<ViewEvent> {
        self.notifier.subscribe()
    }
    /// Returns a number that increases every time the scene changes.
    pub fn revision(&self) -> u64 {
        self.notifier.revision()
    }

    /// Twists the cube and animates the twist.
    ///
    /// With [`WaitMode::Blocking`], returns once the animation has finished,
    /// or right away if called on the animator thread. Any earlier changes to
    /// the cube that have not been processed are animated first.
    pub fn twist(&self, twist: Twist, wait: WaitMode) -> Result<AnimationHandle, CubeError> {
        let handle = {
            let events = self.cube_events.lock();
            self.cube.lock().twist(twist)?;
            self.dispatch_events(&events)
        };
        let handle = handle.unwrap_or_else(AnimationHandle::finished);
        if wait == WaitMode::Blocking {
            self.animator.wait(&handle);
        }
        Ok(handle)
    }

    /// Animates every change made to the cube since the last call. Returns
    /// a handle for the last animation, if there were any.
    pub fn process_events(&self) -> Option<AnimationHandle> {
        let events = self.cube_events.lock();
        self.dispatch_events(&events)
    }

    fn dispatch_events(&self, events: &mpsc::Receiver<CubeEvent>) -> Option<AnimationHandle> {
        let mut last = None;
        for event in events.try_iter() {
            last = Some(match event {
                CubeEvent::Twisted(e) => self.animator.dispatch(self.twist_animation(e)),
                CubeEvent::Changed => {
                    self.animator.stop();
                    self.sync_to_model();
                    AnimationHandle::finished()
                }
            });
        }
        last
    }

    /// Returns the animation for a twist that the cube has already done,
    /// using the current attributes.
    pub fn twist_animation(&self, event: TwistEvent) -> TwistAnimation {
        let attrs = self.attrs.lock();
        let duration = Duration::try_from_secs_f32(attrs.twist_duration).unwrap_or_default();
        TwistAnimation::new(
            event,
            duration,
            attrs.twist_interpolation,
            self.cube.clone(),
            Arc::clone(&self.scene),
            Arc::clone(&self.notifier),
        )
    }

    /// Finishes every running and pending animation immediately.
    pub fn stop_animations(&self) {
        self.animator.stop();
    }

    /// Re-seats every part from the current state of the cube and notifies
    /// subscribers.
    ///
    /// This does not stop animations in progress, which will overwrite the
    /// parts they move on their next step.
    pub fn sync_to_model(&self) {
        {
            let cube = self.cube.lock();
            let mut scene = self.scene.lock();
            for placement in cube.placements() {
                scene.seat_part(placement, &Transform::identity());
            }
        }
        log::debug!("Synchronized view with cube");
        self.notifier.notify();
    }

    /// Sets how far the corners are pushed apart and notifies subscribers.
    pub fn set_explosion_factor(&self, explosion_factor: Float) -> Result<(), PrefsError> {
        self.update_attributes(|attrs| attrs.explosion_factor = explosion_factor)
    }
    /// Sets the extra outward shift of each part and notifies subscribers.
    pub fn set_part_explosion(
        &self,
        part_explosion: [Float; PART_COUNT],
    ) -> Result<(), PrefsError> {
        self.update_attributes(|attrs| attrs.part_explosion = part_explosion)
    }
    /// Sets the view rotation and notifies subscribers.
    pub fn set_view_angles(&self, alpha: Float, beta: Float) -> Result<(), PrefsError> {
        self.update_attributes(|attrs| {
            attrs.alpha = alpha;
            attrs.beta = beta;
        })
    }
    /// Sets the scale of the whole cube and notifies subscribers.
    pub fn set_scale_factor(&self, scale_factor: Float) -> Result<(), PrefsError> {
        self.update_attributes(|attrs| attrs.scale_factor = scale_factor)
    }
    /// Replaces all attributes and notifies subscribers. Twist timing
    /// changes apply to twists dispatched afterward.
    pub fn set_attributes(&self, new_attrs: CubeAttributes) -> Result<(), PrefsError> {
        self.update_attributes(|attrs| *attrs = new_attrs)
    }

    /// Modifies the attributes and applies them to the scene. If the new
    /// attributes are invalid, returns an error and changes nothing.
    fn update_attributes(&self, f: impl FnOnce(&mut CubeAttributes)) -> Result<(), PrefsError> {
        let mut attrs = self.attrs.lock();
        let mut new_attrs = attrs.clone();
        f(&mut new_attrs);
        new_attrs.validate()?;
        *attrs = new_attrs;

        self.animator.set_dynamic_speed(attrs.dynamic_twist_speed);
        {
            let mut scene = self.scene.lock();
            scene.set_view_angles(attrs.alpha, attrs.beta);
            scene.set_scale_factor(attrs.scale_factor);
            scene.set_explosion(attrs.explosion_factor, &attrs.part_explosion);
        }
        drop(attrs);

        self.notifier.notify();
        Ok(())
    }

    /// Returns the full transform of a part, including the view and scale.
    pub fn part_transform(&self, part: Part) -> Transform {
        self.scene.lock().part_transform(part)
    }
    /// Returns the full transform of every part, indexed by part.
    pub fn part_transforms(&self) -> [Transform; PART_COUNT] {
        self.scene.lock().part_transforms()
    }
}
