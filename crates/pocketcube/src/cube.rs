use std::sync::{Arc, mpsc};

use itertools::Itertools;
use parking_lot::{Mutex, MutexGuard};
use smallvec::SmallVec;

use crate::{
    CORNER_COUNT, CubeError, CubeEvent, Face, Location, Orientation, PART_COUNT, Part,
    PartPlacement, Subscribers, Twist, TwistEvent,
};

/// State of a Pocket Cube.
///
/// Tables are indexed by location: `corner_loc[l]` is the corner part at
/// location `l` and `corner_orient[l]` is its orientation.
#[derive(Debug)]
pub struct PocketCube {
    corner_loc: [Part; CORNER_COUNT],
    corner_orient: [Orientation; CORNER_COUNT],
    subscribers: Subscribers<CubeEvent>,
}

impl Default for PocketCube {
    fn default() -> Self {
        Self::new()
    }
}

impl PocketCube {
    /// Constructs a solved cube.
    pub fn new() -> Self {
        Self {
            corner_loc: std::array::from_fn(|i| Part(i as u8)),
            corner_orient: [Orientation::ZERO; CORNER_COUNT],
            subscribers: Subscribers::new(),
        }
    }

    /// Returns a channel that receives every subsequent event.
    pub fn subscribe(&mut self) -> mpsc::Receiver<CubeEvent> {
        self.subscribers.subscribe()
    }

    /// Applies a twist and notifies subscribers. Twists with no effect do
    /// nothing and send no event.
    pub fn twist(&mut self, twist: Twist) -> Result<(), CubeError> {
        // Fields are public, so check them again.
        let twist = Twist::new(twist.axis.index(), twist.layers.0, twist.angle)?;
        if twist.is_identity() {
            return Ok(());
        }

        // Left/down/back layer first, then right/up/front.
        for positive in [false, true] {
            let face = Face::from_axis_layer(twist.axis, positive);
            if let Some(quarter_turns) = twist.face_quarter_turns(face) {
                for _ in 0..quarter_turns {
                    self.twist_face(face);
                }
            }
        }
        log::trace!("twisted {twist}");

        let affected = twist
            .affected_locations()
            .into_iter()
            .map(|loc| self.placement(loc))
            .collect();
        self.subscribers
            .send(CubeEvent::Twisted(TwistEvent { twist, affected }));
        Ok(())
    }

    /// Applies a twist given as raw axis, layer mask, and angle. See
    /// [`Twist::new()`].
    pub fn transform(&mut self, axis: u8, layers: u8, angle: i8) -> Result<(), CubeError> {
        self.twist(Twist::new(axis, layers, angle)?)
    }

    /// Applies a clockwise quarter turn of a face.
    fn twist_face(&mut self, face: Face) {
        let ([l1, l2, l3, l4], [o1, o2, o3, o4]) = face.cycle();

        let loc = &mut self.corner_loc;
        let swap = loc[l1];
        loc[l1] = loc[l2];
        loc[l2] = loc[l3];
        loc[l3] = loc[l4];
        loc[l4] = swap;

        let orient = &mut self.corner_orient;
        let swap = orient[l1];
        orient[l1] = orient[l2].twisted(o1);
        orient[l2] = orient[l3].twisted(o2);
        orient[l3] = orient[l4].twisted(o3);
        orient[l4] = swap.twisted(o4);
    }

    /// Returns the part at a location.
    pub fn part_at(&self, location: Location) -> Part {
        match self.corner_loc.get(location.to_usize()) {
            Some(&part) => part,
            None => Part::CENTER,
        }
    }
    /// Returns the location of a part.
    pub fn part_location(&self, part: Part) -> Location {
        match self.corner_loc.iter().position(|&p| p == part) {
            Some(i) => Location(i as u8),
            None => Location::CENTER,
        }
    }
    /// Returns the orientation of a part within its location. The center
    /// always has orientation zero.
    pub fn part_orientation(&self, part: Part) -> Orientation {
        self.orientation_at(self.part_location(part))
    }
    /// Returns the orientation of the part at a location.
    pub fn orientation_at(&self, location: Location) -> Orientation {
        self.corner_orient
            .get(location.to_usize())
            .copied()
            .unwrap_or_default()
    }
    /// Returns the part at a location and its orientation.
    pub fn placement(&self, location: Location) -> PartPlacement {
        PartPlacement {
            location,
            part: self.part_at(location),
            orientation: self.orientation_at(location),
        }
    }
    /// Returns the placement of every location, including the center.
    pub fn placements(&self) -> SmallVec<[PartPlacement; PART_COUNT]> {
        Location::iter().map(|l| self.placement(l)).collect()
    }

    /// Returns whether every part is at its home location with orientation
    /// zero.
    pub fn is_solved(&self) -> bool {
        Location::corners().all(|l| {
            self.part_at(l) == Part(l.0) && self.orientation_at(l) == Orientation::ZERO
        })
    }

    /// Resets the cube to the solved state and notifies subscribers.
    pub fn reset(&mut self) {
        self.corner_loc = std::array::from_fn(|i| Part(i as u8));
        self.corner_orient = [Orientation::ZERO; CORNER_COUNT];
        self.subscribers.send(CubeEvent::Changed);
    }

    /// Replaces the whole state and notifies subscribers.
    ///
    /// `parts[l]` is the corner part at location `l` and `orientations[l]`
    /// is its orientation code. Returns an error and leaves the cube
    /// unchanged if `parts` is not a permutation of the corners or an
    /// orientation code is not in `0..3`.
    pub fn set_state(&mut self, parts: &[u8], orientations: &[u8]) -> Result<(), CubeError> {
        if parts.len() != CORNER_COUNT || orientations.len() != CORNER_COUNT {
            return Err(CubeError::InvalidState(format!(
                "expected {CORNER_COUNT} parts and orientations; got {} and {}",
                parts.len(),
                orientations.len(),
            )));
        }
        let parts = parts
            .iter()
            .map(|&id| Part::new(id))
            .collect::<Result<SmallVec<[Part; CORNER_COUNT]>, _>>()?;
        if !parts.iter().copied().sorted().eq(Part::corners()) {
            return Err(CubeError::InvalidState(format!(
                "{parts:?} is not a permutation of the corners",
            )));
        }
        let mut corner_orient = [Orientation::ZERO; CORNER_COUNT];
        for (o, &code) in corner_orient.iter_mut().zip(orientations) {
            *o = Orientation::from_code(code).ok_or_else(|| {
                CubeError::InvalidState(format!("invalid orientation code {code}"))
            })?;
        }

        self.corner_loc = std::array::from_fn(|i| parts[i]);
        self.corner_orient = corner_orient;
        self.subscribers.send(CubeEvent::Changed);
        Ok(())
    }
}

/// Handle to a cube that can be shared between threads.
///
/// The mutex is the model lock: anything that reads the cube in order to
/// present it holds the lock for the duration of the read.
#[derive(Debug, Default, Clone)]
pub struct SharedCube(Arc<Mutex<PocketCube>>);
impl From<PocketCube> for SharedCube {
    fn from(cube: PocketCube) -> Self {
        Self::new(cube)
    }
}
impl SharedCube {
    /// Wraps a cube.
    pub fn new(cube: PocketCube) -> Self {
        Self(Arc::new(Mutex::new(cube)))
    }
    /// Locks the cube.
    pub fn lock(&self) -> MutexGuard<'_, PocketCube> {
        self.0.lock()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::Axis;

    fn state(cube: &PocketCube) -> (Vec<u8>, Vec<u8>) {
        (
            cube.corner_loc.iter().map(|p| p.0).collect(),
            cube.corner_orient.iter().map(|o| o.code()).collect(),
        )
    }

    #[test]
    fn test_r_twist() {
        let mut cube = PocketCube::new();
        cube.twist(Twist::R).unwrap();
        assert_eq!(
            state(&cube),
            (vec![1, 3, 0, 2, 4, 5, 6, 7], vec![1, 2, 2, 1, 0, 0, 0, 0]),
        );
        assert_eq!(cube.part_location(Part(0)), Location(2));
        assert_eq!(cube.part_orientation(Part(0)).code(), 2);
        assert_eq!(cube.part_at(Location::CENTER), Part::CENTER);
    }

    #[test]
    fn test_negative_layer_directions() {
        // One quarter turn of the left layer at angle -1, three at +1.
        let mut a = PocketCube::new();
        a.transform(0, 1, -1).unwrap();
        let mut b = PocketCube::new();
        b.twist(Twist::L).unwrap();
        assert_eq!(state(&a), state(&b));

        let mut c = PocketCube::new();
        c.transform(0, 1, 1).unwrap();
        let mut d = PocketCube::new();
        for _ in 0..3 {
            d.twist(Twist::L).unwrap();
        }
        assert_eq!(state(&c), state(&d));
        assert!(!c.is_solved());
    }

    #[test]
    fn test_face_twists_have_order_four() {
        for face in Face::iter() {
            let mut cube = PocketCube::new();
            for i in 0..4 {
                assert_eq!(cube.is_solved(), i == 0, "{face} after {i} turns");
                cube.twist(Twist::face(face, 1)).unwrap();
            }
            assert!(cube.is_solved());
        }
    }

    #[test]
    fn test_half_turn_directions_agree() {
        for axis in Axis::iter() {
            for layers in 1..=3 {
                let mut a = PocketCube::new();
                a.transform(axis.index(), layers, 2).unwrap();
                let mut b = PocketCube::new();
                b.transform(axis.index(), layers, -2).unwrap();
                assert_eq!(state(&a), state(&b));
            }
        }
    }

    #[test]
    fn test_whole_cube_rotation_is_both_layers() {
        let mut a = PocketCube::new();
        a.transform(1, 3, 1).unwrap();
        let mut b = PocketCube::new();
        b.transform(1, 1, 1).unwrap();
        b.transform(1, 2, 1).unwrap();
        assert_eq!(state(&a), state(&b));
    }

    #[test]
    fn test_invalid_twist_leaves_state() {
        let mut cube = PocketCube::new();
        let events = cube.subscribe();
        assert_eq!(cube.transform(5, 1, 1), Err(CubeError::InvalidAxis(5)));
        assert_eq!(cube.transform(0, 7, 1), Err(CubeError::InvalidLayerMask(7)));
        assert_eq!(cube.transform(0, 1, 3), Err(CubeError::InvalidAngle(3)));
        assert!(cube.is_solved());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_events() {
        let mut cube = PocketCube::new();
        let events = cube.subscribe();

        cube.transform(0, 2, 0).unwrap();
        assert!(events.try_recv().is_err());

        cube.twist(Twist::U).unwrap();
        let Ok(CubeEvent::Twisted(e)) = events.try_recv() else {
            panic!("expected twist event");
        };
        assert_eq!(e.twist, Twist::U);
        let locations = e.affected.iter().map(|p| p.location.0).collect::<Vec<_>>();
        assert_eq!(locations, [0, 2, 4, 6]);
        for p in &e.affected {
            assert_eq!(*p, cube.placement(p.location));
        }

        cube.twist(Twist::whole_cube(Axis::X, 1)).unwrap();
        let Ok(CubeEvent::Twisted(e)) = events.try_recv() else {
            panic!("expected twist event");
        };
        assert_eq!(e.affected.len(), 9);
        assert_eq!(e.affected[8].part, Part::CENTER);

        cube.reset();
        assert_eq!(events.try_recv(), Ok(CubeEvent::Changed));
        assert!(cube.is_solved());
    }

    #[test]
    fn test_set_state() {
        let mut cube = PocketCube::new();
        cube.set_state(&[1, 0, 2, 3, 4, 5, 6, 7], &[0, 0, 0, 0, 1, 2, 0, 0])
            .unwrap();
        assert_eq!(cube.part_at(Location(0)), Part(1));
        assert_eq!(cube.orientation_at(Location(5)).code(), 2);

        let before = state(&cube);
        assert!(cube.set_state(&[0, 0, 2, 3, 4, 5, 6, 7], &[0; 8]).is_err());
        assert!(cube.set_state(&[0, 1, 2, 3, 4, 5, 6, 8], &[0; 8]).is_err());
        assert_eq!(
            cube.set_state(&[0, 1, 2, 3, 4, 5, 6, 9], &[0; 8]),
            Err(CubeError::InvalidPart(9)),
        );
        assert!(cube.set_state(&[0, 1, 2, 3, 4, 5, 6, 7], &[3; 8]).is_err());
        assert!(cube.set_state(&[0, 1, 2], &[0; 3]).is_err());
        assert_eq!(state(&cube), before);
    }

    #[test]
    fn test_shared_cube() {
        let shared = SharedCube::default();
        let other = shared.clone();
        std::thread::spawn(move || other.lock().twist(Twist::F))
            .join()
            .unwrap()
            .unwrap();
        assert!(!shared.lock().is_solved());
    }

    fn twist_strategy() -> impl Strategy<Value = Twist> {
        (0..3_u8, 0..4_u8, -2..=2_i8).prop_map(|(a, l, n)| Twist::new(a, l, n).unwrap())
    }

    proptest! {
        #[test]
        fn proptest_inverse_restores_state(twists in prop::collection::vec(twist_strategy(), 0..20)) {
            let mut cube = PocketCube::new();
            for &t in &twists {
                cube.twist(t).unwrap();
            }
            for &t in twists.iter().rev() {
                cube.twist(t.inverse()).unwrap();
            }
            prop_assert!(cube.is_solved());
        }

        #[test]
        fn proptest_orientation_sum_is_preserved(twists in prop::collection::vec(twist_strategy(), 0..20)) {
            let mut cube = PocketCube::new();
            for &t in &twists {
                cube.twist(t).unwrap();
            }
            let sum: u8 = cube.corner_orient.iter().map(|o| o.code()).sum();
            prop_assert_eq!(sum % 3, 0);
            prop_assert!(Location::corners().map(|l| cube.part_at(l)).sorted().eq(Part::corners()));
        }
    }
}
