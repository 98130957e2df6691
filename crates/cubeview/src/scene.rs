//! Transform tree for a Pocket Cube.
//!
//! ```text
//! view ─ scale ─┬─ location[0] ─ explosion[0] ─ part[0]
//!               ├─ ...
//!               └─ location[8] ─ explosion[8] ─ part[8]
//! ```
//!
//! Each chain belongs to one part. The location node places the part in its
//! current slot, the explosion node pushes it outward from the center, and
//! the part node corrects for its orientation within the slot.

use cubemath::{Float, HALF_PI, PI, Transform};
use cubeprefs::CubeAttributes;
use pocketcube::{Location, Orientation, PART_COUNT, Part, PartPlacement};

use crate::tree::{NodeId, TransformTree};
use crate::twist::orientation_correction;

/// Scale that maps model units to view units.
pub const UNIT_SCALE: Float = 0.019 * 54.0 / (18.0 * 2.0);
/// Distance from the center to the corner of a closed cube, in model units.
pub const CORNER_OFFSET: Float = 9.0;

/// Returns the rest transform of a location, which rotates a part from the
/// up-front-left corner to that location.
pub fn location_identity(location: Location) -> Transform {
    let mut t = Transform::identity();
    match location.0 {
        0 => t.rotate(0.0, -HALF_PI, 0.0),
        1 => t.rotate(0.0, 0.0, PI),
        2 => t.rotate(0.0, PI, 0.0),
        3 => {
            t.rotate(0.0, 0.0, PI);
            t.rotate(0.0, -HALF_PI, 0.0);
        }
        4 => t.rotate(0.0, HALF_PI, 0.0),
        5 => t.rotate(PI, 0.0, 0.0),
        7 => {
            t.rotate(0.0, HALF_PI, 0.0);
            t.rotate(PI, 0.0, 0.0);
        }
        // 6 is the up-front-left corner itself; 8 is the center.
        _ => (),
    }
    t
}

/// Returns the explosion transform of a corner part, which moves it from
/// the center to the up-front-left corner at distance `shift`.
pub fn corner_explosion(shift: Float) -> Transform {
    let mut t = Transform::identity();
    t.rotate(HALF_PI, 0.0, 0.0);
    t.shift(-shift, shift, -shift);
    t
}

/// Transform tree for a Pocket Cube, with nodes for the view, the scale,
/// and every part.
#[derive(Debug, Clone)]
pub struct CubeScene {
    tree: TransformTree,
    view: NodeId,
    scale: NodeId,
    /// Nodes of each chain, indexed by part.
    location_nodes: [NodeId; PART_COUNT],
    explosion_nodes: [NodeId; PART_COUNT],
    part_nodes: [NodeId; PART_COUNT],
    /// Rest transforms, indexed by location.
    identities: [Transform; PART_COUNT],
}

impl CubeScene {
    /// Builds the tree with every part at its home location and applies the
    /// view, scale, and explosion from `attrs`.
    pub fn new(attrs: &CubeAttributes) -> Self {
        let mut tree = TransformTree::new();
        let view = tree.add(None, "view");
        let scale = tree.add(Some(view), "scale");

        let mut location_nodes = [view; PART_COUNT];
        let mut explosion_nodes = [view; PART_COUNT];
        let mut part_nodes = [view; PART_COUNT];
        for part in Part::iter() {
            let i = part.to_usize();
            location_nodes[i] = tree.add(Some(scale), format!("location {i}"));
            explosion_nodes[i] = tree.add(Some(location_nodes[i]), format!("explosion {i}"));
            part_nodes[i] = tree.add(Some(explosion_nodes[i]), format!("part {i}"));
        }

        let mut ret = Self {
            tree,
            view,
            scale,
            location_nodes,
            explosion_nodes,
            part_nodes,
            identities: std::array::from_fn(|i| location_identity(Location(i as u8))),
        };
        for location in Location::iter() {
            let placement = PartPlacement {
                location,
                part: Part(location.0),
                orientation: Orientation::ZERO,
            };
            ret.seat_part(placement, &Transform::identity());
        }
        ret.set_view_angles(attrs.alpha, attrs.beta);
        ret.set_scale_factor(attrs.scale_factor);
        ret.set_explosion(attrs.explosion_factor, &attrs.part_explosion);
        ret
    }

    /// Returns the underlying tree.
    pub fn tree(&self) -> &TransformTree {
        &self.tree
    }
    /// Returns the rest transform of a location.
    pub fn identity(&self, location: Location) -> &Transform {
        &self.identities[location.to_usize()]
    }
    /// Returns the node for a part's orientation correction. Geometry for
    /// the part hangs from this node.
    pub fn part_node(&self, part: Part) -> NodeId {
        self.part_nodes[part.to_usize()]
    }
    /// Returns the node that places a part in its location.
    pub fn location_node(&self, part: Part) -> NodeId {
        self.location_nodes[part.to_usize()]
    }
    /// Returns the node that pushes a part outward.
    pub fn explosion_node(&self, part: Part) -> NodeId {
        self.explosion_nodes[part.to_usize()]
    }

    /// Sets the view rotation. `alpha` tilts about the X axis and `beta`
    /// turns about the Y axis.
    pub fn set_view_angles(&mut self, alpha: Float, beta: Float) {
        let mut t = Transform::identity();
        t.rotate(0.0, beta, 0.0);
        t.rotate(-alpha, 0.0, 0.0);
        self.tree[self.view].set_transform(t);
    }

    /// Sets the scale of the whole cube relative to its natural size.
    pub fn set_scale_factor(&mut self, scale_factor: Float) {
        self.tree[self.scale].set_transform(Transform::scaling(UNIT_SCALE * scale_factor));
    }

    /// Pushes the corners apart. `factor` is in units of the corner offset;
    /// `part_explosion[p]` adds a further shift to part `p`. The center does
    /// not move.
    pub fn set_explosion(&mut self, factor: Float, part_explosion: &[Float; PART_COUNT]) {
        let base = CORNER_OFFSET + CORNER_OFFSET * factor;
        for part in Part::corners() {
            let shift = base + part_explosion[part.to_usize()];
            let node = self.explosion_node(part);
            self.tree[node].set_transform(corner_explosion(shift));
        }
        let center = self.explosion_node(Part::CENTER);
        self.tree[center].set_transform(Transform::identity());
    }

    /// Places a part in a location with the given orientation, then applies
    /// `rotation` to it about the center of the cube.
    pub fn seat_part(&mut self, placement: PartPlacement, rotation: &Transform) {
        let PartPlacement {
            location,
            part,
            orientation,
        } = placement;

        let correction = match part.is_center() {
            true => Transform::identity(),
            false => orientation_correction(orientation),
        };
        let part_node = self.part_node(part);
        self.tree[part_node].set_transform(correction);

        let mut t = *self.identity(location);
        t.transform(rotation);
        let location_node = self.location_node(part);
        self.tree[location_node].set_transform(t);
    }

    /// Returns the pose of a part relative to the center of the cube,
    /// ignoring the view and scale: location, then explosion, then
    /// orientation correction.
    pub fn part_pose(&self, part: Part) -> Transform {
        let t = &self.tree;
        t[self.location_node(part)].local
            * t[self.explosion_node(part)].local
            * t[self.part_node(part)].local
    }
    /// Returns the full transform of a part, including the view and scale.
    pub fn part_transform(&self, part: Part) -> Transform {
        self.tree.world(self.part_node(part))
    }
    /// Returns the full transform of every part, indexed by part.
    pub fn part_transforms(&self) -> [Transform; PART_COUNT] {
        std::array::from_fn(|i| self.part_transform(Part(i as u8)))
    }
}

#[cfg(test)]
mod tests {
    use cubemath::cgmath::{Point3, point3};
    use cubemath::{approx_eq, assert_approx_eq};
    use pocketcube::PocketCube;

    use super::*;

    fn attrs() -> CubeAttributes {
        CubeAttributes {
            alpha: 0.0,
            beta: 0.0,
            ..Default::default()
        }
    }

    fn corner_center(scene: &CubeScene, part: Part) -> Point3<Float> {
        scene.part_pose(part).origin()
    }

    #[test]
    fn test_home_positions() {
        let scene = CubeScene::new(&attrs());
        // Signs of (x, y, z) for each corner location; Z points to the back.
        let expected = [
            (1, 1, -1),
            (1, -1, -1),
            (1, 1, 1),
            (1, -1, 1),
            (-1, 1, 1),
            (-1, -1, 1),
            (-1, 1, -1),
            (-1, -1, -1),
        ];
        for (part, (x, y, z)) in Part::corners().zip(expected) {
            let p = corner_center(&scene, part);
            let sign = |v: Float| v.signum() as i32;
            assert_eq!((sign(p.x), sign(p.y), sign(p.z)), (x, y, z), "{part}");
            assert_approx_eq!(p.x.abs(), CORNER_OFFSET);
        }
        assert_approx_eq!(corner_center(&scene, Part::CENTER), point3(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rest_pose_is_identity_then_correction() {
        let mut cube = PocketCube::new();
        cube.set_state(&[3, 0, 6, 1, 7, 2, 5, 4], &[1, 2, 0, 1, 2, 0, 1, 2])
            .unwrap();
        let mut scene = CubeScene::new(&attrs());
        for p in cube.placements() {
            scene.seat_part(p, &Transform::identity());
        }
        for p in cube.placements() {
            let loc = scene.tree()[scene.location_node(p.part)].local;
            assert_approx_eq!(loc, *scene.identity(p.location));
            let part = scene.tree()[scene.part_node(p.part)].local;
            if p.part.is_center() {
                assert_approx_eq!(part, Transform::identity());
            } else {
                assert_approx_eq!(part, orientation_correction(p.orientation));
            }
        }
    }

    #[test]
    fn test_explosion() {
        let mut scene = CubeScene::new(&attrs());
        let mut part_explosion = [0.0; PART_COUNT];
        part_explosion[2] = 3.0;
        scene.set_explosion(1.0, &part_explosion);

        let p0 = corner_center(&scene, Part(0));
        assert_approx_eq!(p0.x.abs(), 18.0);
        let p2 = corner_center(&scene, Part(2));
        assert_approx_eq!(p2.x.abs(), 21.0);
        assert_approx_eq!(corner_center(&scene, Part::CENTER), point3(0.0, 0.0, 0.0));

        let node = scene.tree()[scene.explosion_node(Part(5))].local;
        assert_approx_eq!(node, corner_explosion(18.0));
        assert!(!approx_eq(&node, &corner_explosion(9.0)));
    }

    #[test]
    fn test_view_and_scale() {
        let mut scene = CubeScene::new(&attrs());
        scene.set_scale_factor(2.0);
        scene.set_view_angles(0.0, HALF_PI);
        let t = scene.part_transform(Part::CENTER);
        // Turning the view about Y by a quarter turn maps +X to -Z.
        assert_approx_eq!(
            t.transform_vector(cubemath::cgmath::vec3(1.0, 0.0, 0.0)),
            cubemath::cgmath::vec3(0.0, 0.0, -2.0 * UNIT_SCALE),
        );
        assert_eq!(scene.tree().len(), 2 + 3 * PART_COUNT);
        assert_eq!(scene.part_transforms().len(), PART_COUNT);
    }
}
