//! Arena of transform nodes.

use std::fmt;
use std::ops::{Index, IndexMut};

use cubemath::Transform;
use smallvec::SmallVec;

/// ID of a node in a [`TransformTree`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);
impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.0)
    }
}
impl NodeId {
    fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// Node with a transform relative to its parent.
#[derive(Debug, Clone)]
pub struct Node {
    /// Name for debugging.
    pub label: String,
    /// Transform relative to the parent.
    pub local: Transform,
    /// Transform for normal vectors relative to the parent.
    ///
    /// All scaling is uniform, so this is kept equal to `local` by the scene.
    pub normal: Transform,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}
impl Node {
    /// Returns the parent node, or `None` for a root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    /// Returns the child nodes in the order they were added.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
    /// Sets both the local and normal transforms.
    pub fn set_transform(&mut self, t: Transform) {
        self.local = t;
        self.normal = t;
    }
}

/// Tree of transforms stored in a flat list, where each node's world
/// transform is its parent's world transform composed with its own local
/// transform.
#[derive(Debug, Default, Clone)]
pub struct TransformTree {
    nodes: Vec<Node>,
}

impl Index<NodeId> for TransformTree {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.to_usize()]
    }
}
impl IndexMut<NodeId> for TransformTree {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.nodes[index.to_usize()]
    }
}

impl TransformTree {
    /// Constructs an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with an identity transform and returns its ID.
    pub fn add(&mut self, parent: Option<NodeId>, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            label: label.into(),
            local: Transform::identity(),
            normal: Transform::identity(),
            parent,
            children: SmallVec::new(),
        });
        if let Some(p) = parent {
            self[p].children.push(id);
        }
        id
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    /// Returns whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    /// Returns the chain of nodes from the root down to `id`, inclusive.
    pub fn path_from_root(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut ret: SmallVec<[NodeId; 8]> =
            std::iter::successors(Some(id), |&n| self[n].parent).collect();
        ret.reverse();
        ret
    }

    /// Returns the transform from the node's local space to the root's
    /// parent space.
    pub fn world(&self, id: NodeId) -> Transform {
        self.path_from_root(id)
            .iter()
            .fold(Transform::identity(), |acc, &n| acc * self[n].local)
    }
    /// Returns the normal transform from the node's local space to the
    /// root's parent space.
    pub fn normal_world(&self, id: NodeId) -> Transform {
        self.path_from_root(id)
            .iter()
            .fold(Transform::identity(), |acc, &n| acc * self[n].normal)
    }
}

#[cfg(test)]
mod tests {
    use cubemath::cgmath::point3;
    use cubemath::{HALF_PI, assert_approx_eq};

    use super::*;

    #[test]
    fn test_structure() {
        let mut tree = TransformTree::new();
        let root = tree.add(None, "root");
        let a = tree.add(Some(root), "a");
        let b = tree.add(Some(root), "b");
        let c = tree.add(Some(a), "c");

        assert_eq!(tree.len(), 4);
        assert_eq!(tree[root].children(), [a, b]);
        assert_eq!(tree[c].parent(), Some(a));
        assert_eq!(tree[root].parent(), None);
        assert_eq!(tree.path_from_root(c).as_slice(), [root, a, c]);
    }

    #[test]
    fn test_world_composes_parent_first() {
        let mut tree = TransformTree::new();
        let root = tree.add(None, "root");
        let child = tree.add(Some(root), "child");
        tree[root].set_transform(Transform::translation(10.0, 0.0, 0.0));
        tree[child].set_transform(Transform::rotation(0.0, 0.0, HALF_PI));

        // The child's rotation applies first, then the root's translation.
        let p = tree.world(child).transform_point(point3(1.0, 0.0, 0.0));
        assert_approx_eq!(p, point3(10.0, -1.0, 0.0));
        assert_approx_eq!(tree.normal_world(child), tree.world(child));

        tree[child].normal = Transform::identity();
        assert_approx_eq!(tree.normal_world(child), Transform::translation(10.0, 0.0, 0.0));
    }
}
