//! KD-tree nodes and their arena identifiers.

use std::cmp::Ordering;

use crate::{Aabb, Axis};

/// Identifier of a node within a [`KdTree`](super::KdTree) arena.
///
/// Nodes reference each other by id instead of by pointer; the arena owns
/// every node, and the parent back-reference is never used for ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the arena index of the node.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the KD-tree.
///
/// A node is either a **leaf**, holding the ids of the triangles assigned to
/// its region, or an **internal** node, holding a splitting plane and
/// exactly two children. The two states are mutually exclusive by
/// construction: splitting a node moves its triangles into the children.
///
/// Every node's bounds contain the bounds of both children (internal) or of
/// all held triangles (leaf).
#[derive(Debug, Clone)]
pub struct KdNode {
    bounds: Aabb,
    parent: Option<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
enum NodeKind {
    /// Indices into the owning tree's triangle storage.
    Leaf { triangles: Vec<u32> },
    Internal {
        axis: Axis,
        split_pos: f32,
        left: NodeId,
        right: NodeId,
    },
}

impl KdNode {
    /// Creates an unsplit node holding the given triangle ids.
    pub(crate) fn leaf(bounds: Aabb, parent: Option<NodeId>, triangles: Vec<u32>) -> Self {
        Self {
            bounds,
            parent,
            kind: NodeKind::Leaf { triangles },
        }
    }

    /// Converts the node into an internal node, dropping its triangle list.
    pub(crate) fn set_internal(&mut self, axis: Axis, split_pos: f32, left: NodeId, right: NodeId) {
        self.kind = NodeKind::Internal {
            axis,
            split_pos,
            left,
            right,
        };
    }

    pub(crate) fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }

    /// Returns the tight bounds of this node's subtree.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Returns the parent id, or `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns `true` if the node holds triangles directly.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Returns the split axis of an internal node.
    #[inline]
    pub fn axis(&self) -> Option<Axis> {
        match self.kind {
            NodeKind::Internal { axis, .. } => Some(axis),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Returns the splitting-plane coordinate of an internal node.
    #[inline]
    pub fn split_pos(&self) -> Option<f32> {
        match self.kind {
            NodeKind::Internal { split_pos, .. } => Some(split_pos),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Returns the left child id of an internal node.
    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Internal { left, .. } => Some(left),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Returns the right child id of an internal node.
    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Internal { right, .. } => Some(right),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Returns the triangle ids held by this node.
    ///
    /// Empty for internal nodes: splitting moves every triangle into a
    /// child.
    #[inline]
    pub fn triangle_ids(&self) -> &[u32] {
        match &self.kind {
            NodeKind::Leaf { triangles } => triangles,
            NodeKind::Internal { .. } => &[],
        }
    }

    /// Returns the number of triangles held directly by this node.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_ids().len()
    }

    /// Compares two nodes by the volume of their bounds.
    ///
    /// See [`Aabb::cmp_volume`] for the ordering guarantees.
    pub fn cmp_volume(&self, other: &KdNode) -> Ordering {
        self.bounds.cmp_volume(&other.bounds)
    }
}
