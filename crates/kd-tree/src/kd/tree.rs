//! KD-tree container and construction.

use std::fmt;

use log::debug;
use nalgebra::Point3;

use crate::{Aabb, Triangle};

use super::node::{KdNode, NodeId};
use super::policy::{AxisSelector, LongestExtent};
use super::stack::TraversalStack;

/// Stopping thresholds for the recursive split.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig {
    /// Maximum recursion depth; nodes at this level always stay leaves.
    pub max_depth: usize,
    /// Nodes holding this many triangles or fewer are not split further.
    pub min_leaf_size: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            min_leaf_size: 1,
        }
    }
}

/// A KD-tree over a set of triangles.
///
/// The tree accelerates nearest-intersection queries (ray casting) by
/// recursively partitioning space with axis-aligned planes. Triangles are
/// assigned whole to the side their centroid falls on; they are never
/// clipped or duplicated, so the leaves partition the input set exactly.
///
/// # Construction
///
/// Trees are built from a collection of triangles using an
/// [`AxisSelector`] to choose splitting axes:
///
/// ```ignore
/// use kd_tree::{BuildConfig, KdTree, LongestExtent, Triangle};
///
/// let triangles: Vec<Triangle> = /* ... */;
/// let tree = KdTree::build(triangles, &LongestExtent, BuildConfig::default());
/// ```
///
/// # Storage
///
/// Nodes live in an arena indexed by [`NodeId`]; children and the non-owning
/// parent back-reference are ids, never pointers. The tree owns the triangle
/// collection and leaves hold indices into it. Dropping the tree frees every
/// node exactly once.
///
/// After construction the tree is read-only; it carries no per-node
/// traversal scratch state, so concurrent read-only traversal is safe.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    root: Option<NodeId>,
    triangles: Vec<Triangle>,
}

impl KdTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a KD-tree from a collection of triangles.
    ///
    /// Takes ownership of the triangles; their geometry is never mutated.
    /// Returns an empty tree if the input is empty. A `max_depth` of zero or
    /// a single-triangle input produces an immediate root leaf.
    pub fn build<S: AxisSelector>(
        triangles: Vec<Triangle>,
        selector: &S,
        config: BuildConfig,
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: None,
            triangles,
        };

        if tree.triangles.is_empty() {
            return tree;
        }

        let ids: Vec<u32> = (0..tree.triangles.len() as u32).collect();
        let bounds = tree.bounds_of(&ids);
        let root = tree.push_node(KdNode::leaf(bounds, None, ids));
        tree.root = Some(root);
        tree.split(root, 0, selector, &config);

        debug!(
            "kd-tree built: {} triangles across {} nodes ({} leaves), depth {}",
            tree.triangles.len(),
            tree.node_count(),
            tree.leaf_count(),
            tree.depth()
        );

        tree
    }

    /// Builds a KD-tree with the default axis policy ([`LongestExtent`]) and
    /// the default leaf threshold.
    pub fn from_triangles(triangles: Vec<Triangle>, max_depth: usize) -> Self {
        let config = BuildConfig {
            max_depth,
            ..BuildConfig::default()
        };
        Self::build(triangles, &LongestExtent, config)
    }

    /// Recursively splits a node until a stop condition holds.
    ///
    /// The split position is the midpoint of the node's bounds along the
    /// selected axis. A triangle goes left iff its centroid coordinate on
    /// that axis is less than the split position.
    fn split<S: AxisSelector>(
        &mut self,
        id: NodeId,
        depth: usize,
        selector: &S,
        config: &BuildConfig,
    ) {
        if depth >= config.max_depth {
            return;
        }

        let node = &self.nodes[id.index()];
        let tri_ids = node.triangle_ids();
        if tri_ids.len() <= config.min_leaf_size {
            return;
        }

        let bounds = *node.bounds();
        let axis = selector.select(depth, &bounds);
        let split_pos = bounds.center()[axis.index()];

        let mut left_ids = Vec::new();
        let mut right_ids = Vec::new();
        for &tri in tri_ids {
            if self.triangles[tri as usize].centroid()[axis.index()] < split_pos {
                left_ids.push(tri);
            } else {
                right_ids.push(tri);
            }
        }

        // A one-sided partition cannot make progress; the node stays a leaf.
        if left_ids.is_empty() || right_ids.is_empty() {
            return;
        }

        // Child bounds are computed fresh from each subset, not inherited as
        // half the parent's box, so they stay tight.
        let left_bounds = self.bounds_of(&left_ids);
        let right_bounds = self.bounds_of(&right_ids);
        let left = self.push_node(KdNode::leaf(left_bounds, Some(id), left_ids));
        let right = self.push_node(KdNode::leaf(right_bounds, Some(id), right_ids));
        self.nodes[id.index()].set_internal(axis, split_pos, left, right);

        self.split(left, depth + 1, selector, config);
        self.split(right, depth + 1, selector, config);
    }

    fn push_node(&mut self, node: KdNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Returns the union of the bounds of the given triangles, or the
    /// default box when the slice is empty.
    fn bounds_of(&self, ids: &[u32]) -> Aabb {
        ids.split_first().map_or_else(Aabb::default, |(&first, rest)| {
            let mut bounds = *self.triangles[first as usize].bounds();
            for &tri in rest {
                bounds.merge(self.triangles[tri as usize].bounds());
            }
            bounds
        })
    }

    /// Returns `true` if the tree contains no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the root node id, if any.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns a node by id.
    #[inline]
    pub fn node(&self, id: NodeId) -> &KdNode {
        &self.nodes[id.index()]
    }

    /// Returns the triangles owned by the tree, in input order.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns a triangle by the id stored in a leaf.
    #[inline]
    pub fn triangle(&self, id: u32) -> &Triangle {
        &self.triangles[id as usize]
    }

    /// Returns the total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the total number of triangles in the tree.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Iterates over the triangles held by a leaf.
    pub fn leaf_triangles(&self, id: NodeId) -> impl Iterator<Item = &Triangle> + '_ {
        self.node(id)
            .triangle_ids()
            .iter()
            .map(move |&tri| &self.triangles[tri as usize])
    }

    /// Returns the number of triangles in the subtree rooted at `id`.
    pub fn subtree_triangle_count(&self, id: NodeId) -> usize {
        let node = self.node(id);
        match (node.left(), node.right()) {
            (Some(left), Some(right)) => {
                self.subtree_triangle_count(left) + self.subtree_triangle_count(right)
            }
            _ => node.triangle_count(),
        }
    }

    /// Collects the triangle ids held by every leaf, in depth-first order.
    ///
    /// Since triangles are assigned whole and never duplicated, the result
    /// is a permutation of the input ids.
    pub fn collect_triangle_ids(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.triangles.len());
        let Some(root) = self.root else {
            return out;
        };

        let mut stack = TraversalStack::new();
        stack.push(root);
        while let Ok(id) = stack.pop() {
            let node = self.node(id);
            match (node.left(), node.right()) {
                (Some(left), Some(right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                _ => out.extend_from_slice(node.triangle_ids()),
            }
        }
        out
    }

    /// Returns the level of a node: the number of edges between it and the
    /// root. The root is at level 0.
    pub fn level(&self, id: NodeId) -> usize {
        let mut level = 0;
        let mut current = id;
        while let Some(parent) = self.node(current).parent() {
            level += 1;
            current = parent;
        }
        level
    }

    /// Follows parent references upward from a node and returns the root.
    ///
    /// Cost is proportional to the node's level.
    pub fn root_from(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.node(current).parent() {
            current = parent;
        }
        current
    }

    /// Returns the height of the tree in nodes: 0 for an empty tree, 1 for
    /// a lone root leaf. Equals the deepest node's [`level`](Self::level)
    /// plus one.
    pub fn depth(&self) -> usize {
        self.root.map_or(0, |root| self.subtree_depth(root))
    }

    fn subtree_depth(&self, id: NodeId) -> usize {
        let node = self.node(id);
        match (node.left(), node.right()) {
            (Some(left), Some(right)) => {
                1 + self.subtree_depth(left).max(self.subtree_depth(right))
            }
            _ => 1,
        }
    }

    /// Recomputes every node's bounds bottom-up: a leaf's bounds become the
    /// union of its triangles' bounds, an internal node's the union of its
    /// children's. Restores the containment invariant after any bounds
    /// drift; returns the refreshed root bounds.
    pub fn refresh_bounds(&mut self) -> Option<Aabb> {
        let root = self.root?;
        Some(self.refresh_node_bounds(root))
    }

    fn refresh_node_bounds(&mut self, id: NodeId) -> Aabb {
        let node = self.node(id);
        let children = match (node.left(), node.right()) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        };

        let bounds = match children {
            Some((left, right)) => {
                let left_bounds = self.refresh_node_bounds(left);
                let right_bounds = self.refresh_node_bounds(right);
                Aabb::merged(left_bounds, right_bounds)
            }
            None => self.bounds_of(self.node(id).triangle_ids()),
        };

        self.nodes[id.index()].set_bounds(bounds);
        bounds
    }

    /// Iterates over the centroids of all stored triangles, in input order.
    pub fn triangle_centroids(&self) -> impl Iterator<Item = Point3<f32>> + '_ {
        self.triangles.iter().map(|t| t.centroid())
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        let node = self.node(id);
        let pad = "  ".repeat(indent);
        match (node.axis(), node.split_pos(), node.left(), node.right()) {
            (Some(axis), Some(split_pos), Some(left), Some(right)) => {
                writeln!(
                    f,
                    "{pad}node #{} {axis} = {split_pos} bounds {}",
                    id.index(),
                    node.bounds()
                )?;
                self.fmt_node(f, left, indent + 1)?;
                self.fmt_node(f, right, indent + 1)
            }
            _ => writeln!(
                f,
                "{pad}leaf #{} triangles {} bounds {}",
                id.index(),
                node.triangle_count(),
                node.bounds()
            ),
        }
    }
}

/// Indented depth-first dump of the tree, for diagnostics.
impl fmt::Display for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_node(f, root, 0),
            None => writeln!(f, "(empty kd-tree)"),
        }
    }
}
