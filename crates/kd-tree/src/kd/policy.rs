//! Split-axis selection strategies for KD-tree construction.
//!
//! The choice of split axis materially changes tree shape. One selector is
//! used for an entire build, so the policy is applied consistently from the
//! root down.

use crate::{Aabb, Axis};

/// Strategy for choosing the axis a node splits on.
///
/// The split position is always the midpoint of the node's bounds along the
/// chosen axis (spatial median); only the axis choice is pluggable.
pub trait AxisSelector {
    /// Chooses the split axis for a node at recursion depth `depth` (root is
    /// depth 0) with the given tight bounds.
    fn select(&self, depth: usize, bounds: &Aabb) -> Axis;
}

/// Selects the axis along which the node's bounds are widest.
///
/// This is the default policy: halving the dominant extent shrinks child
/// regions fastest and adapts to elongated triangle distributions.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestExtent;

impl AxisSelector for LongestExtent {
    fn select(&self, _depth: usize, bounds: &Aabb) -> Axis {
        bounds.longest_axis()
    }
}

/// Cycles x -> y -> z by recursion depth, starting at x for the root.
///
/// Cheaper than measuring extents and independent of the geometry, but can
/// waste levels splitting an axis the node is already thin along.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl AxisSelector for RoundRobin {
    fn select(&self, depth: usize, _bounds: &Aabb) -> Axis {
        Axis::from_index(depth)
    }
}
