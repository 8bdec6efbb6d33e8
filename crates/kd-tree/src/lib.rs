//! KD-tree spatial index over triangles.
//!
//! Accelerates nearest-intersection queries (ray casting) by recursively
//! partitioning space with axis-aligned splitting planes. Triangles are
//! assigned whole to the side their centroid falls on, so the leaves always
//! partition the input set exactly; a flattening pass produces a
//! pointer-free array layout for the traversal consumer.

mod aabb;
mod triangle;

pub mod kd;

pub use aabb::{Aabb, Axis};
pub use kd::{
    AxisSelector, BuildConfig, FlatKdTree, FlatNode, FlatTriangle, KdNode, KdTree, LongestExtent,
    NodeId, RoundRobin, StackUnderflow, TraversalStack, INVALID_ID,
};
pub use triangle::Triangle;
