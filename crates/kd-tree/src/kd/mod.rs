//! KD-tree construction, flattening, and traversal support.
//!
//! This module provides a KD-tree that recursively partitions space with
//! axis-aligned planes chosen by a pluggable policy. The tree enables:
//!
//! - Accelerated nearest-intersection queries over triangle sets
//! - A pointer-free flattened layout for cache-coherent traversal
//! - Iterative descent with an explicit, bounded stack
//!
//! # Example
//!
//! ```ignore
//! use kd_tree::{KdTree, Triangle};
//!
//! // Build a tree from triangles
//! let triangles: Vec<Triangle> = /* create triangles */;
//! let tree = KdTree::from_triangles(triangles, 12);
//!
//! // Flatten it for the traversal consumer
//! let flat = tree.flatten();
//! let root = flat.root().unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`KdTree`]: the arena container owning nodes and triangles
//! - [`KdNode`]: one node, either a leaf holding triangle ids or an
//!   internal node holding a splitting plane and two children
//! - [`AxisSelector`]: strategy trait for choosing split axes
//! - [`FlatKdTree`]: the pointer-free mirror produced by flattening
//! - [`TraversalStack`]: explicit LIFO for iterative descent

mod flat;
mod node;
mod policy;
mod stack;
mod tree;

// Re-export main types
pub use flat::{FlatKdTree, FlatNode, FlatTriangle, INVALID_ID};
pub use node::{KdNode, NodeId};
pub use policy::{AxisSelector, LongestExtent, RoundRobin};
pub use stack::{StackUnderflow, TraversalStack};
pub use tree::{BuildConfig, KdTree};
