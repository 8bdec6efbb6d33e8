//! Pointer-free flattened mirror of a built tree.
//!
//! Traversal consumers (a ray caster walking the tree per pixel, or a GPU
//! kernel) want contiguous fixed-size records instead of pointer-chasing
//! through the arena. The flattening pass converts a [`KdTree`] into two
//! plain arrays: one of [`FlatNode`] records and one of [`FlatTriangle`]
//! records, with all triangles partitioned across leaves exactly once. Both
//! record types are `#[repr(C)]` plain-old-data, so a buffer of them can be
//! uploaded byte-for-byte.

use bytemuck::{Pod, Zeroable};

use crate::Triangle;

use super::node::NodeId;
use super::tree::KdTree;

/// Sentinel id standing in for an absent node reference.
pub const INVALID_ID: u32 = u32::MAX;

/// Fixed-size node record of the flattened tree.
///
/// Child and parent references are array indices; `INVALID_ID` replaces the
/// null pointer. Leaves reference the contiguous triangle range
/// `[tri_start, tri_start + tri_len)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatNode {
    /// Split axis as a coordinate index (x = 0); meaningful only for
    /// internal nodes.
    pub axis: u32,
    /// Splitting-plane coordinate along `axis`; zero for leaves.
    pub split_pos: f32,
    pub mins: [f32; 3],
    pub maxs: [f32; 3],
    pub id: u32,
    pub parent_id: u32,
    pub left_id: u32,
    pub right_id: u32,
    pub tri_start: u32,
    pub tri_len: u32,
}

impl FlatNode {
    /// Returns `true` if the record is a leaf (no children).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left_id == INVALID_ID
    }
}

/// Fixed-size triangle record of the flattened tree.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatTriangle {
    /// Vertex positions, in vertex order.
    pub positions: [[f32; 3]; 3],
    /// Vertex normals; zeroed when the source triangle carried none.
    pub normals: [[f32; 3]; 3],
    /// Material index; -1 when the source triangle carried none.
    pub material: i32,
}

impl From<&Triangle> for FlatTriangle {
    fn from(triangle: &Triangle) -> Self {
        let [a, b, c] = *triangle.vertices();
        let normals = triangle
            .normals()
            .map_or([[0.0; 3]; 3], |ns| [ns[0].into(), ns[1].into(), ns[2].into()]);
        Self {
            positions: [a.into(), b.into(), c.into()],
            normals,
            material: triangle.material().map_or(-1, |m| m as i32),
        }
    }
}

/// The flattened tree: one contiguous node array and one contiguous
/// triangle array.
///
/// Node ids are assigned in depth-first preorder, so the root is always
/// record 0. The pass preserves node count, the triangle partition, and
/// bounds values exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatKdTree {
    nodes: Vec<FlatNode>,
    triangles: Vec<FlatTriangle>,
}

impl FlatKdTree {
    /// Returns all node records, in preorder.
    #[inline]
    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    /// Returns all triangle records, partitioned by leaf.
    #[inline]
    pub fn triangles(&self) -> &[FlatTriangle] {
        &self.triangles
    }

    /// Returns `true` if the tree contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the root record, if any.
    #[inline]
    pub fn root(&self) -> Option<&FlatNode> {
        self.nodes.first()
    }

    /// Returns a node record by id.
    #[inline]
    pub fn node(&self, id: u32) -> &FlatNode {
        &self.nodes[id as usize]
    }

    /// Returns the triangle records referenced by a leaf.
    pub fn leaf_triangles(&self, node: &FlatNode) -> &[FlatTriangle] {
        let start = node.tri_start as usize;
        &self.triangles[start..start + node.tri_len as usize]
    }
}

impl KdTree {
    /// Flattens the tree into pointer-free arrays.
    ///
    /// Ids are assigned in depth-first preorder; each leaf's triangles are
    /// appended to one shared triangle array, so every input triangle
    /// appears in exactly one leaf's range.
    pub fn flatten(&self) -> FlatKdTree {
        let mut flat = FlatKdTree {
            nodes: Vec::with_capacity(self.node_count()),
            triangles: Vec::with_capacity(self.triangle_count()),
        };
        if let Some(root) = self.root() {
            self.flatten_node(root, INVALID_ID, &mut flat);
        }
        flat
    }

    /// Emits the record for `id`, recurses, then patches in the child ids
    /// the recursive calls produced.
    fn flatten_node(&self, id: NodeId, parent_id: u32, flat: &mut FlatKdTree) -> u32 {
        let node = self.node(id);
        let flat_id = flat.nodes.len() as u32;
        let bounds = node.bounds();

        flat.nodes.push(FlatNode {
            axis: node.axis().map_or(0, |axis| axis.index() as u32),
            split_pos: node.split_pos().unwrap_or(0.0),
            mins: bounds.mins().into(),
            maxs: bounds.maxs().into(),
            id: flat_id,
            parent_id,
            left_id: INVALID_ID,
            right_id: INVALID_ID,
            tri_start: 0,
            tri_len: 0,
        });

        match (node.left(), node.right()) {
            (Some(left), Some(right)) => {
                let left_id = self.flatten_node(left, flat_id, flat);
                let right_id = self.flatten_node(right, flat_id, flat);
                let record = &mut flat.nodes[flat_id as usize];
                record.left_id = left_id;
                record.right_id = right_id;
            }
            _ => {
                let start = flat.triangles.len() as u32;
                for triangle in self.leaf_triangles(id) {
                    flat.triangles.push(FlatTriangle::from(triangle));
                }
                let record = &mut flat.nodes[flat_id as usize];
                record.tri_start = start;
                record.tri_len = flat.triangles.len() as u32 - start;
            }
        }

        flat_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn make_triangle(x0: f32) -> Triangle {
        Triangle::new(
            Point3::new(x0, 0.0, 0.0),
            Point3::new(x0 + 1.0, 1.0, 0.0),
            Point3::new(x0 + 0.5, 0.5, 1.0),
        )
    }

    fn build_sample_tree() -> KdTree {
        let triangles: Vec<Triangle> = (0..6).map(|i| make_triangle(i as f32 * 1.5)).collect();
        KdTree::from_triangles(triangles, 4)
    }

    #[test]
    fn empty_tree_flattens_to_empty_arrays() {
        let flat = KdTree::new().flatten();
        assert!(flat.is_empty());
        assert!(flat.root().is_none());
        assert!(flat.triangles().is_empty());
    }

    #[test]
    fn node_count_is_preserved() {
        let tree = build_sample_tree();
        let flat = tree.flatten();
        assert_eq!(flat.nodes().len(), tree.node_count());
        assert_eq!(flat.triangles().len(), tree.triangle_count());
    }

    #[test]
    fn root_is_record_zero_with_no_parent() {
        let tree = build_sample_tree();
        let flat = tree.flatten();
        let root = flat.root().unwrap();
        assert_eq!(root.id, 0);
        assert_eq!(root.parent_id, INVALID_ID);
    }

    #[test]
    fn parent_child_links_are_consistent() {
        let flat = build_sample_tree().flatten();
        for node in flat.nodes() {
            if node.is_leaf() {
                assert_eq!(node.right_id, INVALID_ID);
            } else {
                assert_eq!(flat.node(node.left_id).parent_id, node.id);
                assert_eq!(flat.node(node.right_id).parent_id, node.id);
                assert_eq!(node.tri_len, 0);
            }
        }
    }

    #[test]
    fn leaf_ranges_tile_the_triangle_array() {
        let flat = build_sample_tree().flatten();

        // Preorder flattening appends leaf ranges left to right; together
        // they must cover the triangle array exactly once.
        let mut ranges: Vec<(u32, u32)> = flat
            .nodes()
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| (n.tri_start, n.tri_len))
            .collect();
        ranges.sort_unstable();

        let mut cursor = 0;
        for (start, len) in ranges {
            assert_eq!(start, cursor);
            assert!(len > 0);
            cursor += len;
        }
        assert_eq!(cursor as usize, flat.triangles().len());
    }

    #[test]
    fn round_trip_preserves_partition_and_bounds() {
        let tree = build_sample_tree();
        let flat = tree.flatten();

        // Walk both representations together and compare leaves.
        fn check(tree: &KdTree, id: NodeId, flat: &FlatKdTree, flat_id: u32) {
            let node = tree.node(id);
            let record = flat.node(flat_id);

            let mins: [f32; 3] = node.bounds().mins().into();
            let maxs: [f32; 3] = node.bounds().maxs().into();
            assert_eq!(record.mins, mins);
            assert_eq!(record.maxs, maxs);
            assert_eq!(record.is_leaf(), node.is_leaf());

            match (node.left(), node.right()) {
                (Some(left), Some(right)) => {
                    assert_eq!(record.axis as usize, node.axis().unwrap().index());
                    assert_eq!(record.split_pos, node.split_pos().unwrap());
                    check(tree, left, flat, record.left_id);
                    check(tree, right, flat, record.right_id);
                }
                _ => {
                    let expected: Vec<FlatTriangle> = tree
                        .leaf_triangles(id)
                        .map(FlatTriangle::from)
                        .collect();
                    assert_eq!(flat.leaf_triangles(record), expected.as_slice());
                }
            }
        }

        let root = tree.root().unwrap();
        check(&tree, root, &flat, 0);
    }

    #[test]
    fn triangle_records_carry_normals_and_material() {
        let up = Vector3::new(0.0, 1.0, 0.0);
        let shaded = make_triangle(0.0).with_normals(up, up, up).with_material(5);
        let plain = make_triangle(3.0);

        let flat_shaded = FlatTriangle::from(&shaded);
        assert_eq!(flat_shaded.normals[0], [0.0, 1.0, 0.0]);
        assert_eq!(flat_shaded.material, 5);
        assert_eq!(flat_shaded.positions[0], [0.0, 0.0, 0.0]);

        let flat_plain = FlatTriangle::from(&plain);
        assert_eq!(flat_plain.normals, [[0.0; 3]; 3]);
        assert_eq!(flat_plain.material, -1);
    }

    #[test]
    fn records_are_pod() {
        // The traversal consumer uploads these byte-for-byte.
        let flat = build_sample_tree().flatten();
        let node_bytes: &[u8] = bytemuck::cast_slice(flat.nodes());
        let tri_bytes: &[u8] = bytemuck::cast_slice(flat.triangles());
        assert_eq!(node_bytes.len(), flat.nodes().len() * size_of::<FlatNode>());
        assert_eq!(
            tri_bytes.len(),
            flat.triangles().len() * size_of::<FlatTriangle>()
        );
    }
}
