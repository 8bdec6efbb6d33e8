//! Triangle primitive with cached centroid and bounds.

use nalgebra::{Point3, Vector3};

use crate::Aabb;

/// A triangle in 3D space, with optional per-vertex normals and an optional
/// material index.
///
/// The centroid and axis-aligned bounds are derived from the vertices and
/// cached. They are recomputed eagerly on construction and on every call to
/// [`set_vertices`](Triangle::set_vertices), so they are always consistent
/// with the current vertex values.
///
/// Degenerate triangles (zero area, coincident vertices, non-finite
/// coordinates) are legal inputs and produce degenerate but well-defined
/// bounds; [`is_degenerate`](Triangle::is_degenerate) distinguishes them for
/// callers that care.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f32>; 3],
    normals: Option<[Vector3<f32>; 3]>,
    material: Option<u32>,
    centroid: Point3<f32>,
    bounds: Aabb,
}

impl Triangle {
    /// Creates a new triangle from three vertex positions.
    ///
    /// The winding order determines the geometric normal direction via the
    /// right-hand rule: normal = (b - a) × (c - a).
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let vertices = [a, b, c];
        let (centroid, bounds) = derive(&vertices);
        Self {
            vertices,
            normals: None,
            material: None,
            centroid,
            bounds,
        }
    }

    /// Creates the degenerate single-point triangle at the uniform
    /// coordinate `value`.
    pub fn splat(value: f32) -> Self {
        let p = Point3::new(value, value, value);
        Self::new(p, p, p)
    }

    /// Attaches per-vertex shading normals, in vertex order.
    pub fn with_normals(
        mut self,
        na: Vector3<f32>,
        nb: Vector3<f32>,
        nc: Vector3<f32>,
    ) -> Self {
        self.normals = Some([na, nb, nc]);
        self
    }

    /// Attaches a material index.
    ///
    /// Resolving the index to shading parameters is owned by the consumer.
    pub fn with_material(mut self, material: u32) -> Self {
        self.material = Some(material);
        self
    }

    /// Replaces the three vertex positions, recomputing centroid and bounds.
    pub fn set_vertices(&mut self, a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) {
        self.vertices = [a, b, c];
        let (centroid, bounds) = derive(&self.vertices);
        self.centroid = centroid;
        self.bounds = bounds;
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>; 3] {
        &self.vertices
    }

    /// Returns the per-vertex shading normals, if any were attached.
    #[inline]
    pub fn normals(&self) -> Option<&[Vector3<f32>; 3]> {
        self.normals.as_ref()
    }

    /// Returns the material index, if any was attached.
    #[inline]
    pub fn material(&self) -> Option<u32> {
        self.material
    }

    /// Returns the cached centroid, the arithmetic mean of the vertices.
    #[inline]
    pub fn centroid(&self) -> Point3<f32> {
        self.centroid
    }

    /// Returns the cached axis-aligned bounds of the vertices.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Computes the (unnormalized) geometric normal of the triangle.
    ///
    /// The direction follows the right-hand rule based on vertex winding.
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        let ab = b - a;
        let ac = c - a;
        ab.cross(&ac)
    }

    /// Computes the area of the triangle (zero for degenerate input).
    pub fn area(&self) -> f32 {
        self.normal().norm() / 2.0
    }

    /// Returns `true` for degenerate geometry: non-finite coordinates or
    /// (near-)zero area.
    ///
    /// Such triangles are accepted everywhere in this crate and still
    /// produce well-defined bounds; this is the signal for callers that
    /// want to filter or report them.
    pub fn is_degenerate(&self) -> bool {
        let finite = self
            .vertices
            .iter()
            .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
        !finite || self.normal().norm() <= f32::EPSILON
    }
}

/// Computes the derived fields from a vertex triple.
fn derive(vertices: &[Point3<f32>; 3]) -> (Point3<f32>, Aabb) {
    let [a, b, c] = vertices;
    let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);

    let mut bounds = Aabb::from_point(*a);
    bounds.grow(*b);
    bounds.grow(*c);

    (centroid, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let tri = make_triangle([0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 3.0, 0.0]);
        assert_eq!(tri.centroid(), Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn bounds_are_componentwise_min_max() {
        let tri = make_triangle([1.0, -2.0, 0.5], [-1.0, 4.0, 0.0], [0.0, 1.0, 3.0]);
        let bounds = tri.bounds();
        assert_eq!(bounds.mins(), Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.maxs(), Point3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn centroid_lies_within_bounds() {
        let tri = make_triangle([0.0, 0.0, 0.0], [5.0, 1.0, 2.0], [2.0, 7.0, -3.0]);
        let bounds = tri.bounds();
        assert!(bounds.contains_point(tri.centroid()));
        for axis in 0..3 {
            assert!(bounds.mins()[axis] <= bounds.maxs()[axis]);
        }
    }

    #[test]
    fn set_vertices_recomputes_derived_fields() {
        let mut tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        tri.set_vertices(
            Point3::new(10.0, 10.0, 10.0),
            Point3::new(12.0, 10.0, 10.0),
            Point3::new(10.0, 12.0, 10.0),
        );
        assert_eq!(tri.centroid(), Point3::new(32.0 / 3.0, 32.0 / 3.0, 10.0));
        assert_eq!(tri.bounds().mins(), Point3::new(10.0, 10.0, 10.0));
        assert_eq!(tri.bounds().maxs(), Point3::new(12.0, 12.0, 10.0));
    }

    #[test]
    fn splat_is_a_zero_size_point() {
        let tri = Triangle::splat(1.5);
        assert_eq!(tri.bounds().size(), Vector3::zeros());
        assert_eq!(tri.centroid(), Point3::new(1.5, 1.5, 1.5));
        assert!(tri.is_degenerate());
    }

    #[test]
    fn zero_area_triangle_is_degenerate() {
        // Collinear vertices.
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(tri.is_degenerate());
        assert_eq!(tri.area(), 0.0);
        // Bounds are still well-defined.
        assert_eq!(tri.bounds().mins(), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(tri.bounds().maxs(), Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn non_finite_triangle_is_degenerate() {
        let tri = make_triangle([0.0, 0.0, 0.0], [f32::NAN, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(tri.is_degenerate());
    }

    #[test]
    fn regular_triangle_is_not_degenerate() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(!tri.is_degenerate());
        assert_eq!(tri.area(), 0.5);
    }

    #[test]
    fn normals_and_material_are_optional() {
        let plain = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(plain.normals().is_none());
        assert!(plain.material().is_none());

        let up = Vector3::new(0.0, 0.0, 1.0);
        let shaded = plain.clone().with_normals(up, up, up).with_material(7);
        assert_eq!(shaded.normals(), Some(&[up, up, up]));
        assert_eq!(shaded.material(), Some(7));
        // Geometry is unaffected.
        assert_eq!(shaded.centroid(), plain.centroid());
        assert_eq!(shaded.bounds(), plain.bounds());
    }
}
