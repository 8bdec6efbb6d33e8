//! Axis-aligned bounding boxes and coordinate axes.

use std::cmp::Ordering;
use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::Triangle;

/// A coordinate axis in 3D space.
///
/// Used to name the splitting plane of an internal KD-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes, in coordinate order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the coordinate index of the axis (x = 0, y = 1, z = 2).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Returns the axis for a coordinate index, wrapping modulo 3.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }

    /// Returns the next axis in round-robin order (x -> y -> z -> x).
    #[inline]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// An axis-aligned bounding box, stored as per-axis minimum and maximum
/// coordinates.
///
/// `center` and `size` are derived quantities computed from the extents on
/// every call, so they can never disagree with `mins`/`maxs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    mins: Point3<f32>,
    maxs: Point3<f32>,
}

impl Default for Aabb {
    /// The zero-size box at the origin.
    fn default() -> Self {
        Self::from_point(Point3::origin())
    }
}

impl Aabb {
    /// Creates a box from explicit extents.
    ///
    /// Expects `mins[i] <= maxs[i]` for each axis; a degenerate box with
    /// equal extents is legal.
    pub fn new(mins: Point3<f32>, maxs: Point3<f32>) -> Self {
        debug_assert!(
            mins.x <= maxs.x && mins.y <= maxs.y && mins.z <= maxs.z,
            "Aabb extents must satisfy mins <= maxs"
        );
        Self { mins, maxs }
    }

    /// Creates the degenerate zero-size box containing a single point.
    #[inline]
    pub fn from_point(point: Point3<f32>) -> Self {
        Self {
            mins: point,
            maxs: point,
        }
    }

    /// Creates the degenerate box at the uniform coordinate `value`.
    #[inline]
    pub fn splat(value: f32) -> Self {
        Self::from_point(Point3::new(value, value, value))
    }

    /// Returns the per-axis minimum corner.
    #[inline]
    pub fn mins(&self) -> Point3<f32> {
        self.mins
    }

    /// Returns the per-axis maximum corner.
    #[inline]
    pub fn maxs(&self) -> Point3<f32> {
        self.maxs
    }

    /// Returns the midpoint of the box, `(mins + maxs) / 2` componentwise.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        Point3::from((self.mins.coords + self.maxs.coords) / 2.0)
    }

    /// Returns the per-axis extent of the box, `maxs - mins` componentwise.
    ///
    /// Always non-negative for a box built through this type's constructors.
    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.maxs - self.mins
    }

    /// Returns the extent of the box along one axis.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        self.size()[axis.index()]
    }

    /// Returns the axis along which the box is widest.
    ///
    /// Ties resolve to the earlier axis in coordinate order.
    pub fn longest_axis(&self) -> Axis {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            Axis::X
        } else if size.y >= size.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns the volume of the box (zero for degenerate boxes).
    #[inline]
    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Expands the box to contain a point.
    pub fn grow(&mut self, point: Point3<f32>) {
        self.mins = Point3::new(
            self.mins.x.min(point.x),
            self.mins.y.min(point.y),
            self.mins.z.min(point.z),
        );
        self.maxs = Point3::new(
            self.maxs.x.max(point.x),
            self.maxs.y.max(point.y),
            self.maxs.z.max(point.z),
        );
    }

    /// Expands the box in place to the union covering both boxes
    /// (componentwise min of mins, max of maxs).
    pub fn merge(&mut self, other: &Aabb) {
        self.grow(other.mins);
        self.grow(other.maxs);
    }

    /// Returns the union of two boxes.
    pub fn merged(mut a: Aabb, b: Aabb) -> Aabb {
        a.merge(&b);
        a
    }

    /// Returns `true` if the point lies inside the box (boundary included).
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.mins.x <= point.x
            && self.mins.y <= point.y
            && self.mins.z <= point.z
            && point.x <= self.maxs.x
            && point.y <= self.maxs.y
            && point.z <= self.maxs.z
    }

    /// Returns `true` if `other` lies entirely inside the box.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.contains_point(other.mins) && self.contains_point(other.maxs)
    }

    /// Compares two boxes by volume.
    ///
    /// This is the ordering key for boxes and the nodes carrying them.
    /// Uses [`f32::total_cmp`], so the ordering is total even when an extent
    /// is NaN (from non-finite input geometry).
    pub fn cmp_volume(&self, other: &Aabb) -> Ordering {
        self.volume().total_cmp(&other.volume())
    }
}

impl From<&Triangle> for Aabb {
    /// Copies the triangle's cached bounds.
    fn from(triangle: &Triangle) -> Self {
        *triangle.bounds()
    }
}

impl From<Triangle> for Aabb {
    fn from(triangle: Triangle) -> Self {
        *triangle.bounds()
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}, {}) .. ({}, {}, {})]",
            self.mins.x, self.mins.y, self.mins.z, self.maxs.x, self.maxs.y, self.maxs.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_size_at_origin() {
        let bounds = Aabb::default();
        assert_eq!(bounds.mins(), Point3::origin());
        assert_eq!(bounds.maxs(), Point3::origin());
        assert_eq!(bounds.size(), Vector3::zeros());
        assert_eq!(bounds.center(), Point3::origin());
        assert_eq!(bounds.volume(), 0.0);
    }

    #[test]
    fn center_and_size_follow_extents() {
        let bounds = Aabb::new(Point3::new(-1.0, 0.0, 2.0), Point3::new(3.0, 4.0, 2.0));
        assert_eq!(bounds.center(), Point3::new(1.0, 2.0, 2.0));
        assert_eq!(bounds.size(), Vector3::new(4.0, 4.0, 0.0));
        assert_eq!(bounds.extent(Axis::X), 4.0);
        assert_eq!(bounds.extent(Axis::Z), 0.0);
    }

    #[test]
    fn splat_is_degenerate() {
        let bounds = Aabb::splat(2.5);
        assert_eq!(bounds.size(), Vector3::zeros());
        assert_eq!(bounds.center(), Point3::new(2.5, 2.5, 2.5));
    }

    #[test]
    fn merge_takes_componentwise_union() {
        let mut a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(-1.0, 0.5, 0.5), Point3::new(0.5, 2.0, 0.75));
        a.merge(&b);
        assert_eq!(a.mins(), Point3::new(-1.0, 0.0, 0.0));
        assert_eq!(a.maxs(), Point3::new(1.0, 2.0, 1.0));

        let c = Aabb::merged(b, a);
        assert_eq!(c, a);
    }

    #[test]
    fn merge_contains_both_inputs() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(2.0, -1.0, 0.0), Point3::new(3.0, 0.5, 2.0));
        let union = Aabb::merged(a, b);
        assert!(union.contains(&a));
        assert!(union.contains(&b));
    }

    #[test]
    fn grow_is_idempotent_for_contained_points() {
        let mut bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let before = bounds;
        bounds.grow(Point3::new(0.5, 0.5, 0.5));
        assert_eq!(bounds, before);
    }

    #[test]
    fn longest_axis_picks_widest_extent() {
        let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 3.0, 2.0));
        assert_eq!(bounds.longest_axis(), Axis::Y);

        // Ties resolve to the earlier axis.
        let tied = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 1.0));
        assert_eq!(tied.longest_axis(), Axis::X);
    }

    #[test]
    fn volume_ordering() {
        let small = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let large = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
        assert_eq!(small.cmp_volume(&large), Ordering::Less);
        assert_eq!(large.cmp_volume(&small), Ordering::Greater);
        assert_eq!(small.cmp_volume(&small), Ordering::Equal);
    }

    #[test]
    fn axis_round_robin_cycles() {
        assert_eq!(Axis::X.next(), Axis::Y);
        assert_eq!(Axis::Y.next(), Axis::Z);
        assert_eq!(Axis::Z.next(), Axis::X);
        assert_eq!(Axis::from_index(4), Axis::Y);
        for (index, axis) in Axis::ALL.into_iter().enumerate() {
            assert_eq!(axis.index(), index);
            assert_eq!(Axis::from_index(index), axis);
        }
    }
}
