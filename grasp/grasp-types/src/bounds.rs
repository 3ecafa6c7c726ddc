//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Used both for mesh extents (normalization scale) and as the node volume
/// of the ray/closest-point acceleration structure.
///
/// # Example
///
/// ```
/// use grasp_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0));
/// assert!((aabb.diagonal() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Create a box from two corners, sorting each axis.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Create an empty (inverted) box, the identity for [`Aabb::merge`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point of the iterator.
    ///
    /// Returns an empty box for an empty iterator.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_to_include(p);
        }
        aabb
    }

    /// True if min > max on any axis.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to contain `point`.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Grow the box to contain `other`.
    pub fn merge(&mut self, other: &Self) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Box grown by `padding` on every side.
    #[must_use]
    pub fn padded(&self, padding: f64) -> Self {
        let pad = Vector3::repeat(padding);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Extent along each axis. Zero for an empty box.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the box diagonal, the "overall extent" of whatever it bounds.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// Index of the longest axis (0=X, 1=Y, 2=Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        self.size().imax()
    }

    /// Squared distance from `point` to the box (zero inside).
    #[must_use]
    pub fn distance_squared(&self, point: &Point3<f64>) -> f64 {
        let clamped = point.sup(&self.min).inf(&self.max);
        (point - clamped).norm_squared()
    }

    /// Slab test against a ray given its origin and component-wise inverse direction.
    ///
    /// Returns the entry/exit parameters clipped to `t >= 0`, or `None` on a miss.
    #[must_use]
    pub fn ray_intersect(&self, origin: &Point3<f64>, dir_inv: &Vector3<f64>) -> Option<(f64, f64)> {
        let t1 = (self.min - origin).component_mul(dir_inv);
        let t2 = (self.max - origin).component_mul(dir_inv);

        let t_min = t1.inf(&t2).max();
        let t_max = t1.sup(&t2).min();

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_box_has_zero_size() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_relative_eq!(aabb.diagonal(), 0.0);
    }

    #[test]
    fn from_points_bounds_everything() {
        let pts = [
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
        ];
        let aabb = Aabb::from_points(&pts);
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 4.0, 3.0));
        assert_eq!(aabb.longest_axis(), 1);
    }

    #[test]
    fn distance_squared_inside_is_zero() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(aabb.distance_squared(&Point3::new(0.5, 0.5, 0.5)), 0.0);
        assert_relative_eq!(aabb.distance_squared(&Point3::new(2.0, 0.5, 0.5)), 1.0);
    }

    #[test]
    fn ray_slab_hit_and_miss() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let dir_inv = Vector3::new(f64::MAX, f64::MAX, 1.0);

        let hit = aabb.ray_intersect(&Point3::new(0.5, 0.5, -1.0), &dir_inv);
        let (t_near, t_far) = hit.expect("ray along +z should hit");
        assert_relative_eq!(t_near, 1.0);
        assert_relative_eq!(t_far, 2.0);

        assert!(aabb.ray_intersect(&Point3::new(5.0, 5.0, -1.0), &dir_inv).is_none());
    }

    #[test]
    fn ray_starting_inside_clips_to_zero() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let dir_inv = Vector3::new(1.0, f64::MAX, f64::MAX);
        let (t_near, t_far) = aabb
            .ray_intersect(&Point3::new(0.5, 0.5, 0.5), &dir_inv)
            .expect("origin inside box");
        assert_relative_eq!(t_near, 0.0);
        assert_relative_eq!(t_far, 0.5);
    }
}
