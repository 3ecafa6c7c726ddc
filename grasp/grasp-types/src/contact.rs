//! Surface points and contact pairs.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on a mesh surface tagged with the face it lies on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfacePoint {
    /// Position on the surface.
    pub position: Point3<f64>,
    /// Index of the face the point lies on (or is nearest to).
    pub face: usize,
}

impl SurfacePoint {
    /// Create a surface point.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>, face: usize) -> Self {
        Self { position, face }
    }
}

/// Two surface contacts a parallel-jaw gripper closes on.
///
/// `first` is the sampled surface point and `second` the opposing hit
/// found by raycasting from it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPair {
    /// Contact the search started from.
    pub first: Point3<f64>,
    /// Opposing contact.
    pub second: Point3<f64>,
}

impl ContactPair {
    /// Create a contact pair.
    #[inline]
    #[must_use]
    pub const fn new(first: Point3<f64>, second: Point3<f64>) -> Self {
        Self { first, second }
    }

    /// Midpoint between the contacts (the gripper center).
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.first, &self.second)
    }

    /// Vector from `first` to `second`.
    #[must_use]
    pub fn span(&self) -> Vector3<f64> {
        self.second - self.first
    }

    /// Jaw opening needed to bracket both contacts.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.span().norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_and_width() {
        let pair = ContactPair::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(pair.center(), Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(pair.width(), 2.0);
    }
}
