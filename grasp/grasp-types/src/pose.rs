//! Gripper pose as a homogeneous rigid transform.

use nalgebra::{Matrix3, Matrix4, Point3, Quaternion, Rotation3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 6-DoF parallel-jaw gripper pose.
///
/// Stored as a 4x4 homogeneous matrix whose rotation columns are the jaw
/// axis (X), co-axis (Y) and approach axis (Z), and whose translation is
/// the gripper center. The bottom row is always `[0, 0, 0, 1]`.
///
/// # Example
///
/// ```
/// use grasp_types::{GraspPose, Matrix3, Vector3};
///
/// let pose = GraspPose::from_parts(Matrix3::identity(), Vector3::new(1.0, 2.0, 3.0));
/// let pq = pose.to_pq_wxyz();
/// assert_eq!(pq, [1.0, 2.0, 3.0, 1.0, 0.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraspPose {
    matrix: Matrix4<f64>,
}

impl Default for GraspPose {
    fn default() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }
}

impl GraspPose {
    /// Assemble a pose from a rotation and a translation.
    ///
    /// The rotation is stored as given; callers are responsible for it
    /// being orthonormal (see [`GraspPose::is_rigid`]).
    #[must_use]
    pub fn from_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self { matrix }
    }

    /// Assemble a pose from its three axes and a center point.
    #[must_use]
    pub fn from_axes(
        jaw: Vector3<f64>,
        co: Vector3<f64>,
        approach: Vector3<f64>,
        center: Point3<f64>,
    ) -> Self {
        Self::from_parts(Matrix3::from_columns(&[jaw, co, approach]), center.coords)
    }

    /// Decode a `[px, py, pz, qw, qx, qy, qz]` vector.
    ///
    /// The quaternion is normalized before use.
    #[must_use]
    pub fn from_pq_wxyz(pq: &[f64; 7]) -> Self {
        let q = UnitQuaternion::from_quaternion(Quaternion::new(pq[3], pq[4], pq[5], pq[6]));
        let rotation = q.to_rotation_matrix().into_inner();
        Self::from_parts(rotation, Vector3::new(pq[0], pq[1], pq[2]))
    }

    /// The full homogeneous matrix.
    #[inline]
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// The 3x3 rotation block.
    #[must_use]
    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The translation column.
    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Replace the translation column, leaving the rotation untouched.
    pub fn set_translation(&mut self, translation: Vector3<f64>) {
        self.matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
    }

    /// Gripper center as a point.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.translation())
    }

    /// Jaw (opening) axis, rotation column 0.
    #[must_use]
    pub fn jaw_axis(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 0).into_owned()
    }

    /// Co-axis, rotation column 1.
    #[must_use]
    pub fn co_axis(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 1).into_owned()
    }

    /// Approach axis, rotation column 2.
    #[must_use]
    pub fn approach_axis(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 2).into_owned()
    }

    /// Orientation as a unit quaternion.
    #[must_use]
    pub fn orientation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(self.rotation()))
    }

    /// Encode as `[px, py, pz, qw, qx, qy, qz]`.
    #[must_use]
    pub fn to_pq_wxyz(&self) -> [f64; 7] {
        let p = self.translation();
        let q = self.orientation();
        [p.x, p.y, p.z, q.w, q.i, q.j, q.k]
    }

    /// Check that the rotation is a right-handed orthonormal basis and the
    /// bottom row is `[0, 0, 0, 1]`, within `tolerance`.
    #[must_use]
    pub fn is_rigid(&self, tolerance: f64) -> bool {
        let r = self.rotation();
        let gram = r.transpose() * r;
        let orthonormal = (gram - Matrix3::identity()).abs().max() <= tolerance;
        let right_handed = (r.determinant() - 1.0).abs() <= tolerance;
        let bottom = self.matrix.row(3);
        let bottom_ok = bottom[0].abs() <= tolerance
            && bottom[1].abs() <= tolerance
            && bottom[2].abs() <= tolerance
            && (bottom[3] - 1.0).abs() <= tolerance;
        orthonormal && right_handed && bottom_ok
    }
}
