//! Mesh normalization to unit extent around the area centroid.
//!
//! Sampling runs on a normalized copy of the mesh so that thresholds and
//! budgets are scale-independent. Poses found there are mapped back with
//! [`NormalizationState::denormalize_poses`].

use grasp_geometry::GeometryError;
use grasp_types::{GraspPose, IndexedMesh, MeshTopology, Point3, Vector3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GraspError, GraspResult};

/// Scale and offset that took a mesh to its normalized frame.
///
/// `normalized = raw / scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizationState {
    /// Bounding-box diagonal of the raw mesh.
    pub scale: f64,
    /// Translation applied after scaling.
    pub offset: Vector3<f64>,
}

impl NormalizationState {
    /// Create a state from a known scale and offset.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidParameter`] unless `scale` is finite and positive.
    pub fn new(scale: f64, offset: Vector3<f64>) -> GraspResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GraspError::invalid_parameter(
                "scale",
                format!("must be finite and positive, got {scale}"),
            ));
        }
        Ok(Self { scale, offset })
    }

    /// Map a raw-frame point into the normalized frame.
    #[must_use]
    pub fn normalize_point(&self, p: &Point3<f64>) -> Point3<f64> {
        p / self.scale + self.offset
    }

    /// Map a normalized-frame point back to the raw frame.
    #[must_use]
    pub fn denormalize_point(&self, p: &Point3<f64>) -> Point3<f64> {
        (p - self.offset) * self.scale
    }

    /// Move pose translations back to the raw frame. Rotations are unchanged.
    pub fn denormalize_poses(&self, poses: &mut [GraspPose]) {
        for pose in poses {
            let p = self.denormalize_point(&pose.position());
            pose.set_translation(p.coords);
        }
    }

    /// Move pose translations into the normalized frame.
    pub fn normalize_poses(&self, poses: &mut [GraspPose]) {
        for pose in poses {
            let p = self.normalize_point(&pose.position());
            pose.set_translation(p.coords);
        }
    }
}

/// Fits and applies the normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizationTransform;

impl NormalizationTransform {
    /// Normalize `mesh` in place and return the state that undoes it.
    ///
    /// The mesh is scaled by the inverse of the bounding-box diagonal of its
    /// face vertices, then translated so its area-weighted centroid sits at
    /// the origin.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::EmptyMesh`] if the mesh has no faces
    /// - [`GeometryError::InvalidFaceIndex`] if a face references a missing vertex
    /// - [`GeometryError::ZeroExtent`] if every vertex coincides
    /// - [`GeometryError::ZeroArea`] if the surface has no area
    pub fn fit(mesh: &mut IndexedMesh) -> GraspResult<NormalizationState> {
        if mesh.face_count() == 0 {
            return Err(GeometryError::EmptyMesh.into());
        }
        if let Some((face, vertex)) = mesh.invalid_face() {
            return Err(GeometryError::InvalidFaceIndex { face, vertex }.into());
        }

        let scale = mesh.extent();
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeometryError::ZeroExtent.into());
        }
        mesh.scale(1.0 / scale);

        let centroid = mesh.area_centroid().ok_or(GeometryError::ZeroArea)?;
        let offset = -centroid.coords;
        mesh.translate(offset);

        debug!(scale, ?offset, "Normalized mesh");
        Ok(NormalizationState { scale, offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_types::{cuboid, unit_cube};

    #[test]
    fn fitted_mesh_has_unit_extent_and_centered_centroid() {
        let mut mesh = cuboid(4.0, 2.0, 1.0);
        mesh.translate(Vector3::new(10.0, -3.0, 7.0));
        let state = NormalizationTransform::fit(&mut mesh).expect("valid");

        assert_relative_eq!(state.scale, 21.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(mesh.extent(), 1.0, epsilon = 1e-12);
        let centroid = mesh.area_centroid().expect("non-zero area");
        assert_relative_eq!(centroid, Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn unreferenced_vertices_do_not_change_scale() {
        let mut mesh = unit_cube();
        mesh.vertices.push(Point3::new(-50.0, 20.0, 0.0));
        let state = NormalizationTransform::fit(&mut mesh).expect("valid");
        assert_relative_eq!(state.scale, 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn point_round_trip() {
        let mut mesh = unit_cube();
        mesh.scale(3.0);
        let state = NormalizationTransform::fit(&mut mesh).expect("valid");
        let raw = Point3::new(0.2, 2.9, -1.5);
        assert_relative_eq!(
            state.denormalize_point(&state.normalize_point(&raw)),
            raw,
            epsilon = 1e-12
        );
    }

    #[test]
    fn normalized_vertices_map_back_to_raw() {
        let raw = cuboid(0.02, 0.05, 0.01);
        let mut mesh = raw.clone();
        let state = NormalizationTransform::fit(&mut mesh).expect("valid");
        for (r, n) in raw.vertices.iter().zip(&mesh.vertices) {
            assert_relative_eq!(state.denormalize_point(n), *r, epsilon = 1e-12);
        }
    }

    #[test]
    fn pose_translation_only_is_changed() {
        let state = NormalizationState::new(2.0, Vector3::new(0.5, 0.0, -0.5)).expect("valid");
        let mut poses = [GraspPose::from_pq_wxyz(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0])];
        let before = poses[0].rotation();
        state.denormalize_poses(&mut poses);
        assert_relative_eq!(poses[0].position(), Point3::new(-1.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(poses[0].rotation(), before);

        state.normalize_poses(&mut poses);
        assert_relative_eq!(poses[0].position(), Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_meshes_are_rejected() {
        let mut empty = IndexedMesh::new();
        assert!(matches!(
            NormalizationTransform::fit(&mut empty),
            Err(GraspError::Geometry(GeometryError::EmptyMesh))
        ));

        let mut point = IndexedMesh::from_parts(vec![Point3::new(1.0, 1.0, 1.0); 3], vec![[0, 1, 2]]);
        assert!(matches!(
            NormalizationTransform::fit(&mut point),
            Err(GraspError::Geometry(GeometryError::ZeroExtent))
        ));

        assert!(NormalizationState::new(0.0, Vector3::zeros()).is_err());
    }
}
