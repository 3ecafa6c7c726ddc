//! Grasp generator trait and the antipodal implementation.

use grasp_geometry::MeshGeometryIndex;
use grasp_types::{GraspPose, IndexedMesh, MeshTopology};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

use crate::contact::ContactPairFinder;
use crate::error::{GraspError, GraspResult};
use crate::frame::GripperFrameBuilder;
use crate::normalize::NormalizationTransform;
use crate::params::AntipodalParams;

/// Produces candidate gripper poses for a mesh.
pub trait GraspGenerator {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Generate exactly `num` poses in the mesh's own frame, drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Implementations fail on a zero `num`, a degenerate mesh, or when
    /// they cannot find enough poses.
    fn generate_grasps_with_rng(
        &self,
        mesh: &IndexedMesh,
        num: usize,
        rng: &mut dyn RngCore,
    ) -> GraspResult<Vec<GraspPose>>;

    /// Generate exactly `num` poses with a generator-chosen random stream.
    ///
    /// # Errors
    ///
    /// Same as [`generate_grasps_with_rng`](Self::generate_grasps_with_rng).
    fn generate_grasps(&self, mesh: &IndexedMesh, num: usize) -> GraspResult<Vec<GraspPose>> {
        let mut rng = StdRng::from_entropy();
        self.generate_grasps_with_rng(mesh, num, &mut rng)
    }
}

/// Antipodal two-finger grasp sampler.
///
/// Normalizes a copy of the mesh, searches it for antipodal contact pairs,
/// builds a gripper frame at each pair's midpoint, and maps the poses back
/// to the input frame. The input mesh is never modified.
///
/// # Example
///
/// ```
/// use grasp_antipodal::{AntipodalGraspGenerator, AntipodalParams, GraspGenerator};
/// use grasp_types::cuboid;
///
/// let generator = AntipodalGraspGenerator::new(AntipodalParams::default().with_seed(3));
/// let poses = generator.generate_grasps(&cuboid(0.1, 0.05, 0.2), 5).unwrap();
/// assert_eq!(poses.len(), 5);
/// assert!(poses.iter().all(|p| p.is_rigid(1e-6)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AntipodalGraspGenerator {
    params: AntipodalParams,
}

impl AntipodalGraspGenerator {
    /// Create a generator with the given parameters.
    #[must_use]
    pub const fn new(params: AntipodalParams) -> Self {
        Self { params }
    }

    /// The sampling parameters.
    #[must_use]
    pub const fn params(&self) -> &AntipodalParams {
        &self.params
    }
}

impl GraspGenerator for AntipodalGraspGenerator {
    fn name(&self) -> &'static str {
        "antipodal"
    }

    fn generate_grasps_with_rng(
        &self,
        mesh: &IndexedMesh,
        num: usize,
        rng: &mut dyn RngCore,
    ) -> GraspResult<Vec<GraspPose>> {
        if num == 0 {
            return Err(GraspError::invalid_parameter("num", "must be at least 1"));
        }
        let finder = ContactPairFinder::new(&self.params)?;
        let frames = GripperFrameBuilder::new(self.params.max_frame_attempts);

        let mut working = mesh.clone();
        let state = NormalizationTransform::fit(&mut working)?;
        let index = MeshGeometryIndex::new(working)?;

        let pairs = finder.find(&index, num, rng)?;
        let mut poses = frames.build_pairs(&pairs, rng)?;
        state.denormalize_poses(&mut poses);

        info!(
            generator = self.name(),
            faces = mesh.face_count(),
            grasps = poses.len(),
            kappa = self.params.kappa,
            "Generated grasps"
        );
        Ok(poses)
    }

    /// Uses the configured seed if set, OS entropy otherwise.
    fn generate_grasps(&self, mesh: &IndexedMesh, num: usize) -> GraspResult<Vec<GraspPose>> {
        let mut rng = self
            .params
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        self.generate_grasps_with_rng(mesh, num, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_types::cuboid;

    #[test]
    fn zero_grasps_is_rejected_before_sampling() {
        let generator = AntipodalGraspGenerator::default();
        let err = generator
            .generate_grasps(&IndexedMesh::new(), 0)
            .expect_err("zero");
        assert!(matches!(err, GraspError::InvalidParameter { name: "num", .. }));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let generator = AntipodalGraspGenerator::new(AntipodalParams::default().with_kappa(-2.0));
        assert!(matches!(
            generator.generate_grasps(&cuboid(1.0, 1.0, 1.0), 3),
            Err(GraspError::InvalidParameter { name: "kappa", .. })
        ));
    }

    #[test]
    fn input_mesh_is_untouched() {
        let mesh = cuboid(0.3, 0.2, 0.1);
        let copy = mesh.clone();
        let generator = AntipodalGraspGenerator::new(AntipodalParams::default().with_seed(1));
        generator.generate_grasps(&mesh, 4).expect("box");
        assert_eq!(mesh, copy);
    }

    #[test]
    fn poses_sit_inside_the_box() {
        let mesh = cuboid(0.4, 0.2, 0.1);
        let generator = AntipodalGraspGenerator::new(AntipodalParams::default().with_seed(8));
        for pose in generator.generate_grasps(&mesh, 10).expect("box") {
            let p = pose.position();
            assert!(p.x.abs() <= 0.2 + 1e-9);
            assert!(p.y.abs() <= 0.1 + 1e-9);
            assert!(p.z.abs() <= 0.05 + 1e-9);
            assert_relative_eq!(pose.matrix()[(3, 3)], 1.0);
        }
    }
}
