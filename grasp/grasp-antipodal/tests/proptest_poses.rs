//! Property-based tests for generated gripper poses.
//!
//! Run with: cargo test -p grasp-antipodal -- proptest

#![allow(clippy::unwrap_used, clippy::expect_used)]

use grasp_antipodal::{
    AntipodalGraspGenerator, AntipodalParams, GraspGenerator, GripperFrameBuilder,
    NormalizationState,
};
use grasp_types::{GraspPose, Matrix3, Point3, Vector3, cuboid};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-5.0..5.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_generated_poses_are_rigid(
        seed in any::<u64>(),
        dims in prop::array::uniform3(0.05..2.0f64),
        kappa in 0.0..50.0f64,
    ) {
        let mesh = cuboid(dims[0], dims[1], dims[2]);
        let params = AntipodalParams::default().with_kappa(kappa).with_seed(seed);
        let poses = AntipodalGraspGenerator::new(params).generate_grasps(&mesh, 6).unwrap();

        prop_assert_eq!(poses.len(), 6);
        for pose in &poses {
            prop_assert!(pose.is_rigid(1e-6));
            let m = pose.matrix();
            prop_assert_eq!(m[(3, 0)], 0.0);
            prop_assert_eq!(m[(3, 1)], 0.0);
            prop_assert_eq!(m[(3, 2)], 0.0);
            prop_assert_eq!(m[(3, 3)], 1.0);
        }
    }

    #[test]
    fn proptest_frame_translation_is_midpoint(
        a in arb_point(),
        b in arb_point(),
        seed in any::<u64>(),
    ) {
        prop_assume!((b - a).norm() > 1e-6);
        let mut rng = StdRng::seed_from_u64(seed);
        let poses = GripperFrameBuilder::default().build(&[a], &[b], &mut rng).unwrap();
        let pose = poses[0];

        let mid = Point3::from((a.coords + b.coords) / 2.0);
        prop_assert!((pose.position() - mid).norm() < 1e-12);
        prop_assert!((pose.jaw_axis() - (b - a).normalize()).norm() < 1e-12);
        prop_assert!(pose.is_rigid(1e-9));
    }
}

proptest! {
    #[test]
    fn proptest_denormalize_undoes_normalize(
        scale in 1e-3..1e3f64,
        offset in prop::array::uniform3(-10.0..10.0f64),
        positions in prop::collection::vec(arb_point(), 1..8),
    ) {
        let state = NormalizationState::new(scale, Vector3::from(offset)).unwrap();
        let original: Vec<GraspPose> = positions
            .iter()
            .map(|p| GraspPose::from_parts(Matrix3::identity(), p.coords))
            .collect();

        let mut poses = original.clone();
        state.normalize_poses(&mut poses);
        state.denormalize_poses(&mut poses);

        for (a, b) in poses.iter().zip(&original) {
            let tol = 1e-9 * (1.0 + b.translation().norm() + scale * Vector3::from(offset).norm());
            prop_assert!((a.translation() - b.translation()).norm() < tol);
            prop_assert_eq!(a.rotation(), b.rotation());
        }
    }
}
