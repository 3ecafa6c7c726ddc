//! Antipodal grasp pose synthesis for parallel-jaw grippers.
//!
//! Given a triangle mesh, this crate proposes gripper poses whose two jaws
//! close on roughly opposite surface points:
//!
//! 1. The mesh is copied and normalized to unit extent around its area
//!    centroid ([`NormalizationTransform`]).
//! 2. Surface points are sampled by area, the inward normal at each is
//!    perturbed with a von Mises-Fisher draw ([`DirectionalSampler`]), and
//!    a ray cast both ways along it finds the second contact
//!    ([`ContactPairFinder`]).
//! 3. Each contact pair becomes a right-handed gripper frame centered on
//!    its midpoint ([`GripperFrameBuilder`]).
//! 4. Poses are mapped back to the input mesh's frame.
//!
//! Grasp quality is not evaluated; the output is a candidate set.
//!
//! # Example
//!
//! ```
//! use grasp_antipodal::{AntipodalGraspGenerator, AntipodalParams, GraspGenerator};
//! use grasp_types::unit_cube;
//!
//! let params = AntipodalParams::default().with_kappa(20.0).with_seed(42);
//! let generator = AntipodalGraspGenerator::new(params);
//!
//! let poses = generator.generate_grasps(&unit_cube(), 8).unwrap();
//! for pose in &poses {
//!     let [px, py, pz, qw, qx, qy, qz] = pose.to_pq_wxyz();
//!     assert!((qw * qw + qx * qx + qy * qy + qz * qz - 1.0).abs() < 1e-9);
//!     assert!((0.0..=1.0).contains(&px) && (0.0..=1.0).contains(&py) && (0.0..=1.0).contains(&pz));
//! }
//! ```
//!
//! # Reproducibility
//!
//! A fixed [`AntipodalParams::seed`] gives identical output across runs.
//! Each call owns its random stream, so concurrent calls do not interfere.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod contact;
mod direction;
mod error;
mod frame;
mod generator;
mod normalize;
mod params;

pub use contact::{ContactPairFinder, farthest_contact};
pub use direction::DirectionalSampler;
pub use error::{GraspError, GraspResult};
pub use frame::{GripperFrameBuilder, PARALLEL_TOLERANCE, is_degenerate};
pub use generator::{AntipodalGraspGenerator, GraspGenerator};
pub use normalize::{NormalizationState, NormalizationTransform};
pub use params::AntipodalParams;
