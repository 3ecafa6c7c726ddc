//! Surface geometry queries for grasp synthesis.
//!
//! [`MeshGeometryIndex`] wraps a triangle mesh and answers the queries the
//! antipodal sampler needs:
//!
//! - closest surface point (with its face)
//! - outward face normal lookup
//! - area-weighted uniform surface sampling
//! - raycasting that reports **every** intersection along the ray
//!
//! Closest-point and ray queries are accelerated by a median-split BVH.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no rendering or engine dependencies.
//!
//! # Example
//!
//! ```
//! use grasp_geometry::MeshGeometryIndex;
//! use grasp_types::{cuboid, Point3, Vector3};
//! use rand::SeedableRng;
//!
//! let index = MeshGeometryIndex::new(cuboid(1.0, 1.0, 1.0)).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//!
//! for p in index.sample_surface(16, &mut rng) {
//!     let n = index.face_normal(p.face).unwrap();
//!     // Cast inward: a closed box always has an opposite wall
//!     let hits = index.raycast_one(&p.position, &-n);
//!     assert!(!hits.is_empty());
//! }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bvh;
mod error;
mod index;

pub use bvh::{ClosestPoint, RayHit};
pub use error::{GeometryError, GeometryResult};
pub use index::{MeshGeometryIndex, RAY_EPSILON};
