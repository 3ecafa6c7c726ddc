//! Core types for antipodal grasp synthesis.
//!
//! This crate provides the data model shared by the grasp pipeline:
//!
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`SurfacePoint`] - A point on the surface tagged with its face
//! - [`ContactPair`] - Two surface contacts bracketing the object
//! - [`GraspPose`] - A 4x4 rigid gripper transform
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **no rendering or engine dependencies**. It can be used in:
//! - CLI tools
//! - Servers
//! - Simulation pipelines
//!
//! # Gripper Frame Convention
//!
//! A [`GraspPose`] rotation has three columns:
//! - X: jaw axis (from the first contact toward the second)
//! - Y: co-axis
//! - Z: approach axis
//!
//! The translation is the midpoint between the two contacts.
//!
//! # Example
//!
//! ```
//! use grasp_types::{unit_cube, MeshTopology};
//!
//! let cube = unit_cube();
//! assert_eq!(cube.face_count(), 12);
//! assert!((cube.surface_area() - 6.0).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod contact;
mod mesh;
mod pose;
mod triangle;

pub use bounds::Aabb;
pub use contact::{ContactPair, SurfacePoint};
pub use mesh::{IndexedMesh, MeshTopology, cuboid, unit_cube};
pub use pose::GraspPose;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Matrix4, Point3, UnitQuaternion, Vector3};
