//! File I/O for antipodal grasp synthesis.
//!
//! - **Meshes**: STL (binary and ASCII) and Wavefront OBJ, loaded into an
//!   [`IndexedMesh`]
//! - **Grasp sets**: JSON files of quaternion + position records, with
//!   per-object gathering from a directory
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no rendering or engine dependencies.
//!
//! # Example
//!
//! ```no_run
//! use grasp_io::{load_mesh, load_object_grasps, save_grasps, GraspFile};
//! use grasp_types::GraspPose;
//!
//! let mesh = load_mesh("mug.obj").unwrap();
//! println!("{} faces", mesh.faces.len());
//!
//! let file = GraspFile::from_poses("mug", &[GraspPose::default()]);
//! save_grasps(&file, "grasps/mug_grasps.json").unwrap();
//!
//! let all = load_object_grasps("grasps", "mug").unwrap();
//! assert!(all.is_some());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod grasps;
mod obj;
mod stl;

pub use error::{IoError, IoResult};
pub use grasps::{
    GraspFile, GraspRecord, Orientation, Position, load_grasps, load_object_grasps, save_grasps,
};
pub use obj::{load_obj, read_obj};
pub use stl::{load_stl, read_stl, save_stl};

use std::path::Path;

use grasp_types::IndexedMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL, binary or ASCII.
    Stl,
    /// Wavefront OBJ.
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension, case-insensitively.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }
}

/// Load a mesh, choosing the format from the file extension.
///
/// # Errors
///
/// Returns [`IoError::UnknownFormat`] for an unrecognized extension, or
/// the loader's error.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    match MeshFormat::from_path(path) {
        Some(MeshFormat::Stl) => load_stl(path),
        Some(MeshFormat::Obj) => load_obj(path),
        None => Err(IoError::UnknownFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(MeshFormat::from_path("a/b.STL"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("mug.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("mug.ply"), None);
        assert_eq!(MeshFormat::from_path("noext"), None);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            load_mesh("part.fbx"),
            Err(IoError::UnknownFormat { extension }) if extension == "fbx"
        ));
    }
}
