//! Wavefront OBJ support.
//!
//! Polygons are triangulated on load and every object in the file is
//! merged into one mesh. Materials, normals and texture coordinates are
//! ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use grasp_types::{IndexedMesh, Point3};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Load a mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed, or holds no faces.
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::open(path, e))?;
    read_obj(&mut BufReader::new(file), path)
}

/// Parse OBJ from a reader. `source` is only used in error messages.
///
/// # Errors
///
/// Returns [`IoError::Obj`] if parsing fails and
/// [`IoError::InvalidContent`] if the file holds no faces.
pub fn read_obj<R: BufRead>(reader: &mut R, source: &Path) -> IoResult<IndexedMesh> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj_buf(reader, &options, |_| Ok((Vec::new(), Default::default())))
            .map_err(|e| IoError::Obj {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

    let mut mesh = IndexedMesh::new();
    for model in &models {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
        let offset = mesh.vertices.len() as u32;

        mesh.vertices.extend(model.mesh.positions.chunks_exact(3).map(|c| {
            Point3::new(f64::from(c[0]), f64::from(c[1]), f64::from(c[2]))
        }));
        mesh.faces.extend(
            model
                .mesh
                .indices
                .chunks_exact(3)
                .map(|c| [c[0] + offset, c[1] + offset, c[2] + offset]),
        );
    }

    if mesh.faces.is_empty() {
        return Err(IoError::invalid_content(format!(
            "OBJ {} contains no faces",
            source.display()
        )));
    }

    debug!(
        models = models.len(),
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Loaded OBJ"
    );
    Ok(mesh)
}
