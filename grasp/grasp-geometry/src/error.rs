//! Error types for geometry queries.

use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors raised for malformed or degenerate meshes and bad query input.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// Every face has zero area, so the surface cannot be sampled.
    #[error("mesh has zero surface area")]
    ZeroArea,

    /// All vertices coincide, so the mesh has no extent to normalize by.
    #[error("mesh has zero extent")]
    ZeroExtent,

    /// A face references a vertex that does not exist.
    #[error("face {face} references missing vertex {vertex}")]
    InvalidFaceIndex {
        /// Offending face.
        face: usize,
        /// Out-of-range vertex index.
        vertex: u32,
    },

    /// A face has zero area and no normal.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// Offending face.
        face: usize,
    },

    /// A face id passed to a query is out of range.
    #[error("face id {face} out of range for mesh with {count} faces")]
    FaceOutOfRange {
        /// Requested face id.
        face: usize,
        /// Number of faces in the mesh.
        count: usize,
    },

    /// Origins and directions passed to a batched raycast differ in length.
    #[error("raycast got {origins} origins but {directions} directions")]
    RayCountMismatch {
        /// Number of ray origins.
        origins: usize,
        /// Number of ray directions.
        directions: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert!(GeometryError::EmptyMesh.to_string().contains("no faces"));
        let err = GeometryError::InvalidFaceIndex { face: 3, vertex: 99 };
        assert!(err.to_string().contains("99"));
        let err = GeometryError::RayCountMismatch {
            origins: 2,
            directions: 1,
        };
        assert!(err.to_string().contains("2 origins"));
        assert!(GeometryError::DegenerateFace { face: 5 }.to_string().contains("face 5"));
    }
}
