//! Indexed triangle mesh.

use nalgebra::{Point3, Vector3};

use crate::{Aabb, Triangle};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimal read interface over a triangle mesh.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangular faces.
    fn face_count(&self) -> usize;

    /// True when the mesh has no faces to query.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Resolve a face into vertex positions.
    ///
    /// Returns `None` if the face or any of its vertex indices is out of range.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;
}

/// An indexed triangle mesh.
///
/// Faces reference `vertices` by index and use CCW winding when viewed
/// from outside, so face normals point outward on a closed mesh.
///
/// # Example
///
/// ```
/// use grasp_types::{IndexedMesh, MeshTopology, Point3};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// assert_eq!(mesh.face_count(), 1);
/// assert!(mesh.invalid_face().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangle faces as indices into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Find the first face referencing a vertex that does not exist.
    ///
    /// Returns `(face_index, vertex_index)` of the offending reference.
    #[must_use]
    pub fn invalid_face(&self) -> Option<(usize, u32)> {
        let n = self.vertices.len();
        self.faces.iter().enumerate().find_map(|(fi, face)| {
            face.iter()
                .copied()
                .find(|&vi| vi as usize >= n)
                .map(|vi| (fi, vi))
        })
    }

    /// Iterate over all faces as resolved triangles.
    ///
    /// Faces with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }

    /// Axis-aligned bounds of the vertex set.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// Axis-aligned bounds of the vertices referenced by faces.
    ///
    /// Unreferenced vertices and out-of-range indices are ignored.
    #[must_use]
    pub fn face_bounds(&self) -> Aabb {
        Aabb::from_points(
            self.faces
                .iter()
                .flatten()
                .filter_map(|&i| self.vertices.get(i as usize)),
        )
    }

    /// Overall extent: the bounding-box diagonal of the referenced vertices.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.face_bounds().diagonal()
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }

    /// Surface centroid: triangle centroids weighted by triangle area.
    ///
    /// Returns `None` if the mesh has zero surface area.
    #[must_use]
    pub fn area_centroid(&self) -> Option<Point3<f64>> {
        let (weighted, total) = self.triangles().fold(
            (Vector3::zeros(), 0.0),
            |(acc, total), t| {
                let area = t.area();
                (acc + t.centroid().coords * area, total + area)
            },
        );
        (total > 0.0).then(|| Point3::from(weighted / total))
    }

    /// Scale every vertex about the origin.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            v.coords *= factor;
        }
    }

    /// Translate every vertex.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face_index)?;
        Some(Triangle::new(
            *self.vertices.get(i0 as usize)?,
            *self.vertices.get(i1 as usize)?,
            *self.vertices.get(i2 as usize)?,
        ))
    }
}

/// Axis-aligned box with the given edge lengths, centered at the origin.
///
/// Twelve triangles with outward-facing normals.
///
/// # Example
///
/// ```
/// use grasp_types::{cuboid, MeshTopology};
///
/// let slab = cuboid(4.0, 2.0, 1.0);
/// assert_eq!(slab.face_count(), 12);
/// assert!((slab.surface_area() - 28.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn cuboid(x: f64, y: f64, z: f64) -> IndexedMesh {
    let (hx, hy, hz) = (x * 0.5, y * 0.5, z * 0.5);
    let vertices = vec![
        Point3::new(-hx, -hy, -hz), // 0
        Point3::new(hx, -hy, -hz),  // 1
        Point3::new(hx, hy, -hz),   // 2
        Point3::new(-hx, hy, -hz),  // 3
        Point3::new(-hx, -hy, hz),  // 4
        Point3::new(hx, -hy, hz),   // 5
        Point3::new(hx, hy, hz),    // 6
        Point3::new(-hx, hy, hz),   // 7
    ];

    let faces = vec![
        [0, 2, 1],
        [0, 3, 2], // -Z
        [4, 5, 6],
        [4, 6, 7], // +Z
        [0, 1, 5],
        [0, 5, 4], // -Y
        [3, 7, 6],
        [3, 6, 2], // +Y
        [0, 4, 7],
        [0, 7, 3], // -X
        [1, 2, 6],
        [1, 6, 5], // +X
    ];

    IndexedMesh::from_parts(vertices, faces)
}

/// Unit cube spanning `(0,0,0)` to `(1,1,1)`.
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let mut cube = cuboid(1.0, 1.0, 1.0);
    cube.translate(Vector3::repeat(0.5));
    cube
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_mesh_is_empty() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.area_centroid().is_none());
        assert_relative_eq!(mesh.extent(), 0.0);
    }

    #[test]
    fn invalid_face_is_reported() {
        let mut mesh = unit_cube();
        assert!(mesh.invalid_face().is_none());
        mesh.faces.push([0, 1, 42]);
        assert_eq!(mesh.invalid_face(), Some((12, 42)));
        assert!(mesh.triangle(12).is_none());
    }

    #[test]
    fn cube_normals_point_outward() {
        let cube = unit_cube();
        let center = Point3::new(0.5, 0.5, 0.5);
        for tri in cube.triangles() {
            let n = tri.normal().expect("cube faces are non-degenerate");
            assert!(n.dot(&(tri.centroid() - center)) > 0.0);
        }
    }

    #[test]
    fn cube_statistics() {
        let cube = unit_cube();
        assert_relative_eq!(cube.surface_area(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(cube.extent(), 3.0_f64.sqrt(), epsilon = 1e-12);
        let c = cube.area_centroid().expect("non-zero area");
        assert_relative_eq!(c, Point3::new(0.5, 0.5, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn stray_vertices_do_not_change_extent() {
        let mut cube = unit_cube();
        cube.vertices.push(Point3::new(100.0, 100.0, 100.0));
        assert_relative_eq!(cube.extent(), 3.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(cube.face_bounds().max, Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(cube.bounds().max, Point3::new(100.0, 100.0, 100.0));
    }

    #[test]
    fn scale_then_translate() {
        let mut mesh = cuboid(2.0, 2.0, 2.0);
        mesh.scale(0.5);
        mesh.translate(Vector3::new(1.0, 0.0, 0.0));
        let b = mesh.bounds();
        assert_relative_eq!(b.min, Point3::new(0.5, -0.5, -0.5), epsilon = 1e-12);
        assert_relative_eq!(b.max, Point3::new(1.5, 0.5, 0.5), epsilon = 1e-12);
    }
}
