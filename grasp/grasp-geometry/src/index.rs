//! Surface query index over a triangle mesh.

use grasp_types::{IndexedMesh, MeshTopology, Point3, SurfacePoint, Triangle, Vector3};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rayon::prelude::*;
use tracing::debug;

use crate::bvh::{Bvh, ClosestPoint, RayHit};
use crate::error::{GeometryError, GeometryResult};

/// Rays ignore intersections closer than this to their origin.
pub const RAY_EPSILON: f64 = 1e-10;

/// Read-only query structure over a triangle mesh.
///
/// Precomputes resolved triangles, unit face normals, an area-weighted
/// face distribution and a BVH at construction; every query afterwards is
/// `&self`.
///
/// # Example
///
/// ```
/// use grasp_geometry::MeshGeometryIndex;
/// use grasp_types::{unit_cube, Point3, Vector3};
///
/// let index = MeshGeometryIndex::new(unit_cube()).unwrap();
///
/// let nearest = index.closest_point(&Point3::new(0.5, 0.5, 3.0));
/// assert!((nearest.distance - 2.0).abs() < 1e-12);
///
/// let hits = index.raycast_one(&Point3::new(0.25, 0.7, -1.0), &Vector3::z());
/// assert_eq!(hits.len(), 2);
/// ```
#[derive(Debug)]
pub struct MeshGeometryIndex {
    mesh: IndexedMesh,
    triangles: Vec<Triangle>,
    normals: Vec<Option<Vector3<f64>>>,
    face_distribution: WeightedIndex<f64>,
    bvh: Bvh,
}

impl MeshGeometryIndex {
    /// Build the index, taking ownership of the mesh.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::EmptyMesh`] if the mesh has no faces
    /// - [`GeometryError::InvalidFaceIndex`] if a face references a missing vertex
    /// - [`GeometryError::ZeroArea`] if the total surface area is zero
    pub fn new(mesh: IndexedMesh) -> GeometryResult<Self> {
        if mesh.face_count() == 0 {
            return Err(GeometryError::EmptyMesh);
        }
        if let Some((face, vertex)) = mesh.invalid_face() {
            return Err(GeometryError::InvalidFaceIndex { face, vertex });
        }

        let triangles: Vec<Triangle> = mesh.triangles().collect();

        // Faces without a normal are never sampled, hit or returned as closest
        let normals: Vec<Option<Vector3<f64>>> = triangles.iter().map(Triangle::normal).collect();

        let areas: Vec<f64> = triangles
            .iter()
            .zip(&normals)
            .map(|(t, n)| if n.is_some() { t.area() } else { 0.0 })
            .collect();
        let face_distribution =
            WeightedIndex::new(&areas).map_err(|_| GeometryError::ZeroArea)?;

        let degenerate = normals.iter().filter(|n| n.is_none()).count();
        let bvh = Bvh::build(&triangles, |face| normals[face].is_some());

        debug!(
            faces = triangles.len(),
            degenerate,
            vertices = mesh.vertex_count(),
            "Built mesh geometry index"
        );

        Ok(Self {
            mesh,
            triangles,
            normals,
            face_distribution,
            bvh,
        })
    }

    /// The indexed mesh.
    #[must_use]
    pub const fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.triangles.len()
    }

    /// Nearest point on the surface to `query`, with its distance and face.
    ///
    /// Zero-area faces are skipped, so the reported face always has a normal.
    #[must_use]
    pub fn closest_point(&self, query: &Point3<f64>) -> ClosestPoint {
        // The BVH is non-empty because construction rejects meshes without area
        self.bvh
            .closest_point(&self.triangles, query)
            .unwrap_or(ClosestPoint {
                point: *query,
                distance: f64::INFINITY,
                face: 0,
            })
    }

    /// Outward unit normal of a face.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::FaceOutOfRange`] for an unknown face id
    /// - [`GeometryError::DegenerateFace`] for a zero-area face
    pub fn face_normal(&self, face: usize) -> GeometryResult<Vector3<f64>> {
        let normal = self
            .normals
            .get(face)
            .ok_or(GeometryError::FaceOutOfRange {
                face,
                count: self.normals.len(),
            })?;
        normal.ok_or(GeometryError::DegenerateFace { face })
    }

    /// Draw `n` points uniformly over the surface area.
    ///
    /// Each face is chosen with probability proportional to its area, then
    /// a point is drawn uniformly inside it.
    pub fn sample_surface<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<SurfacePoint> {
        (0..n)
            .map(|_| {
                let face = self.face_distribution.sample(rng);
                let (r1, r2): (f64, f64) = (rng.r#gen(), rng.r#gen());
                SurfacePoint::new(self.triangles[face].point_from_unit_square(r1, r2), face)
            })
            .collect()
    }

    /// All surface intersections of a single ray, nearest first.
    ///
    /// `direction` is normalized internally; a zero direction hits nothing.
    /// Hits at the same distance are ordered by face id.
    #[must_use]
    pub fn raycast_one(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Vec<RayHit> {
        let Some(dir) = direction.try_normalize(0.0) else {
            return Vec::new();
        };

        let mut hits = Vec::new();
        self.bvh
            .ray_hits(&self.triangles, origin, &dir, RAY_EPSILON, &mut hits);
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.face.cmp(&b.face))
        });
        hits
    }

    /// Batched [`raycast_one`](Self::raycast_one): one hit list per ray, in input order.
    ///
    /// Rays are independent and traced in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::RayCountMismatch`] if the slices differ in length.
    pub fn raycast(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
    ) -> GeometryResult<Vec<Vec<RayHit>>> {
        if origins.len() != directions.len() {
            return Err(GeometryError::RayCountMismatch {
                origins: origins.len(),
                directions: directions.len(),
            });
        }

        Ok(origins
            .par_iter()
            .zip(directions.par_iter())
            .map(|(o, d)| self.raycast_one(o, d))
            .collect())
    }
}
