//! Bounding volume hierarchy over mesh triangles.
//!
//! Median split along the longest axis of each node's bounds. Leaves hold
//! up to [`MAX_LEAF_SIZE`] triangles.

use grasp_types::{Aabb, Point3, Triangle, Vector3};
use smallvec::SmallVec;

/// Maximum triangles per leaf.
pub(crate) const MAX_LEAF_SIZE: usize = 4;

/// Padding applied to node bounds so axis-aligned faces are not culled by
/// floating-point noise in the slab test.
const BOUNDS_PADDING: f64 = 1e-9;

#[derive(Debug)]
enum BvhNode {
    Leaf {
        bounds: Aabb,
        faces: SmallVec<[u32; MAX_LEAF_SIZE]>,
    },
    Internal {
        bounds: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    const fn bounds(&self) -> &Aabb {
        match self {
            Self::Leaf { bounds, .. } | Self::Internal { bounds, .. } => bounds,
        }
    }
}

/// A single ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Intersection point.
    pub point: Point3<f64>,
    /// Distance from the ray origin (rays are unit length, so this is `t`).
    pub distance: f64,
    /// Face that was hit.
    pub face: usize,
}

/// Closest surface point found by [`Bvh::closest_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Closest point on the surface.
    pub point: Point3<f64>,
    /// Euclidean distance from the query.
    pub distance: f64,
    /// Face the point lies on.
    pub face: usize,
}

/// Static BVH built once over a fixed triangle list.
#[derive(Debug)]
pub(crate) struct Bvh {
    root: Option<BvhNode>,
}

impl Bvh {
    /// Build over the faces of `triangles` accepted by `include`; face ids
    /// are positions in the slice.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: face ids come from a `[u32; 3]` mesh, so they fit in u32
    pub(crate) fn build(triangles: &[Triangle], include: impl Fn(usize) -> bool) -> Self {
        let items: Vec<(u32, Aabb, Point3<f64>)> = triangles
            .iter()
            .enumerate()
            .filter(|&(i, _)| include(i))
            .map(|(i, t)| (i as u32, t.bounds().padded(BOUNDS_PADDING), t.centroid()))
            .collect();
        if items.is_empty() {
            return Self { root: None };
        }
        let indices: Vec<usize> = (0..items.len()).collect();

        Self {
            root: Some(Self::build_recursive(&items, indices)),
        }
    }

    fn build_recursive(items: &[(u32, Aabb, Point3<f64>)], mut indices: Vec<usize>) -> BvhNode {
        let mut bounds = Aabb::empty();
        for &i in &indices {
            bounds.merge(&items[i].1);
        }

        if indices.len() <= MAX_LEAF_SIZE {
            return BvhNode::Leaf {
                bounds,
                faces: indices.iter().map(|&i| items[i].0).collect(),
            };
        }

        let axis = bounds.longest_axis();
        indices.sort_by(|&a, &b| items[a].2[axis].total_cmp(&items[b].2[axis]));

        let right_indices = indices.split_off(indices.len() / 2);
        let left = Self::build_recursive(items, indices);
        let right = Self::build_recursive(items, right_indices);

        BvhNode::Internal {
            bounds,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Nearest point on any triangle to `query`.
    ///
    /// Ties between faces resolve to the face visited first.
    pub(crate) fn closest_point(
        &self,
        triangles: &[Triangle],
        query: &Point3<f64>,
    ) -> Option<ClosestPoint> {
        let root = self.root.as_ref()?;
        let mut best: Option<(f64, Point3<f64>, usize)> = None;
        Self::closest_recursive(root, triangles, query, &mut best);
        best.map(|(dist_sq, point, face)| ClosestPoint {
            point,
            distance: dist_sq.sqrt(),
            face,
        })
    }

    fn closest_recursive(
        node: &BvhNode,
        triangles: &[Triangle],
        query: &Point3<f64>,
        best: &mut Option<(f64, Point3<f64>, usize)>,
    ) {
        let bound = best.map_or(f64::INFINITY, |(d, _, _)| d);
        if node.bounds().distance_squared(query) > bound {
            return;
        }

        match node {
            BvhNode::Leaf { faces, .. } => {
                for &f in faces {
                    let face = f as usize;
                    let candidate = triangles[face].closest_point(query);
                    let dist_sq = (candidate - query).norm_squared();
                    if best.is_none_or(|(d, _, _)| dist_sq < d) {
                        *best = Some((dist_sq, candidate, face));
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                // Descend into the nearer child first to tighten the bound early
                let dl = left.bounds().distance_squared(query);
                let dr = right.bounds().distance_squared(query);
                let (near, far) = if dl <= dr {
                    (left, right)
                } else {
                    (right, left)
                };
                Self::closest_recursive(near, triangles, query, best);
                Self::closest_recursive(far, triangles, query, best);
            }
        }
    }

    /// Every intersection of the ray with the surface, in traversal order.
    ///
    /// `direction` must be unit length for `distance` to be Euclidean.
    pub(crate) fn ray_hits(
        &self,
        triangles: &[Triangle],
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        epsilon: f64,
        hits: &mut Vec<RayHit>,
    ) {
        let Some(root) = self.root.as_ref() else {
            return;
        };
        let dir_inv = direction.map(|c| if c.abs() > epsilon { 1.0 / c } else { f64::MAX });
        Self::ray_recursive(root, triangles, origin, direction, &dir_inv, epsilon, hits);
    }

    fn ray_recursive(
        node: &BvhNode,
        triangles: &[Triangle],
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        dir_inv: &Vector3<f64>,
        epsilon: f64,
        hits: &mut Vec<RayHit>,
    ) {
        if node.bounds().ray_intersect(origin, dir_inv).is_none() {
            return;
        }

        match node {
            BvhNode::Leaf { faces, .. } => {
                for &f in faces {
                    let face = f as usize;
                    if let Some(t) = triangles[face].ray_intersect(origin, direction, epsilon) {
                        hits.push(RayHit {
                            point: origin + direction * t,
                            distance: t,
                            face,
                        });
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                Self::ray_recursive(left, triangles, origin, direction, dir_inv, epsilon, hits);
                Self::ray_recursive(right, triangles, origin, direction, dir_inv, epsilon, hits);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_types::{cuboid, unit_cube};

    fn triangles(mesh: &grasp_types::IndexedMesh) -> Vec<Triangle> {
        mesh.triangles().collect()
    }

    #[test]
    fn empty_bvh_answers_nothing() {
        let bvh = Bvh::build(&[], |_| true);
        assert!(bvh.closest_point(&[], &Point3::origin()).is_none());
        let mut hits = Vec::new();
        bvh.ray_hits(&[], &Point3::origin(), &Vector3::x(), 1e-10, &mut hits);
        assert!(hits.is_empty());
    }

    #[test]
    fn closest_point_matches_brute_force() {
        let tris = triangles(&cuboid(3.0, 1.0, 2.0));
        let bvh = Bvh::build(&tris, |_| true);

        for query in [
            Point3::new(4.0, 0.1, 0.2),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-2.0, 3.0, -5.0),
            Point3::new(0.3, -0.45, 0.9),
        ] {
            let fast = bvh.closest_point(&tris, &query).expect("non-empty");
            let brute = tris
                .iter()
                .map(|t| (t.closest_point(&query) - query).norm())
                .fold(f64::INFINITY, f64::min);
            assert_relative_eq!(fast.distance, brute, epsilon = 1e-12);
        }
    }

    #[test]
    fn ray_through_cube_hits_both_walls() {
        let tris = triangles(&unit_cube());
        let bvh = Bvh::build(&tris, |_| true);
        let mut hits = Vec::new();
        bvh.ray_hits(
            &tris,
            &Point3::new(-1.0, 0.3, 0.6),
            &Vector3::x(),
            1e-10,
            &mut hits,
        );
        let mut ds: Vec<f64> = hits.iter().map(|h| h.distance).collect();
        ds.sort_by(f64::total_cmp);
        assert_eq!(ds.len(), 2);
        assert_relative_eq!(ds[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ds[1], 2.0, epsilon = 1e-12);
    }
}
