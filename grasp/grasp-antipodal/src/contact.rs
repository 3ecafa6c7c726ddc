//! Antipodal contact pair search.
//!
//! Each batch samples surface points, perturbs the inward normal at each
//! with a [`DirectionalSampler`], and casts a ray both ways along the
//! perturbed direction. The hit farthest from the sample becomes the second
//! contact. Batches repeat until enough pairs are found.

use grasp_geometry::{GeometryResult, MeshGeometryIndex};
use grasp_types::{ContactPair, Point3, Vector3};
use rand::Rng;
use tracing::debug;

use crate::direction::DirectionalSampler;
use crate::error::{GraspError, GraspResult};
use crate::params::AntipodalParams;

/// Searches a mesh for antipodal contact pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPairFinder {
    sampler: DirectionalSampler,
    oversample: usize,
    max_batches: Option<usize>,
    min_jaw_width: f64,
}

impl ContactPairFinder {
    /// Create a finder from sampling parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidParameter`] if `params` fail validation.
    pub fn new(params: &AntipodalParams) -> GraspResult<Self> {
        params.validate()?;
        Ok(Self {
            sampler: DirectionalSampler::new(params.kappa)?,
            oversample: params.oversample,
            max_batches: params.max_batches,
            min_jaw_width: params.min_jaw_width,
        })
    }

    /// Find exactly `num` contact pairs on the indexed surface.
    ///
    /// # Errors
    ///
    /// - [`GraspError::InvalidParameter`] if `num` is zero
    /// - [`GraspError::SamplingExhausted`] if the batch budget runs out first
    pub fn find<R: Rng + ?Sized>(
        &self,
        index: &MeshGeometryIndex,
        num: usize,
        rng: &mut R,
    ) -> GraspResult<Vec<ContactPair>> {
        if num == 0 {
            return Err(GraspError::invalid_parameter("num", "must be at least 1"));
        }

        let batch_size = num.saturating_mul(self.oversample);
        let mut pairs = Vec::with_capacity(num);
        let mut batches = 0;

        while pairs.len() < num {
            if self.max_batches.is_some_and(|max| batches >= max) {
                return Err(GraspError::SamplingExhausted {
                    stage: "contact search",
                    attempts: batches,
                    found: pairs.len(),
                    requested: num,
                });
            }
            batches += 1;

            let before = pairs.len();
            self.search_batch(index, batch_size, num, rng, &mut pairs)?;
            debug!(
                batch = batches,
                accepted = pairs.len() - before,
                total = pairs.len(),
                requested = num,
                "Contact search batch"
            );
        }

        Ok(pairs)
    }

    fn search_batch<R: Rng + ?Sized>(
        &self,
        index: &MeshGeometryIndex,
        batch_size: usize,
        num: usize,
        rng: &mut R,
        pairs: &mut Vec<ContactPair>,
    ) -> GraspResult<()> {
        let samples = index.sample_surface(batch_size, rng);

        let normals = samples
            .iter()
            .map(|s| index.face_normal(index.closest_point(&s.position).face))
            .collect::<GeometryResult<Vec<_>>>()?;

        let directions = normals
            .iter()
            .map(|n| self.sampler.sample_one(&-n, rng))
            .collect::<GraspResult<Vec<_>>>()?;

        // Two rays per sample, forward then backward
        let origins: Vec<Point3<f64>> = samples
            .iter()
            .flat_map(|s| [s.position, s.position])
            .collect();
        let rays: Vec<Vector3<f64>> = directions.iter().flat_map(|d| [*d, -d]).collect();
        let hits = index.raycast(&origins, &rays)?;

        for (i, sample) in samples.iter().enumerate() {
            if pairs.len() >= num {
                break;
            }
            let candidates = hits[2 * i].iter().chain(&hits[2 * i + 1]).map(|h| h.point);
            if let Some(far) = farthest_contact(&sample.position, candidates, self.min_jaw_width) {
                pairs.push(ContactPair::new(sample.position, far));
            }
        }
        Ok(())
    }
}

/// Pick the candidate farthest from `origin`, ignoring any within `min_distance`.
///
/// Ties keep the earliest candidate.
///
/// # Example
///
/// ```
/// use grasp_antipodal::farthest_contact;
/// use grasp_types::Point3;
///
/// let origin = Point3::origin();
/// let hits = [Point3::new(1.0, 0.0, 0.0), Point3::new(-2.0, 0.0, 0.0)];
/// let far = farthest_contact(&origin, hits, 1e-9).unwrap();
/// assert_eq!(far, Point3::new(-2.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn farthest_contact<I>(
    origin: &Point3<f64>,
    candidates: I,
    min_distance: f64,
) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = Point3<f64>>,
{
    let mut best: Option<(f64, Point3<f64>)> = None;
    for p in candidates {
        let d = (p - origin).norm();
        if d > min_distance && best.is_none_or(|(bd, _)| d > bd) {
            best = Some((d, p));
        }
    }
    best.map(|(_, p)| p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_types::{cuboid, unit_cube};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn on_surface(index: &MeshGeometryIndex, p: &Point3<f64>) -> bool {
        index.closest_point(p).distance < 1e-9
    }

    #[test]
    fn farthest_contact_prefers_far_wall() {
        // Sample near the x=0 wall of the unit cube, ray along +x and -x
        let index = MeshGeometryIndex::new(unit_cube()).expect("valid cube");
        let origin = Point3::new(0.0, 0.3, 0.6);
        let forward = index.raycast_one(&origin, &Vector3::x());
        let backward = index.raycast_one(&origin, &-Vector3::x());
        let candidates = forward.iter().chain(&backward).map(|h| h.point);

        let far = farthest_contact(&origin, candidates, 1e-9).expect("hit");
        assert_relative_eq!(far, Point3::new(1.0, 0.3, 0.6), epsilon = 1e-12);
    }

    #[test]
    fn farthest_contact_picks_second_of_two_hits() {
        // From outside the cube the ray enters at d1 = 1 and leaves at d2 = 2
        let index = MeshGeometryIndex::new(unit_cube()).expect("valid cube");
        let origin = Point3::new(-1.0, 0.3, 0.6);
        let hits = index.raycast_one(&origin, &Vector3::x());
        assert_eq!(hits.len(), 2);
        assert!(hits[0].distance < hits[1].distance);

        let far = farthest_contact(&origin, hits.iter().map(|h| h.point), 1e-9).expect("hit");
        assert_relative_eq!((far - origin).norm(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn farthest_contact_ties_keep_first() {
        let origin = Point3::origin();
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(farthest_contact(&origin, [a, b], 0.0), Some(a));
    }

    #[test]
    fn farthest_contact_ignores_self_hits() {
        let origin = Point3::new(0.5, 0.5, 0.0);
        assert_eq!(farthest_contact(&origin, [origin], 1e-9), None);
        assert_eq!(farthest_contact(&origin, std::iter::empty(), 1e-9), None);
    }

    #[test]
    fn finds_exact_count_on_surface() {
        let index = MeshGeometryIndex::new(cuboid(1.0, 2.0, 0.5)).expect("valid");
        let finder = ContactPairFinder::new(&AntipodalParams::default()).expect("valid");
        let mut rng = StdRng::seed_from_u64(21);
        let pairs = finder.find(&index, 25, &mut rng).expect("convex box");

        assert_eq!(pairs.len(), 25);
        for pair in &pairs {
            assert!(on_surface(&index, &pair.first));
            assert!(on_surface(&index, &pair.second));
            assert!(pair.width() > 1e-9);
        }
    }

    #[test]
    fn high_kappa_pairs_cross_the_box() {
        // With directions pinned to the inward normal, contacts sit on opposite walls
        let index = MeshGeometryIndex::new(unit_cube()).expect("valid cube");
        let params = AntipodalParams::default().with_kappa(1e12);
        let finder = ContactPairFinder::new(&params).expect("valid");
        let mut rng = StdRng::seed_from_u64(5);
        for pair in finder.find(&index, 20, &mut rng).expect("cube") {
            assert!(pair.width() > 0.999);
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        let index = MeshGeometryIndex::new(unit_cube()).expect("valid cube");
        let finder = ContactPairFinder::new(&AntipodalParams::default()).expect("valid");
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            finder.find(&index, 0, &mut rng),
            Err(GraspError::InvalidParameter { name: "num", .. })
        ));
    }

    #[test]
    fn open_sheet_exhausts_budget() {
        // A single triangle has no opposite wall, so no ray ever finds a second contact
        let sheet = grasp_types::IndexedMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let index = MeshGeometryIndex::new(sheet).expect("valid");
        let params = AntipodalParams::default().with_max_batches(Some(3));
        let finder = ContactPairFinder::new(&params).expect("valid");
        let mut rng = StdRng::seed_from_u64(0);
        let err = finder.find(&index, 4, &mut rng).expect_err("no pairs");
        assert!(matches!(
            err,
            GraspError::SamplingExhausted {
                attempts: 3,
                found: 0,
                requested: 4,
                ..
            }
        ));
    }
}
