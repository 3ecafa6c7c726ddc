//! Gripper frame construction from contact pairs.
//!
//! The jaw axis runs from the first contact to the second. A random trial
//! vector fixes the rotation about that axis:
//!
//! ```text
//! approach = normalize(jaw x trial)
//! co       = approach x jaw
//! ```
//!
//! A trial parallel to the jaw gives a zero cross product. Only those
//! entries are redrawn; accepted frames are never touched again.

use grasp_types::{ContactPair, GraspPose, Point3, Vector3};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{GraspError, GraspResult};

/// Cross products with every component at or below this are degenerate.
pub const PARALLEL_TOLERANCE: f64 = 1e-8;

/// Builds right-handed gripper poses from contact pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GripperFrameBuilder {
    max_attempts: Option<usize>,
}

impl Default for GripperFrameBuilder {
    fn default() -> Self {
        Self {
            max_attempts: Some(1_000),
        }
    }
}

impl GripperFrameBuilder {
    /// Create a builder with a resampling budget. `None` retries until
    /// every frame is valid.
    #[must_use]
    pub const fn new(max_attempts: Option<usize>) -> Self {
        Self { max_attempts }
    }

    /// Build one pose per contact pair.
    ///
    /// # Errors
    ///
    /// See [`build_from_trials`](Self::build_from_trials).
    pub fn build_pairs<R: Rng + ?Sized>(
        &self,
        pairs: &[ContactPair],
        rng: &mut R,
    ) -> GraspResult<Vec<GraspPose>> {
        let (first, second): (Vec<_>, Vec<_>) = pairs.iter().map(|p| (p.first, p.second)).unzip();
        self.build(&first, &second, rng)
    }

    /// Build one pose per `(first[i], second[i])`, drawing fresh trial vectors.
    ///
    /// # Errors
    ///
    /// See [`build_from_trials`](Self::build_from_trials).
    pub fn build<R: Rng + ?Sized>(
        &self,
        first: &[Point3<f64>],
        second: &[Point3<f64>],
        rng: &mut R,
    ) -> GraspResult<Vec<GraspPose>> {
        let trials = (0..first.len()).map(|_| random_trial(rng)).collect();
        self.build_from_trials(first, second, trials, rng)
    }

    /// Build poses starting from caller-supplied trial vectors.
    ///
    /// Trials that are parallel to their jaw axis are redrawn from `rng`.
    ///
    /// # Errors
    ///
    /// - [`GraspError::LengthMismatch`] if the slices differ in length
    /// - [`GraspError::InvalidParameter`] if `trials` has the wrong length
    /// - [`GraspError::DegenerateContact`] if a pair's points coincide
    /// - [`GraspError::SamplingExhausted`] if the resampling budget runs out
    pub fn build_from_trials<R: Rng + ?Sized>(
        &self,
        first: &[Point3<f64>],
        second: &[Point3<f64>],
        mut trials: Vec<Vector3<f64>>,
        rng: &mut R,
    ) -> GraspResult<Vec<GraspPose>> {
        if first.len() != second.len() {
            return Err(GraspError::LengthMismatch {
                first: first.len(),
                second: second.len(),
            });
        }
        if trials.len() != first.len() {
            return Err(GraspError::invalid_parameter(
                "trials",
                format!("expected {} trial vectors, got {}", first.len(), trials.len()),
            ));
        }

        let jaws = first
            .iter()
            .zip(second)
            .enumerate()
            .map(|(index, (a, b))| {
                (b - a)
                    .try_normalize(0.0)
                    .ok_or(GraspError::DegenerateContact { index })
            })
            .collect::<GraspResult<Vec<_>>>()?;

        let mut crosses: Vec<Vector3<f64>> =
            jaws.iter().zip(&trials).map(|(j, t)| j.cross(t)).collect();
        let mut pending: Vec<usize> = (0..jaws.len())
            .filter(|&i| is_degenerate(&crosses[i]))
            .collect();

        if !pending.is_empty() {
            warn!(count = pending.len(), "Resampling degenerate gripper frames");
        }

        let mut attempts = 0;
        while !pending.is_empty() {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(GraspError::SamplingExhausted {
                    stage: "gripper frame",
                    attempts,
                    found: jaws.len() - pending.len(),
                    requested: jaws.len(),
                });
            }
            attempts += 1;

            for &i in &pending {
                trials[i] = random_trial(rng);
                crosses[i] = jaws[i].cross(&trials[i]);
            }
            pending.retain(|&i| is_degenerate(&crosses[i]));
        }
        if attempts > 0 {
            debug!(attempts, "Gripper frames resolved");
        }

        Ok(jaws
            .iter()
            .zip(&crosses)
            .zip(first.iter().zip(second))
            .map(|((jaw, cross), (a, b))| {
                let approach = cross.normalize();
                let co = approach.cross(jaw);
                let center = ContactPair::new(*a, *b).center();
                GraspPose::from_axes(*jaw, co, approach, center)
            })
            .collect())
    }
}

/// True when every component of `cross` is within [`PARALLEL_TOLERANCE`] of zero.
#[must_use]
pub fn is_degenerate(cross: &Vector3<f64>) -> bool {
    cross.iter().all(|c| c.abs() <= PARALLEL_TOLERANCE)
}

fn random_trial<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f64> {
    Vector3::new(rng.r#gen(), rng.r#gen(), rng.r#gen())
}
