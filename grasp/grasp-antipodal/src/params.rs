//! Parameters for antipodal grasp sampling.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GraspError, GraspResult};

/// Parameters for [`AntipodalGraspGenerator`](crate::AntipodalGraspGenerator).
///
/// # Example
///
/// ```
/// use grasp_antipodal::AntipodalParams;
///
/// let params = AntipodalParams::default();
/// assert!((params.kappa - 10.0).abs() < 1e-12);
/// assert_eq!(params.oversample, 2);
///
/// let seeded = AntipodalParams::default().with_kappa(50.0).with_seed(7);
/// assert_eq!(seeded.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AntipodalParams {
    /// Concentration of the direction perturbation around the inward
    /// normal. Zero is uniform on the sphere; larger is tighter.
    pub kappa: f64,

    /// Surface points drawn per contact-search batch, as a multiple of the
    /// number of grasps requested.
    pub oversample: usize,

    /// Contact-search batches before giving up. `None` searches until done.
    pub max_batches: Option<usize>,

    /// Resampling rounds for degenerate gripper frames. `None` retries
    /// until every frame is valid.
    pub max_frame_attempts: Option<usize>,

    /// Contacts at or closer than this distance are not a second jaw.
    pub min_jaw_width: f64,

    /// Seed for the random stream. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for AntipodalParams {
    fn default() -> Self {
        Self {
            kappa: 10.0,
            oversample: 2,
            max_batches: Some(10_000),
            max_frame_attempts: Some(1_000),
            min_jaw_width: 1e-9,
            seed: None,
        }
    }
}

impl AntipodalParams {
    /// Set the concentration parameter.
    #[must_use]
    pub const fn with_kappa(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    /// Set the oversampling factor.
    #[must_use]
    pub const fn with_oversample(mut self, oversample: usize) -> Self {
        self.oversample = oversample;
        self
    }

    /// Set the contact-search batch budget.
    #[must_use]
    pub const fn with_max_batches(mut self, max_batches: Option<usize>) -> Self {
        self.max_batches = max_batches;
        self
    }

    /// Set the frame resampling budget.
    #[must_use]
    pub const fn with_max_frame_attempts(mut self, attempts: Option<usize>) -> Self {
        self.max_frame_attempts = attempts;
        self
    }

    /// Set the minimum jaw opening.
    #[must_use]
    pub const fn with_min_jaw_width(mut self, width: f64) -> Self {
        self.min_jaw_width = width;
        self
    }

    /// Fix the random seed for reproducible output.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> GraspResult<()> {
        if self.kappa.is_nan() || self.kappa < 0.0 {
            return Err(GraspError::invalid_parameter(
                "kappa",
                format!("must be non-negative, got {}", self.kappa),
            ));
        }
        if self.oversample == 0 {
            return Err(GraspError::invalid_parameter("oversample", "must be at least 1"));
        }
        if self.max_batches == Some(0) {
            return Err(GraspError::invalid_parameter("max_batches", "must be at least 1"));
        }
        if self.max_frame_attempts == Some(0) {
            return Err(GraspError::invalid_parameter(
                "max_frame_attempts",
                "must be at least 1",
            ));
        }
        if !self.min_jaw_width.is_finite() || self.min_jaw_width < 0.0 {
            return Err(GraspError::invalid_parameter(
                "min_jaw_width",
                format!("must be finite and non-negative, got {}", self.min_jaw_width),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        AntipodalParams::default().validate().expect("defaults");
    }

    #[test]
    fn builders_set_fields() {
        let params = AntipodalParams::default()
            .with_kappa(0.0)
            .with_oversample(4)
            .with_max_batches(None)
            .with_max_frame_attempts(Some(3))
            .with_min_jaw_width(0.01)
            .with_seed(42);
        assert!(params.kappa.abs() < f64::EPSILON);
        assert_eq!(params.oversample, 4);
        assert_eq!(params.max_batches, None);
        assert_eq!(params.max_frame_attempts, Some(3));
        assert_eq!(params.seed, Some(42));
        params.validate().expect("valid");
    }

    #[test]
    fn rejects_bad_fields() {
        let cases = [
            (AntipodalParams::default().with_kappa(-1.0), "kappa"),
            (AntipodalParams::default().with_kappa(f64::NAN), "kappa"),
            (AntipodalParams::default().with_oversample(0), "oversample"),
            (AntipodalParams::default().with_max_batches(Some(0)), "max_batches"),
            (
                AntipodalParams::default().with_max_frame_attempts(Some(0)),
                "max_frame_attempts",
            ),
            (AntipodalParams::default().with_min_jaw_width(-1.0), "min_jaw_width"),
        ];
        for (params, field) in cases {
            match params.validate() {
                Err(GraspError::InvalidParameter { name, .. }) => assert_eq!(name, field),
                other => panic!("expected InvalidParameter for {field}, got {other:?}"),
            }
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let params: AntipodalParams =
            serde_json::from_str(r#"{"kappa": 3.5, "seed": 9}"#).expect("parse");
        assert!((params.kappa - 3.5).abs() < 1e-12);
        assert_eq!(params.seed, Some(9));
        assert_eq!(params.oversample, 2);
    }
}
