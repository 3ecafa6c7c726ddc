//! Von Mises-Fisher sampling of directions on the unit sphere.
//!
//! The cosine `w` between a sample and the mean direction has density
//! proportional to `exp(kappa * w)` on `[-1, 1]`, which inverts in closed
//! form on the 2-sphere:
//!
//! ```text
//! w = 1 + ln(1 - s * (1 - exp(-2 kappa))) / kappa,   s ~ U[0, 1)
//! ```
//!
//! The tangential angle is uniform, so no rejection loop is needed.

use std::f64::consts::TAU;

use nalgebra::Vector3;
use rand::Rng;

use crate::error::{GraspError, GraspResult};

/// Draws unit vectors concentrated around a mean direction.
///
/// # Example
///
/// ```
/// use grasp_antipodal::DirectionalSampler;
/// use nalgebra::Vector3;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let sampler = DirectionalSampler::new(1e6).unwrap();
/// let mut rng = StdRng::seed_from_u64(1);
/// let dirs = sampler.sample(&Vector3::z(), 10, &mut rng).unwrap();
/// assert!(dirs.iter().all(|d| d.z > 0.99));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalSampler {
    kappa: f64,
    // 1 - exp(-2 kappa), precomputed without cancellation
    span: f64,
}

impl DirectionalSampler {
    /// Create a sampler with concentration `kappa`.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidParameter`] if `kappa` is negative or NaN.
    pub fn new(kappa: f64) -> GraspResult<Self> {
        if kappa.is_nan() || kappa < 0.0 {
            return Err(GraspError::invalid_parameter(
                "kappa",
                format!("must be non-negative, got {kappa}"),
            ));
        }
        Ok(Self {
            kappa,
            span: -(-2.0 * kappa).exp_m1(),
        })
    }

    /// Concentration parameter.
    #[must_use]
    pub const fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Draw `n` directions around `mean`.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidParameter`] if `mean` is zero or not finite.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        mean: &Vector3<f64>,
        n: usize,
        rng: &mut R,
    ) -> GraspResult<Vec<Vector3<f64>>> {
        let (mu, e1, e2) = frame_around(mean)?;
        Ok((0..n).map(|_| self.draw(&mu, &e1, &e2, rng)).collect())
    }

    /// Draw a single direction around `mean`.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidParameter`] if `mean` is zero or not finite.
    pub fn sample_one<R: Rng + ?Sized>(
        &self,
        mean: &Vector3<f64>,
        rng: &mut R,
    ) -> GraspResult<Vector3<f64>> {
        let (mu, e1, e2) = frame_around(mean)?;
        Ok(self.draw(&mu, &e1, &e2, rng))
    }

    fn draw<R: Rng + ?Sized>(
        &self,
        mu: &Vector3<f64>,
        e1: &Vector3<f64>,
        e2: &Vector3<f64>,
        rng: &mut R,
    ) -> Vector3<f64> {
        let s: f64 = rng.r#gen();
        let w = if self.kappa > 0.0 {
            1.0 + (-s * self.span).ln_1p() / self.kappa
        } else {
            1.0 - 2.0 * s
        };
        let w = w.clamp(-1.0, 1.0);

        let phi = TAU * rng.r#gen::<f64>();
        let r = (1.0 - w * w).max(0.0).sqrt();
        let v = mu * w + (e1 * phi.cos() + e2 * phi.sin()) * r;
        v.try_normalize(0.0).unwrap_or(*mu)
    }
}

/// Unit mean plus two unit tangents completing a right-handed basis.
fn frame_around(
    mean: &Vector3<f64>,
) -> GraspResult<(Vector3<f64>, Vector3<f64>, Vector3<f64>)> {
    let mu = mean
        .try_normalize(f64::EPSILON)
        .filter(|m| m.iter().all(|c| c.is_finite()))
        .ok_or_else(|| {
            GraspError::invalid_parameter("mean_direction", "must be a finite non-zero vector")
        })?;

    // Cross with the axis least aligned to the mean for a well-conditioned tangent
    let abs = mu.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let e1 = mu.cross(&axis).normalize();
    let e2 = mu.cross(&e1);
    Ok((mu, e1, e2))
}
