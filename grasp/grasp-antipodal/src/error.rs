//! Error types for grasp synthesis.

use grasp_geometry::GeometryError;
use thiserror::Error;

/// Result type for grasp synthesis.
pub type GraspResult<T> = Result<T, GraspError>;

/// Errors that can occur during grasp synthesis.
#[derive(Debug, Error)]
pub enum GraspError {
    /// The mesh is malformed or degenerate.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A caller-supplied parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Contact arrays handed to the frame builder differ in length.
    #[error("contact arrays differ in length: {first} vs {second}")]
    LengthMismatch {
        /// Length of the first contact array.
        first: usize,
        /// Length of the second contact array.
        second: usize,
    },

    /// A contact pair whose two points coincide has no jaw axis.
    #[error("contact pair {index} has coincident points")]
    DegenerateContact {
        /// Index of the offending pair.
        index: usize,
    },

    /// A rejection-sampling loop ran out of its retry budget.
    #[error("{stage} exhausted after {attempts} attempts ({found} of {requested} found)")]
    SamplingExhausted {
        /// Which loop gave up.
        stage: &'static str,
        /// Attempts made before giving up.
        attempts: usize,
        /// Results accepted so far.
        found: usize,
        /// Results requested.
        requested: usize,
    },
}

impl GraspError {
    /// Create an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
