use crate::rotation::EulerConvention;
use spatialmath_linalg::LinalgError;
use thiserror::Error;

/// Error type for constructing and converting rotations and poses.
///
/// Degenerate but well-defined inputs (zero rotation angle, angle of π,
/// gimbal lock) are never errors; those return documented canonical values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LieError {
    /// The matrix is not orthonormal within tolerance.
    #[error("matrix is not orthonormal: |RᵀR - I| = {error}")]
    NonOrthogonalMatrix {
        /// Frobenius norm of `RᵀR − I`.
        error: f64,
    },

    /// The matrix is orthonormal but is a reflection (or otherwise has det != +1).
    #[error("matrix is not a proper rotation: det = {determinant}")]
    ImproperRotation {
        /// Determinant of the candidate matrix.
        determinant: f64,
    },

    /// A quaternion expected to be unit length is not.
    #[error("quaternion is not unit norm: |q| = {norm}")]
    NonUnitQuaternion {
        /// Norm of the candidate quaternion.
        norm: f64,
    },

    /// The complex number of a planar rotation is not unit length.
    #[error("complex number is not unit norm: |z| = {norm}")]
    NonUnitComplex {
        /// Norm of the candidate complex number.
        norm: f64,
    },

    /// A rotation axis expected to be unit length is not.
    #[error("rotation axis is not unit norm: |axis| = {norm}")]
    NonUnitAxis {
        /// Norm of the candidate axis.
        norm: f64,
    },

    /// The last row of a homogeneous transform is not `[0, ..., 0, 1]`.
    #[error("{dim}x{dim} homogeneous matrix has invalid bottom row {row:?}")]
    InvalidHomogeneousRow {
        /// Matrix dimension, 3 for planar and 4 for spatial transforms.
        dim: usize,
        /// The offending bottom row, zero-padded past `dim` entries.
        row: [f64; 4],
    },

    /// A dual quaternion is not a unit dual quaternion.
    #[error(
        "dual quaternion is not unit: |real| = {real_norm}, real·dual = {orthogonality}"
    )]
    NonUnitDualQuaternion {
        /// Norm of the real part.
        real_norm: f64,
        /// Dot product between real and dual parts, zero for unit dual quaternions.
        orthogonality: f64,
    },

    /// The input contains NaN or infinite values.
    #[error("input contains non-finite values")]
    NonFinite,

    /// Two Euler-angle values with different conventions were combined.
    #[error("euler convention mismatch: expected {expected}, got {actual}")]
    ConventionMismatch {
        /// Convention of the left operand.
        expected: EulerConvention,
        /// Convention of the right operand.
        actual: EulerConvention,
    },

    /// A Jacobian was inverted at one of its singular configurations.
    #[error("jacobian is singular: {reason}")]
    SingularJacobian {
        /// Which configuration caused the singularity.
        reason: String,
    },

    /// A trajectory or spline has fewer poses than it needs.
    #[error("at least {required} poses are required, got {actual}")]
    TooFewPoses {
        /// Minimum number of poses.
        required: usize,
        /// Number of poses given.
        actual: usize,
    },

    /// Trajectory sample times are not strictly increasing.
    #[error("trajectory times must be strictly increasing, violated at index {index}")]
    NonIncreasingTimes {
        /// First index whose time is not greater than the previous one.
        index: usize,
    },

    /// Re-orthonormalization of a matrix failed.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

impl LieError {
    /// Whether the error reports an invalid rotation/pose parameterization,
    /// as opposed to a convention or singularity problem.
    pub fn is_invalid_representation(&self) -> bool {
        matches!(
            self,
            LieError::NonOrthogonalMatrix { .. }
                | LieError::ImproperRotation { .. }
                | LieError::NonUnitQuaternion { .. }
                | LieError::NonUnitComplex { .. }
                | LieError::NonUnitAxis { .. }
                | LieError::InvalidHomogeneousRow { .. }
                | LieError::NonUnitDualQuaternion { .. }
                | LieError::NonFinite
                | LieError::Linalg(_)
        )
    }
}
