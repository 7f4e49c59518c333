//! Numeric tolerances threaded explicitly through validating constructors.

/// Thresholds used to validate inputs and to pick numerically safe branches.
///
/// The defaults suit double precision values produced by ordinary
/// floating-point pipelines. Pass a custom value to the `*_with` constructors
/// to loosen or tighten them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance {
    /// Maximum Frobenius norm of `RᵀR − I` for an accepted rotation matrix.
    pub orthogonality: f64,
    /// Maximum `|det R − 1|` for an accepted rotation matrix.
    pub determinant: f64,
    /// Maximum `| |x| − 1 |` for accepted quaternions and rotation axes.
    pub unit_norm: f64,
    /// Rotation angles below this count as zero when an axis is extracted, and
    /// the axis is reported as `+X`. The Taylor switch inside exp/log and the
    /// Jacobians is the fixed [`crate::scalar::SMALL_ANGLE_EPSILON`].
    pub small_angle: f64,
    /// Gimbal lock is declared when the cosine (Tait–Bryan) or sine (proper
    /// Euler) of the middle angle falls below this value.
    pub gimbal: f64,
    /// Distance to π below which the matrix logarithm extracts the axis from
    /// the symmetric part of `R`.
    pub near_pi: f64,
    /// Absolute tolerance of the `approx_eq_default` closeness predicates.
    pub comparison: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            orthogonality: 1e-6,
            determinant: 1e-6,
            unit_norm: 1e-6,
            small_angle: 1e-8,
            gimbal: 1e-9,
            near_pi: 1e-6,
            comparison: 1e-9,
        }
    }
}

/// What a validating constructor does with an input that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validation {
    /// Reject the input with an error.
    #[default]
    Strict,
    /// Project the input back onto the group (normalize quaternions and axes,
    /// re-orthonormalize matrices) before accepting it. Non-finite and
    /// degenerate (zero-norm, rank-deficient) inputs are still rejected.
    Normalize,
}
