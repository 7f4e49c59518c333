use crate::error::LieError;
use crate::scalar::wrap_to_pi;
use crate::tolerance::{Tolerance, Validation};
use glam::{DMat2, DVec2};
use rand::Rng;
use std::f64::consts::TAU;

/// A planar rotation, stored as a unit complex number `z = cos θ + i·sin θ`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SO2F64 {
    /// representing complex number [real, imaginary]
    z: DVec2,
}

impl SO2F64 {
    /// The zero rotation.
    pub const IDENTITY: Self = Self {
        z: DVec2::new(1.0, 0.0),
    };

    /// Rotation by `theta` radians.
    #[inline]
    pub fn from_angle(theta: f64) -> Self {
        Self::exp(theta)
    }

    /// Create from a unit complex number, validated with the default tolerance.
    pub fn from_complex(z: DVec2) -> Result<Self, LieError> {
        Self::from_complex_with(z, &Tolerance::default(), Validation::Strict)
    }

    /// Create from a complex number, validating its norm against `tol.unit_norm`.
    pub fn from_complex_with(
        z: DVec2,
        tol: &Tolerance,
        validation: Validation,
    ) -> Result<Self, LieError> {
        if !z.is_finite() {
            return Err(LieError::NonFinite);
        }
        let norm = z.length();
        if (norm - 1.0).abs() <= tol.unit_norm {
            return Ok(Self { z: z / norm });
        }
        match validation {
            Validation::Normalize if norm > f64::EPSILON => {
                log::debug!("normalizing SO2 complex number with norm {norm}");
                Ok(Self { z: z / norm })
            }
            _ => Err(LieError::NonUnitComplex { norm }),
        }
    }

    /// Create from a 2x2 rotation matrix, validated with the default tolerance.
    pub fn from_matrix(mat: &DMat2) -> Result<Self, LieError> {
        Self::from_matrix_with(mat, &Tolerance::default(), Validation::Strict)
    }

    /// Create from a 2x2 matrix checked for orthonormality and `det = +1`.
    ///
    /// With [`Validation::Normalize`] a near-orthonormal matrix is replaced by
    /// its closest rotation. Reflections are rejected in both modes.
    pub fn from_matrix_with(
        mat: &DMat2,
        tol: &Tolerance,
        validation: Validation,
    ) -> Result<Self, LieError> {
        if !mat.is_finite() {
            return Err(LieError::NonFinite);
        }
        let determinant = mat.determinant();
        if determinant <= 0.0 {
            return Err(LieError::ImproperRotation { determinant });
        }
        let residual = mat.transpose() * *mat - DMat2::IDENTITY;
        let error = residual
            .to_cols_array()
            .iter()
            .map(|v| v * v)
            .sum::<f64>()
            .sqrt();

        if error <= tol.orthogonality && (determinant - 1.0).abs() <= tol.determinant {
            return Ok(Self {
                z: mat.x_axis.normalize(),
            });
        }
        if validation == Validation::Strict {
            if error > tol.orthogonality {
                return Err(LieError::NonOrthogonalMatrix { error });
            }
            return Err(LieError::ImproperRotation { determinant });
        }

        log::debug!("projecting 2x2 matrix onto SO2, orthogonality error {error}");
        // closest rotation: angle of the (m00 + m11, m10 - m01) direction
        let c = mat.x_axis.x + mat.y_axis.y;
        let s = mat.x_axis.y - mat.y_axis.x;
        Ok(Self::exp(s.atan2(c)))
    }

    /// Create from a 2x2 matrix without validation, reading only its first column.
    pub fn from_matrix_unchecked(mat: &DMat2) -> Self {
        Self {
            z: mat.x_axis.normalize_or(DVec2::X),
        }
    }

    /// Sample a rotation with a uniformly distributed angle.
    pub fn from_random() -> Self {
        let mut rng = rand::rng();
        let theta: f64 = rng.random_range(0.0..TAU);
        Self::exp(theta)
    }

    /// The unit complex number `[cos θ, sin θ]`.
    #[inline]
    pub fn complex(&self) -> DVec2 {
        self.z
    }

    /// Rotation angle in `[-π, π]`.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.log()
    }

    /// 2x2 rotation matrix.
    pub fn matrix(&self) -> DMat2 {
        DMat2::from_cols_array(&[self.z.x, self.z.y, -self.z.y, self.z.x])
    }

    /// Right plus, `self ∘ exp(dtheta)`.
    #[inline]
    pub fn rplus(&self, dtheta: f64) -> Self {
        *self * SO2F64::exp(dtheta)
    }

    /// Right minus, `log(self⁻¹ ∘ other)`.
    #[inline]
    pub fn rminus(&self, other: &Self) -> f64 {
        (self.inverse() * *other).log()
    }

    /// Left plus, `exp(dtheta) ∘ x`.
    #[inline]
    pub fn lplus(dtheta: f64, x: &Self) -> Self {
        SO2F64::exp(dtheta) * *x
    }

    /// Left minus, `log(y ∘ x⁻¹)`.
    #[inline]
    pub fn lminus(y: &Self, x: &Self) -> f64 {
        (*y * x.inverse()).log()
    }

    /// Complex conjugate, exact for unit norm.
    pub fn inverse(&self) -> Self {
        Self {
            z: DVec2::new(self.z.x, -self.z.y),
        }
    }

    /// Rotate a vector.
    #[inline]
    pub fn act(&self, v: DVec2) -> DVec2 {
        *self * v
    }

    /// Rotate a 2x2 covariance, `R·Σ·Rᵀ`.
    pub fn act_covariance(&self, cov: &DMat2) -> DMat2 {
        let r = self.matrix();
        r * *cov * r.transpose()
    }

    /// The adjoint of a commutative group is the identity.
    pub fn adjoint(&self) -> f64 {
        1.0
    }

    /// Exponential map, angle to rotation.
    pub fn exp(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            z: DVec2::new(c, s),
        }
    }

    /// Logarithm map, rotation to angle in `[-π, π]`.
    pub fn log(&self) -> f64 {
        self.z.y.atan2(self.z.x)
    }

    /// Angle to skew-symmetric 2x2 matrix.
    pub fn hat(theta: f64) -> DMat2 {
        DMat2::from_cols_array(&[0.0, theta, -theta, 0.0])
    }

    /// Skew-symmetric 2x2 matrix to angle.
    pub fn vee(omega: &DMat2) -> f64 {
        omega.x_axis.y
    }

    /// Left Jacobian of SO(2).
    /// For SO(2), the Lie group is commutative, J_l(theta) = 1.
    pub fn left_jacobian() -> f64 {
        1.0
    }

    /// Right Jacobian of SO(2).
    /// For SO(2), the Lie group is commutative, J_r(theta) = 1.
    pub fn right_jacobian() -> f64 {
        1.0
    }

    /// Rotation at fraction `s` of the shortest arc from `self` to `other`.
    pub fn interpolate(&self, other: &Self, s: f64) -> Self {
        self.rplus(s * self.rminus(other))
    }

    /// Absolute rotation angle of `self⁻¹ ∘ other`, in `[0, π]`.
    pub fn angular_distance(&self, other: &Self) -> f64 {
        self.rminus(other).abs()
    }

    /// Whether the two rotation angles differ by at most `tol` modulo 2π.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        wrap_to_pi(self.rminus(other)).abs() <= tol
    }

    /// [`Self::approx_eq`] with [`Tolerance::comparison`] of the default tolerance.
    pub fn approx_eq_default(&self, other: &Self) -> bool {
        self.approx_eq(other, Tolerance::default().comparison)
    }
}

impl Default for SO2F64 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<DVec2> for SO2F64 {
    type Output = DVec2;

    fn mul(self, rhs: DVec2) -> Self::Output {
        DVec2::new(
            self.z.x * rhs.x - self.z.y * rhs.y,
            self.z.y * rhs.x + self.z.x * rhs.y,
        )
    }
}

impl std::ops::Mul<SO2F64> for SO2F64 {
    type Output = SO2F64;

    fn mul(self, other: SO2F64) -> Self::Output {
        // (a + bi)(c + di) = (ac - bd) + (ad + bc)i
        let real = self.z.x * other.z.x - self.z.y * other.z.y;
        let imag = self.z.x * other.z.y + self.z.y * other.z.x;
        SO2F64 {
            z: DVec2::new(real, imag),
        }
    }
}

impl std::ops::MulAssign<SO2F64> for SO2F64 {
    fn mul_assign(&mut self, other: SO2F64) {
        *self = *self * other;
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for SO2F64 {
    type Epsilon = f64;

    #[inline]
    fn default_epsilon() -> Self::Epsilon {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.z.abs_diff_eq(other.z, epsilon)
    }
}
