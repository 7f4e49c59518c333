//! # SO(3), the special orthogonal group in 3D
//!
//! SO(3) is the group of 3D rotations: 3×3 orthogonal matrices with
//! determinant +1. It has 3 degrees of freedom.
//!
//! ## Internal representation
//!
//! [`SO3F64`] stores a unit quaternion. Unit quaternions double cover SO(3):
//! `q` and `-q` are the same rotation. This type removes the ambiguity by
//! keeping the quaternion in canonical sign (`w ≥ 0`, see
//! [`canonicalize_quaternion`]), so two values built from the same rotation
//! compare equal component-wise.
//!
//! ## The exp/log maps
//!
//! The tangent space so(3) is identified with R³ through [`SO3F64::hat`]. A
//! rotation vector `v` has the rotation axis as direction and the angle in
//! radians as magnitude.
//!
//! - `exp(v)`: `q = (sin(θ/2)·v/θ, cos(θ/2))`.
//! - `log()`: inverse of exp, with the angle in `[0, π]`.
//!
//! Both switch to Taylor expansions below the small-angle threshold, so
//! `exp(0)` is the identity and `log(identity)` is the zero vector, exactly.
//!
//! ## Jacobians
//!
//! The left and right Jacobians relate a small perturbation of the tangent
//! vector to the induced perturbation of the rotation:
//!
//! ```text
//! exp(v + δ) ≈ exp(J_l(v)·δ) ∘ exp(v) ≈ exp(v) ∘ exp(J_r(v)·δ)
//! ```

use crate::error::LieError;
use crate::interpolate::slerp;
use crate::rotation::{
    canonicalize_quaternion, matrix_to_angle_axis, matrix_to_quaternion, quaternion_to_matrix,
    skew, unskew, AngleAxis, EulerAngles, EulerConvention,
};
use crate::scalar::{one_minus_cos_over_x2, x_minus_sin_over_x3, SMALL_ANGLE_EPSILON};
use crate::tolerance::{Tolerance, Validation};
use glam::{DMat3, DMat4, DQuat, DVec3};
use rand::Rng;
use spatialmath_linalg::{orthogonality_error, polar_rotation};

/// A 3D rotation, stored as a unit quaternion in canonical sign.
///
/// See the [module-level documentation](self) for details.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SO3F64 {
    q: DQuat,
}

/// Coefficient of `[v]ₓ²` in the inverse left Jacobian,
/// `1/θ² − cos(θ/2)/(2θ·sin(θ/2))`, equal to 1/12 at the origin.
fn inverse_jacobian_coeff(theta: f64) -> f64 {
    if theta.abs() < 1e-3 {
        1.0 / 12.0 + theta * theta / 720.0
    } else {
        let half = 0.5 * theta;
        1.0 / (theta * theta) - half.cos() / (2.0 * theta * half.sin())
    }
}

impl SO3F64 {
    /// The zero rotation.
    pub const IDENTITY: Self = Self { q: DQuat::IDENTITY };

    /// Wrap a quaternion without checking its norm.
    ///
    /// PRECONDITION: `quat` is unit length. The sign is canonicalized.
    #[inline]
    pub fn from_quaternion_unchecked(quat: DQuat) -> Self {
        Self {
            q: canonicalize_quaternion(quat),
        }
    }

    /// Create from a unit quaternion, validated with the default tolerance.
    pub fn from_quaternion(quat: DQuat) -> Result<Self, LieError> {
        Self::from_quaternion_with(quat, &Tolerance::default(), Validation::Strict)
    }

    /// Create from a quaternion, validating its norm against `tol.unit_norm`.
    ///
    /// With [`Validation::Normalize`] a non-unit quaternion is normalized.
    /// A zero quaternion is rejected in both modes.
    pub fn from_quaternion_with(
        quat: DQuat,
        tol: &Tolerance,
        validation: Validation,
    ) -> Result<Self, LieError> {
        if !quat.is_finite() {
            return Err(LieError::NonFinite);
        }
        let norm = quat.length();
        if (norm - 1.0).abs() <= tol.unit_norm {
            // stored quaternion is always unit length
            return Ok(Self::from_quaternion_unchecked(quat / norm));
        }
        match validation {
            Validation::Normalize if norm > f64::EPSILON => {
                log::debug!("normalizing quaternion with norm {norm}");
                Ok(Self::from_quaternion_unchecked(quat / norm))
            }
            _ => Err(LieError::NonUnitQuaternion { norm }),
        }
    }

    /// Create from `[x, y, z, w]`, validated with the default tolerance.
    pub fn from_array(arr: [f64; 4]) -> Result<Self, LieError> {
        Self::from_quaternion(DQuat::from_array(arr))
    }

    /// Quaternion components `[x, y, z, w]`.
    pub fn to_array(&self) -> [f64; 4] {
        self.q.to_array()
    }

    /// Create from a rotation matrix, validated with the default tolerance.
    pub fn from_matrix(mat: &DMat3) -> Result<Self, LieError> {
        Self::from_matrix_with(mat, &Tolerance::default(), Validation::Strict)
    }

    /// Create from a 3x3 matrix checked for orthonormality and `det = +1`.
    ///
    /// With [`Validation::Normalize`] a near-orthonormal matrix is projected
    /// to the closest rotation. Reflections (`det < 0`) are rejected in both
    /// modes.
    pub fn from_matrix_with(
        mat: &DMat3,
        tol: &Tolerance,
        validation: Validation,
    ) -> Result<Self, LieError> {
        if !mat.is_finite() {
            return Err(LieError::NonFinite);
        }
        let determinant = mat.determinant();
        let error = orthogonality_error(mat);
        if error <= tol.orthogonality && (determinant - 1.0).abs() <= tol.determinant {
            return Ok(Self::from_matrix_unchecked(mat));
        }
        if validation == Validation::Strict || determinant <= 0.0 {
            if error > tol.orthogonality && determinant > 0.0 {
                return Err(LieError::NonOrthogonalMatrix { error });
            }
            return Err(LieError::ImproperRotation { determinant });
        }
        log::debug!("projecting matrix onto SO3, orthogonality error {error}");
        let projected = polar_rotation(mat)?;
        Ok(Self::from_matrix_unchecked(&projected))
    }

    /// Convert a matrix without validating it.
    ///
    /// PRECONDITION: `mat` is a rotation matrix.
    #[inline]
    pub fn from_matrix_unchecked(mat: &DMat3) -> Self {
        Self {
            q: matrix_to_quaternion(mat),
        }
    }

    /// Rotation part of a homogeneous transform, validated with the default tolerance.
    pub fn from_matrix4(mat: &DMat4) -> Result<Self, LieError> {
        Self::from_matrix(&DMat3::from_mat4(*mat))
    }

    /// Rotation about a unit axis.
    pub fn from_axis_angle(axis: DVec3, angle: f64) -> Result<Self, LieError> {
        Ok(Self::from_angle_axis(&AngleAxis::new(axis, angle)?))
    }

    /// Rotation of an [`AngleAxis`].
    #[inline]
    pub fn from_angle_axis(aa: &AngleAxis) -> Self {
        Self {
            q: aa.to_quaternion(),
        }
    }

    /// Rotation of an Euler angle triple.
    pub fn from_euler(euler: &EulerAngles) -> Self {
        Self::from_matrix_unchecked(&euler.to_matrix())
    }

    /// Rotation of a rotation vector, axis times angle. Same as [`Self::exp`].
    #[inline]
    pub fn from_rotation_vector(v: DVec3) -> Self {
        Self::exp(v)
    }

    /// Rotation about the X axis.
    pub fn rot_x(angle: f64) -> Self {
        Self::exp(DVec3::X * angle)
    }

    /// Rotation about the Y axis.
    pub fn rot_y(angle: f64) -> Self {
        Self::exp(DVec3::Y * angle)
    }

    /// Rotation about the Z axis.
    pub fn rot_z(angle: f64) -> Self {
        Self::exp(DVec3::Z * angle)
    }

    /// Sample a rotation uniformly over SO(3).
    pub fn from_random() -> Self {
        let mut rng = rand::rng();

        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let r3: f64 = rng.random();

        // Shoemake's uniform random quaternion
        let one_minus_r1_sqrt = (1.0 - r1).sqrt();
        let r1_sqrt = r1.sqrt();

        let w = one_minus_r1_sqrt * (2.0 * std::f64::consts::PI * r2).cos();
        let x = one_minus_r1_sqrt * (2.0 * std::f64::consts::PI * r2).sin();
        let y = r1_sqrt * (2.0 * std::f64::consts::PI * r3).cos();
        let z = r1_sqrt * (2.0 * std::f64::consts::PI * r3).sin();

        Self::from_quaternion_unchecked(DQuat::from_xyzw(x, y, z, w).normalize())
    }

    /// The unit quaternion, `w ≥ 0`.
    #[inline]
    pub fn quaternion(&self) -> DQuat {
        self.q
    }

    /// 3x3 rotation matrix.
    pub fn matrix(&self) -> DMat3 {
        quaternion_to_matrix(self.q)
    }

    /// Axis and angle, angle in `[0, π]`. The identity gives [`AngleAxis::ZERO`].
    pub fn to_angle_axis(&self) -> AngleAxis {
        AngleAxis::from_rotation_vector(self.log())
    }

    /// Rotation vector with norm in `[0, π]`. Same as [`Self::log`].
    #[inline]
    pub fn rotation_vector(&self) -> DVec3 {
        self.log()
    }

    /// Euler angles in the given convention.
    pub fn to_euler(&self, convention: EulerConvention) -> EulerAngles {
        EulerAngles::from_matrix(&self.matrix(), convention)
    }

    /// Axis and angle through the matrix route, honoring `tol.near_pi`.
    pub fn to_angle_axis_with(&self, tol: &Tolerance) -> AngleAxis {
        matrix_to_angle_axis(&self.matrix(), tol)
    }

    /// Right plus, `self ∘ exp(tau)`.
    #[inline]
    pub fn rplus(&self, tau: DVec3) -> Self {
        *self * SO3F64::exp(tau)
    }

    /// Right minus, `log(self⁻¹ ∘ other)`.
    #[inline]
    pub fn rminus(&self, other: &Self) -> DVec3 {
        (self.inverse() * *other).log()
    }

    /// Left plus, `exp(tau) ∘ x`.
    #[inline]
    pub fn lplus(tau: DVec3, x: &Self) -> Self {
        SO3F64::exp(tau) * *x
    }

    /// Left minus, `log(y ∘ x⁻¹)`.
    #[inline]
    pub fn lminus(y: &Self, x: &Self) -> DVec3 {
        (*y * x.inverse()).log()
    }

    /// The adjoint of SO(3) is its rotation matrix.
    pub fn adjoint(&self) -> DMat3 {
        self.matrix()
    }

    /// Conjugate quaternion.
    pub fn inverse(&self) -> Self {
        Self::from_quaternion_unchecked(self.q.conjugate())
    }

    /// Rotate a vector.
    #[inline]
    pub fn act(&self, v: DVec3) -> DVec3 {
        self.q * v
    }

    /// Rotate a 3x3 covariance, `R·Σ·Rᵀ`.
    pub fn act_covariance(&self, cov: &DMat3) -> DMat3 {
        let r = self.matrix();
        r * *cov * r.transpose()
    }

    /// Exponential map, rotation vector to rotation.
    pub fn exp(v: DVec3) -> Self {
        let theta_sq = v.dot(v);
        let theta = theta_sq.sqrt();
        let theta_half = 0.5 * theta;

        let (w, b) = if theta < SMALL_ANGLE_EPSILON {
            // taylor series of cos(x/2) and sin(x/2)/x around 0
            (1.0 - theta_sq / 8.0, 0.5 - theta_sq / 48.0)
        } else {
            (theta_half.cos(), theta_half.sin() / theta)
        };

        let xyz = b * v;
        Self::from_quaternion_unchecked(DQuat::from_xyzw(xyz.x, xyz.y, xyz.z, w))
    }

    /// Logarithm map, rotation to rotation vector with norm in `[0, π]`.
    pub fn log(&self) -> DVec3 {
        // canonical sign keeps w >= 0, so the half angle lies in [0, π/2]
        let w = self.q.w;
        let vec = DVec3::new(self.q.x, self.q.y, self.q.z);
        let n = vec.length();

        if n > SMALL_ANGLE_EPSILON {
            let theta = 2.0 * n.atan2(w);
            vec * (theta / n)
        } else {
            vec * (2.0 / w)
        }
    }

    /// Rotation vector to skew-symmetric matrix.
    pub fn hat(v: DVec3) -> DMat3 {
        skew(v)
    }

    /// Skew-symmetric matrix to rotation vector.
    pub fn vee(omega: &DMat3) -> DVec3 {
        unskew(omega)
    }

    /// Left Jacobian `J_l(v) = I + (1 − cos θ)/θ²·[v]ₓ + (θ − sin θ)/θ³·[v]ₓ²`.
    pub fn left_jacobian(v: DVec3) -> DMat3 {
        let skew = Self::hat(v);
        let theta = v.length();
        DMat3::IDENTITY
            + one_minus_cos_over_x2(theta) * skew
            + x_minus_sin_over_x3(theta) * (skew * skew)
    }

    /// Right Jacobian, `J_r(v) = J_l(−v)`.
    pub fn right_jacobian(v: DVec3) -> DMat3 {
        Self::left_jacobian(-v)
    }

    /// Inverse of the left Jacobian,
    /// `I − ½[v]ₓ + (1/θ² − (1 + cos θ)/(2θ sin θ))·[v]ₓ²`.
    ///
    /// Singular at `θ = 2π`; finite everywhere on the log's range `[0, π]`.
    pub fn left_jacobian_inverse(v: DVec3) -> DMat3 {
        let skew = Self::hat(v);
        let theta = v.length();
        DMat3::IDENTITY - 0.5 * skew + inverse_jacobian_coeff(theta) * (skew * skew)
    }

    /// Inverse of the right Jacobian, `J_r⁻¹(v) = J_l⁻¹(−v)`.
    pub fn right_jacobian_inverse(v: DVec3) -> DMat3 {
        Self::left_jacobian_inverse(-v)
    }

    /// Spherical linear interpolation, `s = 0` gives `self`, `s = 1` gives `other`.
    ///
    /// Always follows the shortest arc.
    pub fn slerp(&self, other: &Self, s: f64) -> Self {
        Self::from_quaternion_unchecked(slerp(self.q, other.q, s))
    }

    /// Rotation angle of `self⁻¹ ∘ other`, in `[0, π]`.
    pub fn angular_distance(&self, other: &Self) -> f64 {
        self.rminus(other).length()
    }

    /// Whether the quaternions agree within `tol`, up to sign.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.q.abs_diff_eq(other.q, tol) || self.q.abs_diff_eq(-other.q, tol)
    }

    /// [`Self::approx_eq`] with [`Tolerance::comparison`] of the default tolerance.
    pub fn approx_eq_default(&self, other: &Self) -> bool {
        self.approx_eq(other, Tolerance::default().comparison)
    }
}

impl Default for SO3F64 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SO3F64> for SO3F64 {
    type Output = SO3F64;

    fn mul(self, rhs: Self) -> Self::Output {
        // renormalize to keep long chains of products on the unit sphere
        Self::from_quaternion_unchecked((self.q * rhs.q).normalize())
    }
}

impl std::ops::MulAssign<SO3F64> for SO3F64 {
    #[inline]
    fn mul_assign(&mut self, rhs: SO3F64) {
        *self = *self * rhs;
    }
}

impl std::ops::Mul<DVec3> for SO3F64 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.act(rhs)
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for SO3F64 {
    type Epsilon = f64;

    #[inline]
    fn default_epsilon() -> Self::Epsilon {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.approx_eq(other, epsilon)
    }
}

#[cfg(feature = "approx")]
impl approx::RelativeEq for SO3F64 {
    #[inline]
    fn default_max_relative() -> Self::Epsilon {
        <f64 as approx::RelativeEq>::default_max_relative()
    }

    #[inline]
    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        let a = self.q.to_array();
        let same = |b: [f64; 4]| {
            a.iter()
                .zip(b.iter())
                .all(|(x, y)| approx::RelativeEq::relative_eq(x, y, epsilon, max_relative))
        };
        same(other.q.to_array()) || same((-other.q).to_array())
    }
}
