//! # SE(3), rigid transforms in 3D
//!
//! SE(3) is the semi-direct product SO(3) ⋉ R³: a rotation followed by a
//! translation, 6 degrees of freedom. [`SE3F64`] keeps the two parts
//! separate, an [`SO3F64`] and a translation vector.
//!
//! Tangent vectors are [`Twist3`] values ordered `[v, ω]`. With that order
//! the adjoint is
//!
//! ```text
//! Ad(R, t) = ⎡ R   [t]ₓR ⎤
//!            ⎣ 0     R   ⎦
//! ```
//!
//! and the exponential map is `exp(v, ω) = (exp(ω), J_l(ω)·v)` where `J_l`
//! is the left Jacobian of SO(3), the `V` matrix of the closed form.

use crate::dual_quaternion::UnitDualQuaternion;
use crate::error::LieError;
use crate::rotation::skew;
use crate::so3::SO3F64;
use crate::tolerance::{Tolerance, Validation};
use crate::twist::Twist3;
use glam::{DMat3, DMat4, DVec3, DVec4};
use rand::Rng;
use spatialmath_linalg::Mat6F64;

/// A rigid transform in 3D: rotation `r` followed by translation `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SE3F64 {
    /// Rotation part.
    pub r: SO3F64,
    /// Translation part.
    pub t: DVec3,
}

impl SE3F64 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        r: SO3F64::IDENTITY,
        t: DVec3::ZERO,
    };

    /// Create from rotation and translation.
    pub fn new(rotation: SO3F64, translation: DVec3) -> Self {
        Self {
            r: rotation,
            t: translation,
        }
    }

    /// Pure translation.
    #[inline]
    pub fn from_translation(t: DVec3) -> Self {
        Self::new(SO3F64::IDENTITY, t)
    }

    /// Pure rotation.
    #[inline]
    pub fn from_rotation(r: SO3F64) -> Self {
        Self::new(r, DVec3::ZERO)
    }

    /// Create from a homogeneous 4x4 matrix, validated with the default tolerance.
    pub fn from_matrix(mat: &DMat4) -> Result<Self, LieError> {
        Self::from_matrix_with(mat, &Tolerance::default(), Validation::Strict)
    }

    /// Create from a homogeneous 4x4 matrix.
    ///
    /// The bottom row must be `[0, 0, 0, 1]` and the rotation block must pass
    /// [`SO3F64::from_matrix_with`].
    pub fn from_matrix_with(
        mat: &DMat4,
        tol: &Tolerance,
        validation: Validation,
    ) -> Result<Self, LieError> {
        if !mat.is_finite() {
            return Err(LieError::NonFinite);
        }
        let row = mat.row(3);
        if !row.abs_diff_eq(DVec4::W, tol.orthogonality) {
            return Err(LieError::InvalidHomogeneousRow {
                dim: 4,
                row: row.to_array(),
            });
        }
        Ok(Self {
            r: SO3F64::from_matrix_with(&DMat3::from_mat4(*mat), tol, validation)?,
            t: mat.w_axis.truncate(),
        })
    }

    /// Create from a quaternion `[x, y, z, w]` and a translation.
    pub fn from_qxyz(quat: [f64; 4], xyz: [f64; 3]) -> Result<Self, LieError> {
        Ok(Self::new(SO3F64::from_array(quat)?, DVec3::from_array(xyz)))
    }

    /// Uniform random rotation with a translation in `[0, 1)³`.
    pub fn from_random() -> Self {
        let mut rng = rand::rng();

        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let r3: f64 = rng.random();

        Self {
            r: SO3F64::from_random(),
            t: DVec3::new(r1, r2, r3),
        }
    }

    /// Rotation part.
    #[inline]
    pub fn rotation(&self) -> SO3F64 {
        self.r
    }

    /// Translation part.
    #[inline]
    pub fn translation(&self) -> DVec3 {
        self.t
    }

    /// Homogeneous 4x4 matrix.
    pub fn matrix(&self) -> DMat4 {
        let r = self.r.matrix();
        DMat4::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            r.z_axis.extend(0.0),
            self.t.extend(1.0),
        )
    }

    /// `(Rᵀ, −Rᵀt)`.
    pub fn inverse(&self) -> Self {
        let r_inv = self.r.inverse();
        Self {
            r: r_inv,
            t: -(r_inv * self.t),
        }
    }

    /// Transform a point, `R·p + t`.
    #[inline]
    pub fn act_point(&self, p: DVec3) -> DVec3 {
        self.r * p + self.t
    }

    /// Rotate a free vector, translation does not apply.
    #[inline]
    pub fn act_vector(&self, v: DVec3) -> DVec3 {
        self.r * v
    }

    /// Covariance of a transformed point, `R·Σ·Rᵀ`.
    pub fn act_point_covariance(&self, cov: &DMat3) -> DMat3 {
        self.r.act_covariance(cov)
    }

    /// Push a 6x6 tangent covariance through the adjoint, `Ad·Σ·Adᵀ`.
    ///
    /// The covariance is ordered `[v, ω]` like [`Twist3`].
    pub fn transform_covariance(&self, cov: &Mat6F64) -> Mat6F64 {
        let adj = self.adjoint();
        adj * *cov * adj.transpose()
    }

    /// Right plus, `self ∘ exp(tau)`.
    #[inline]
    pub fn rplus(&self, tau: Twist3) -> Self {
        *self * SE3F64::exp(tau)
    }

    /// Right minus, `log(self⁻¹ ∘ other)`.
    #[inline]
    pub fn rminus(&self, other: &Self) -> Twist3 {
        (self.inverse() * *other).log()
    }

    /// Left plus, `exp(tau) ∘ x`.
    #[inline]
    pub fn lplus(tau: Twist3, x: &Self) -> Self {
        SE3F64::exp(tau) * *x
    }

    /// Left minus, `log(y ∘ x⁻¹)`.
    #[inline]
    pub fn lminus(y: &Self, x: &Self) -> Twist3 {
        (*y * x.inverse()).log()
    }

    /// 6x6 adjoint `[[R, [t]ₓR], [0, R]]`.
    pub fn adjoint(&self) -> Mat6F64 {
        let r = self.r.matrix();
        Mat6F64::from_blocks(r, skew(self.t) * r, DMat3::ZERO, r)
    }

    /// Exponential map.
    pub fn exp(tau: Twist3) -> Self {
        Self {
            r: SO3F64::exp(tau.w),
            t: SO3F64::left_jacobian(tau.w) * tau.v,
        }
    }

    /// Logarithm map, rotation angle in `[0, π]`.
    pub fn log(&self) -> Twist3 {
        let omega = self.r.log();
        Twist3::new(SO3F64::left_jacobian_inverse(omega) * self.t, omega)
    }

    /// Twist to 4x4 matrix, see [`Twist3::hat`].
    pub fn hat(tau: Twist3) -> DMat4 {
        tau.hat()
    }

    /// 4x4 matrix to twist, see [`Twist3::vee`].
    pub fn vee(omega: &DMat4) -> Twist3 {
        Twist3::vee(omega)
    }

    /// Screw interpolation, `self ∘ exp(s·log(self⁻¹ ∘ other))`.
    ///
    /// The path is a constant-velocity screw motion, so intermediate origins
    /// move on a helix rather than a straight line.
    pub fn interpolate(&self, other: &Self, s: f64) -> Self {
        self.rplus(self.rminus(other) * s)
    }

    /// Rotation by SLERP and translation along the straight line, independently.
    pub fn interpolate_decoupled(&self, other: &Self, s: f64) -> Self {
        Self::new(self.r.slerp(&other.r, s), self.t.lerp(other.t, s))
    }

    /// Rotations within `tol` (quaternion components, up to sign) and
    /// translations within `tol` per component.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.r.approx_eq(&other.r, tol) && self.t.abs_diff_eq(other.t, tol)
    }

    /// [`Self::approx_eq`] with [`Tolerance::comparison`] of the default tolerance.
    pub fn approx_eq_default(&self, other: &Self) -> bool {
        self.approx_eq(other, Tolerance::default().comparison)
    }

    /// The same transform as a unit dual quaternion.
    pub fn to_dual_quaternion(&self) -> UnitDualQuaternion {
        UnitDualQuaternion::from_se3(self)
    }
}

impl Default for SE3F64 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SE3F64> for SE3F64 {
    type Output = SE3F64;

    fn mul(self, rhs: SE3F64) -> Self::Output {
        let r = self.r * rhs.r;
        let t = self.t + self.r * rhs.t;
        Self::new(r, t)
    }
}

impl std::ops::MulAssign<SE3F64> for SE3F64 {
    #[inline]
    fn mul_assign(&mut self, rhs: SE3F64) {
        *self = *self * rhs;
    }
}

impl std::ops::Div<SE3F64> for SE3F64 {
    type Output = SE3F64;

    /// `self ∘ rhs⁻¹`
    fn div(self, rhs: SE3F64) -> SE3F64 {
        self * rhs.inverse()
    }
}

impl std::ops::Mul<DVec3> for SE3F64 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.act_point(rhs)
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for SE3F64 {
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-10;

    fn make_random_se3() -> SE3F64 {
        SE3F64::from_random()
    }

    fn make_random_twist() -> Twist3 {
        let mut rng = rand::rng();
        let mut a = [0.0; 6];
        for v in a.iter_mut() {
            *v = rng.random_range(-1.0..1.0);
        }
        Twist3::from_array(a)
    }

    #[test]
    fn test_identity() {
        let identity = SE3F64::IDENTITY;
        assert_eq!(identity.matrix(), DMat4::IDENTITY);
        assert_eq!(identity.log(), Twist3::ZERO);
        assert_eq!(SE3F64::exp(Twist3::ZERO), identity);
        assert!(identity.approx_eq_default(&SE3F64::from_translation(DVec3::splat(1e-12))));
        assert!(!identity.approx_eq_default(&SE3F64::from_translation(DVec3::X * 1e-6)));
    }

    #[test]
    fn test_from_matrix() -> Result<(), LieError> {
        let x = make_random_se3();
        let back = SE3F64::from_matrix(&x.matrix())?;
        assert!(back.approx_eq(&x, EPSILON));

        let mut bad = x.matrix();
        bad.x_axis.w = 1e-3;
        assert!(matches!(
            SE3F64::from_matrix(&bad),
            Err(LieError::InvalidHomogeneousRow { .. })
        ));

        let mut skewed = x.matrix();
        skewed.x_axis.x += 0.1;
        assert!(matches!(
            SE3F64::from_matrix(&skewed),
            Err(LieError::NonOrthogonalMatrix { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_from_qxyz() -> Result<(), LieError> {
        let x = SE3F64::from_qxyz([0.0, 0.0, 0.0, 1.0], [1.0, 2.0, 3.0])?;
        assert_eq!(x.t, DVec3::new(1.0, 2.0, 3.0));
        assert!(SE3F64::from_qxyz([0.0, 0.0, 0.0, 2.0], [0.0; 3]).is_err());
        Ok(())
    }

    #[test]
    fn test_compose_and_act() {
        // translate (1, 0, 0) then rotate 90° about z
        let a = SE3F64::from_translation(DVec3::X);
        let b = SE3F64::from_rotation(SO3F64::rot_z(FRAC_PI_2));
        let c = a * b;
        assert!(c.act_point(DVec3::X).abs_diff_eq(DVec3::new(1.0, 1.0, 0.0), EPSILON));
        assert!(c.act_vector(DVec3::X).abs_diff_eq(DVec3::Y, EPSILON));

        let x = make_random_se3();
        let p = DVec3::new(0.3, -0.2, 1.5);
        let h = x.matrix() * p.extend(1.0);
        assert!((x * p).abs_diff_eq(h.truncate(), EPSILON));
    }

    #[test]
    fn test_matrix_composition_consistency() {
        let (x, y) = (make_random_se3(), make_random_se3());
        assert!((x * y).matrix().abs_diff_eq(x.matrix() * y.matrix(), EPSILON));
        assert!(x.inverse().matrix().abs_diff_eq(x.matrix().inverse(), EPSILON));
        assert!((x / y).approx_eq(&(x * y.inverse()), EPSILON));
        let mut z = x;
        z *= y;
        assert!(z.approx_eq(&(x * y), EPSILON));
    }

    #[test]
    fn test_exp_log_roundtrip() {
        for _ in 0..20 {
            let tau = make_random_twist();
            let back = SE3F64::exp(tau).log();
            assert!(back.to_vec6().abs_diff_eq(&tau.to_vec6(), EPSILON));
        }
        let x = make_random_se3();
        assert!(SE3F64::exp(x.log()).approx_eq(&x, EPSILON));
    }

    #[test]
    fn test_exp_matches_matrix_exponential() {
        // truncated power series of the 4x4 hat matrix
        let tau = Twist3::from_array([0.4, -0.3, 0.2, 0.1, 0.5, -0.2]);
        let hat = tau.hat();
        let mut term = DMat4::IDENTITY;
        let mut sum = DMat4::IDENTITY;
        for k in 1..30 {
            term = term * hat * (1.0 / k as f64);
            sum += term;
        }
        assert!(SE3F64::exp(tau).matrix().abs_diff_eq(sum, EPSILON));
    }

    #[test]
    fn test_log_near_pi() {
        let tau = Twist3::new(DVec3::new(0.5, 1.0, -0.3), DVec3::Z * (PI - 1e-7));
        let back = SE3F64::exp(tau).log();
        assert!(back.to_vec6().abs_diff_eq(&tau.to_vec6(), 1e-6));
    }

    #[test]
    fn test_adjoint() {
        let x = make_random_se3();
        let tau = make_random_twist();
        let lhs = x * SE3F64::exp(tau) * x.inverse();
        let rhs = SE3F64::exp(Twist3::from_vec6(&(x.adjoint() * tau.to_vec6())));
        assert!(lhs.approx_eq(&rhs, EPSILON));

        let y = make_random_se3();
        assert!((x * y).adjoint().abs_diff_eq(&(x.adjoint() * y.adjoint()), EPSILON));
        assert!((x.adjoint() * x.inverse().adjoint()).abs_diff_eq(&Mat6F64::IDENTITY, EPSILON));
    }

    #[test]
    fn test_transform_covariance() {
        let x = SE3F64::from_rotation(SO3F64::rot_z(FRAC_PI_2));
        let mut cov = Mat6F64::IDENTITY;
        cov.0[0][0] = 4.0;
        let out = x.transform_covariance(&cov);
        // rotation by 90° about z swaps the x and y linear variances
        assert_relative_eq!(out[(0, 0)], 1.0, epsilon = EPSILON);
        assert_relative_eq!(out[(1, 1)], 4.0, epsilon = EPSILON);
        assert_relative_eq!(out[(5, 5)], 1.0, epsilon = EPSILON);

        let point_cov = DMat3::from_diagonal(DVec3::new(4.0, 1.0, 2.0));
        let rotated = x.act_point_covariance(&point_cov);
        assert!(rotated.abs_diff_eq(DMat3::from_diagonal(DVec3::new(1.0, 4.0, 2.0)), EPSILON));
    }

    #[test]
    fn test_rplus_rminus() {
        let x = make_random_se3();
        let tau = make_random_twist() * 0.5;
        let y = x.rplus(tau);
        assert!(x.rminus(&y).to_vec6().abs_diff_eq(&tau.to_vec6(), EPSILON));
        let y = SE3F64::lplus(tau, &x);
        assert!(SE3F64::lminus(&y, &x).to_vec6().abs_diff_eq(&tau.to_vec6(), EPSILON));
    }

    #[test]
    fn test_interpolate_screw() {
        let a = SE3F64::IDENTITY;
        let b = SE3F64::new(SO3F64::rot_z(FRAC_PI_2), DVec3::new(1.0, 1.0, 2.0));
        assert!(a.interpolate(&b, 0.0).approx_eq(&a, EPSILON));
        assert!(a.interpolate(&b, 1.0).approx_eq(&b, EPSILON));
        let mid = a.interpolate(&b, 0.5);
        assert!(mid.r.approx_eq(&SO3F64::rot_z(FRAC_PI_2 / 2.0), EPSILON));
        // the two halves compose back to the full motion
        let half = a.rminus(&mid);
        assert!((mid * SE3F64::exp(half)).approx_eq(&b, EPSILON));

        let lin = a.interpolate_decoupled(&b, 0.5);
        assert!(lin.t.abs_diff_eq(DVec3::new(0.5, 0.5, 1.0), EPSILON));
        assert!(lin.r.approx_eq(&mid.r, EPSILON));
    }

    #[test]
    fn test_to_dual_quaternion() {
        let x = make_random_se3();
        let back = x.to_dual_quaternion().to_se3();
        assert!(back.approx_eq(&x, EPSILON));
    }
}
