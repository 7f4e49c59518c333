use crate::error::LieError;
use crate::scalar::{one_minus_cos_over_x, one_minus_cos_over_x2, sin_over_x, x_minus_sin_over_x3};
use crate::so2::SO2F64;
use crate::tolerance::{Tolerance, Validation};
use crate::twist::Twist2;
use glam::{DMat2, DMat3, DVec2, DVec3};
use rand::Rng;

/// A planar rigid transform: rotation `r` followed by translation `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SE2F64 {
    /// Rotation part.
    pub r: SO2F64,
    /// Translation part.
    pub t: DVec2,
}

impl SE2F64 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        r: SO2F64::IDENTITY,
        t: DVec2::ZERO,
    };

    /// Create from rotation and translation.
    pub fn new(rotation: SO2F64, translation: DVec2) -> Self {
        Self {
            r: rotation,
            t: translation,
        }
    }

    /// Create from a position and a heading angle in radians.
    #[inline]
    pub fn from_xy_theta(x: f64, y: f64, theta: f64) -> Self {
        Self::new(SO2F64::exp(theta), DVec2::new(x, y))
    }

    /// Pure translation.
    #[inline]
    pub fn from_translation(t: DVec2) -> Self {
        Self::new(SO2F64::IDENTITY, t)
    }

    /// Pure rotation.
    #[inline]
    pub fn from_rotation(r: SO2F64) -> Self {
        Self::new(r, DVec2::ZERO)
    }

    /// Create from a homogeneous 3x3 matrix, validated with the default tolerance.
    pub fn from_matrix(mat: &DMat3) -> Result<Self, LieError> {
        Self::from_matrix_with(mat, &Tolerance::default(), Validation::Strict)
    }

    /// Create from a homogeneous 3x3 matrix.
    ///
    /// The bottom row must be `[0, 0, 1]` and the upper-left block must pass
    /// [`SO2F64::from_matrix_with`].
    pub fn from_matrix_with(
        mat: &DMat3,
        tol: &Tolerance,
        validation: Validation,
    ) -> Result<Self, LieError> {
        if !mat.is_finite() {
            return Err(LieError::NonFinite);
        }
        let row = mat.row(2);
        if !row.abs_diff_eq(DVec3::Z, tol.orthogonality) {
            return Err(LieError::InvalidHomogeneousRow {
                dim: 3,
                row: row.extend(0.0).to_array(),
            });
        }
        let r = DMat2::from_cols(mat.x_axis.truncate(), mat.y_axis.truncate());
        Ok(Self {
            r: SO2F64::from_matrix_with(&r, tol, validation)?,
            t: mat.z_axis.truncate(),
        })
    }

    /// Random rotation with a translation in `[0, 1)²`.
    pub fn from_random() -> Self {
        let mut rng = rand::rng();

        let r1: f64 = rng.random();
        let r2: f64 = rng.random();

        Self {
            r: SO2F64::from_random(),
            t: DVec2::new(r1, r2),
        }
    }

    /// Rotation part.
    #[inline]
    pub fn rotation(&self) -> SO2F64 {
        self.r
    }

    /// Translation part.
    #[inline]
    pub fn translation(&self) -> DVec2 {
        self.t
    }

    /// Right plus, `self ∘ exp(tau)`.
    #[inline]
    pub fn rplus(&self, tau: Twist2) -> Self {
        *self * SE2F64::exp(tau)
    }

    /// Right minus, `log(self⁻¹ ∘ other)`.
    #[inline]
    pub fn rminus(&self, other: &Self) -> Twist2 {
        (self.inverse() * *other).log()
    }

    /// Left plus, `exp(tau) ∘ x`.
    #[inline]
    pub fn lplus(tau: Twist2, x: &Self) -> Self {
        SE2F64::exp(tau) * *x
    }

    /// Left minus, `log(y ∘ x⁻¹)`.
    #[inline]
    pub fn lminus(y: &Self, x: &Self) -> Twist2 {
        (*y * x.inverse()).log()
    }

    /// Homogeneous 3x3 matrix.
    pub fn matrix(&self) -> DMat3 {
        let r = self.r.matrix();
        DMat3::from_cols_array(&[
            r.x_axis.x, r.x_axis.y, 0.0, //
            r.y_axis.x, r.y_axis.y, 0.0, //
            self.t.x, self.t.y, 1.0, //
        ])
    }

    /// `(Rᵀ, −Rᵀt)`.
    pub fn inverse(&self) -> Self {
        let r_inv = self.r.inverse();
        Self {
            r: r_inv,
            t: r_inv * (-self.t),
        }
    }

    /// Transform a point, `R·p + t`.
    #[inline]
    pub fn act_point(&self, p: DVec2) -> DVec2 {
        self.r * p + self.t
    }

    /// Rotate a free vector, translation does not apply.
    #[inline]
    pub fn act_vector(&self, v: DVec2) -> DVec2 {
        self.r * v
    }

    /// Adjoint matrix acting on `[vx, vy, w]`
    ///
    /// ```text
    /// ⎡ R   [ty, -tx]ᵀ ⎤
    /// ⎣ 0       1      ⎦
    /// ```
    pub fn adjoint(&self) -> DMat3 {
        let mut mat = self.matrix();
        mat.z_axis.x = self.t.y;
        mat.z_axis.y = -self.t.x;
        mat
    }

    /// Exponential map, `t = V(θ)·v` with `V = [[a, -b], [b, a]]`,
    /// `a = sin θ/θ`, `b = (1 − cos θ)/θ`.
    pub fn exp(tau: Twist2) -> Self {
        let theta = tau.w;
        let a = sin_over_x(theta);
        let b = one_minus_cos_over_x(theta);
        let v = tau.v;
        Self {
            r: SO2F64::exp(theta),
            t: DVec2::new(a * v.x - b * v.y, b * v.x + a * v.y),
        }
    }

    /// Logarithm map with the angle in `[-π, π]`.
    pub fn log(&self) -> Twist2 {
        let theta = self.r.log();
        let a = sin_over_x(theta);
        let b = one_minus_cos_over_x(theta);
        // det V, bounded below by (2/π)² on [-π, π]
        let denom = a * a + b * b;

        // V⁻¹ = 1/det(V) · [[a, b], [-b, a]]
        let v_inv = DMat2::from_cols_array(&[a / denom, -b / denom, b / denom, a / denom]);
        Twist2::new(v_inv * self.t, theta)
    }

    /// Twist to 3x3 matrix, see [`Twist2::hat`].
    pub fn hat(tau: Twist2) -> DMat3 {
        tau.hat()
    }

    /// 3x3 matrix to twist, see [`Twist2::vee`].
    pub fn vee(omega: &DMat3) -> Twist2 {
        Twist2::vee(omega)
    }

    /// JR(θ, v) =
    /// ┌                                                                                      ┐
    /// │   sin(θ)/θ         (1 - cos(θ))/θ       (θ·p₁ - p₂ + p₂·cos(θ) - p₁·sin(θ))/θ²      │
    /// │  (cos(θ) - 1)/θ       sin(θ)/θ         (p₁ + θ·p₂ - p₁·cos(θ) - p₂·sin(θ))/θ²       │
    /// │       0                  0                                1                         │
    /// └                                                                                      ┘
    /// ref: https://arxiv.org/pdf/1812.01537 (eq 163)
    pub fn right_jacobian(tau: Twist2) -> DMat3 {
        let theta = tau.w;
        let (s, c) = (sin_over_x(theta), one_minus_cos_over_x(theta));
        let (p1, p2) = (tau.v.x, tau.v.y);
        // (θ − sin θ)/θ² and (1 − cos θ)/θ²
        let d = theta * x_minus_sin_over_x3(theta);
        let e = one_minus_cos_over_x2(theta);

        DMat3::from_cols(
            DVec3::new(s, -c, 0.0),
            DVec3::new(c, s, 0.0),
            DVec3::new(p1 * d - p2 * e, p1 * e + p2 * d, 1.0),
        )
    }

    /// JL(θ, v) =
    /// ┌                                                                                    ┐
    /// │   sin(θ)/θ         (cos(θ) - 1)/θ       (θ·p₁ + p₂ - p₂·cos(θ) - p₁·sin(θ))/θ²     │
    /// │  (1 - cos(θ))/θ       sin(θ)/θ         (-p₁ + θ·p₂ + p₁·cos(θ) - p₂·sin(θ))/θ²     │
    /// │       0                  0                                1                        │
    /// └                                                                                    ┘
    /// ref: https://arxiv.org/pdf/1812.01537 (eq 164)
    pub fn left_jacobian(tau: Twist2) -> DMat3 {
        let theta = tau.w;
        let (s, c) = (sin_over_x(theta), one_minus_cos_over_x(theta));
        let (p1, p2) = (tau.v.x, tau.v.y);
        let d = theta * x_minus_sin_over_x3(theta);
        let e = one_minus_cos_over_x2(theta);

        DMat3::from_cols(
            DVec3::new(s, c, 0.0),
            DVec3::new(-c, s, 0.0),
            DVec3::new(p1 * d + p2 * e, -p1 * e + p2 * d, 1.0),
        )
    }

    /// Screw interpolation, `self ∘ exp(s·log(self⁻¹ ∘ other))`.
    pub fn interpolate(&self, other: &Self, s: f64) -> Self {
        self.rplus(self.rminus(other) * s)
    }

    /// Rotation along the shortest arc and translation along the straight
    /// line, independently.
    pub fn interpolate_decoupled(&self, other: &Self, s: f64) -> Self {
        Self::new(self.r.interpolate(&other.r, s), self.t.lerp(other.t, s))
    }

    /// Rotations within `tol` radians and translations within `tol` per component.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.r.approx_eq(&other.r, tol) && self.t.abs_diff_eq(other.t, tol)
    }

    /// [`Self::approx_eq`] with [`Tolerance::comparison`] of the default tolerance.
    pub fn approx_eq_default(&self, other: &Self) -> bool {
        self.approx_eq(other, Tolerance::default().comparison)
    }
}

impl Default for SE2F64 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SE2F64> for SE2F64 {
    type Output = SE2F64;

    fn mul(self, other: SE2F64) -> SE2F64 {
        SE2F64::new(self.r * other.r, self.r * other.t + self.t)
    }
}

impl std::ops::MulAssign<SE2F64> for SE2F64 {
    #[inline]
    fn mul_assign(&mut self, rhs: SE2F64) {
        *self = *self * rhs;
    }
}

impl std::ops::Div<SE2F64> for SE2F64 {
    type Output = SE2F64;

    /// `self ∘ rhs⁻¹`
    fn div(self, rhs: SE2F64) -> SE2F64 {
        self * rhs.inverse()
    }
}

impl std::ops::Mul<DVec2> for SE2F64 {
    type Output = DVec2;

    fn mul(self, rhs: DVec2) -> Self::Output {
        self.act_point(rhs)
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for SE2F64 {
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
