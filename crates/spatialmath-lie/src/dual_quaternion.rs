//! Dual quaternions, `real + ε·dual` with `ε² = 0`.
//!
//! Unit dual quaternions are a double cover of SE(3) in the same way unit
//! quaternions cover SO(3). A pose `(R, t)` with rotation quaternion `q`
//! is encoded as
//!
//! ```text
//! real = q
//! dual = ½ (t, 0) ⊗ q
//! ```
//!
//! and the product of two unit dual quaternions encodes the composition of
//! the two poses.

use crate::error::LieError;
use crate::se3::SE3F64;
use crate::so3::SO3F64;
use crate::tolerance::Tolerance;
use glam::{DQuat, DVec3};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A general dual quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DualQuaternion {
    /// Real part.
    pub real: DQuat,
    /// Dual part, the coefficient of `ε`.
    pub dual: DQuat,
}

/// Left-multiplication matrix `L(q)` with `q ⊗ p = L(q)·p`, components
/// ordered `x, y, z, w`.
fn left_matrix(q: DQuat) -> [[f64; 4]; 4] {
    [
        [q.w, -q.z, q.y, q.x],
        [q.z, q.w, -q.x, q.y],
        [-q.y, q.x, q.w, q.z],
        [-q.x, -q.y, -q.z, q.w],
    ]
}

impl DualQuaternion {
    /// Create from real and dual parts.
    pub const fn new(real: DQuat, dual: DQuat) -> Self {
        Self { real, dual }
    }

    /// Create from `[real xyzw, dual xyzw]`.
    pub fn from_array(a: [f64; 8]) -> Self {
        Self::new(
            DQuat::from_xyzw(a[0], a[1], a[2], a[3]),
            DQuat::from_xyzw(a[4], a[5], a[6], a[7]),
        )
    }

    /// The dual quaternion `1 + ε·(p, 0)` of a point.
    pub fn pure(p: DVec3) -> Self {
        Self::new(DQuat::IDENTITY, DQuat::from_xyzw(p.x, p.y, p.z, 0.0))
    }

    /// Quaternion conjugate of both parts, `(r*, d*)`.
    pub fn conj(&self) -> Self {
        Self::new(self.real.conjugate(), self.dual.conjugate())
    }

    /// Norm as a dual number `(|r|, r·d / |r|)`.
    ///
    /// A unit dual quaternion has norm `(1, 0)`.
    pub fn norm(&self) -> (f64, f64) {
        let real = self.real.length();
        let dual = if real > 0.0 {
            self.real.dot(self.dual) / real
        } else {
            0.0
        };
        (real, dual)
    }

    /// As `[real xyzw, dual xyzw]`.
    pub fn to_array(&self) -> [f64; 8] {
        let (r, d) = (self.real, self.dual);
        [r.x, r.y, r.z, r.w, d.x, d.y, d.z, d.w]
    }

    /// 8x8 matrix `[[L(r), 0], [L(d), L(r)]]` with `a ⊗ b = M(a)·b` on
    /// [`Self::to_array`] vectors. Row-major.
    pub fn matrix(&self) -> [[f64; 8]; 8] {
        let lr = left_matrix(self.real);
        let ld = left_matrix(self.dual);
        let mut m = [[0.0; 8]; 8];
        for r in 0..4 {
            for c in 0..4 {
                m[r][c] = lr[r][c];
                m[r + 4][c] = ld[r][c];
                m[r + 4][c + 4] = lr[r][c];
            }
        }
        m
    }
}

impl Add for DualQuaternion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.real + rhs.real, self.dual + rhs.dual)
    }
}

impl Sub for DualQuaternion {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.real - rhs.real, self.dual - rhs.dual)
    }
}

impl Mul for DualQuaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.real * rhs.real,
            self.real * rhs.dual + self.dual * rhs.real,
        )
    }
}

impl fmt::Display for DualQuaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, d) = (self.real, self.dual);
        write!(
            f,
            "{} < {}, {}, {} > + ε {} < {}, {}, {} >",
            r.w, r.x, r.y, r.z, d.w, d.x, d.y, d.z
        )
    }
}

/// A unit dual quaternion, the encoding of a rigid transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDualQuaternion {
    dq: DualQuaternion,
}

impl UnitDualQuaternion {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        dq: DualQuaternion::new(DQuat::IDENTITY, DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0)),
    };

    /// Encode a pose.
    pub fn from_se3(pose: &SE3F64) -> Self {
        let q = pose.r.quaternion();
        let t = DQuat::from_xyzw(pose.t.x, pose.t.y, pose.t.z, 0.0);
        Self {
            dq: DualQuaternion::new(q, t * q * 0.5),
        }
    }

    /// Decode the pose, `t = 2·(d ⊗ r*)`.
    pub fn to_se3(&self) -> SE3F64 {
        let t = self.dq.dual * self.dq.real.conjugate() * 2.0;
        SE3F64::new(
            SO3F64::from_quaternion_unchecked(self.dq.real.normalize()),
            DVec3::new(t.x, t.y, t.z),
        )
    }

    /// Validate a general dual quaternion.
    ///
    /// Fails with [`LieError::NonUnitDualQuaternion`] unless `|r| = 1` and
    /// `r·d = 0` within `tol.unit_norm`.
    pub fn try_from(dq: DualQuaternion, tol: &Tolerance) -> Result<Self, LieError> {
        if !dq.to_array().iter().all(|v| v.is_finite()) {
            return Err(LieError::NonFinite);
        }
        let real_norm = dq.real.length();
        let orthogonality = dq.real.dot(dq.dual);
        if (real_norm - 1.0).abs() > tol.unit_norm || orthogonality.abs() > tol.unit_norm {
            return Err(LieError::NonUnitDualQuaternion {
                real_norm,
                orthogonality,
            });
        }
        Ok(Self { dq })
    }

    /// The underlying dual quaternion.
    pub fn dual_quaternion(&self) -> DualQuaternion {
        self.dq
    }

    /// Quaternion conjugate of both parts, the inverse transform.
    pub fn conj(&self) -> Self {
        Self { dq: self.dq.conj() }
    }

    /// Inverse transform, same as [`Self::conj`] for unit dual quaternions.
    pub fn inverse(&self) -> Self {
        self.conj()
    }

    /// Transform a point, `R·p + t`.
    pub fn act_point(&self, p: DVec3) -> DVec3 {
        // full conjugate (r*, -d*) makes the sandwich a rigid transform
        let full_conj = DualQuaternion::new(self.dq.real.conjugate(), -self.dq.dual.conjugate());
        let out = self.dq * DualQuaternion::pure(p) * full_conj;
        DVec3::new(out.dual.x, out.dual.y, out.dual.z)
    }
}

impl Mul for UnitDualQuaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self { dq: self.dq * rhs.dq }
    }
}

impl From<UnitDualQuaternion> for DualQuaternion {
    fn from(udq: UnitDualQuaternion) -> Self {
        udq.dq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-10;

    fn array_eq(a: &[f64; 8], b: &[f64; 8], eps: f64) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= eps)
    }

    #[test]
    fn test_se3_roundtrip() {
        let pose = SE3F64::from_random();
        let udq = UnitDualQuaternion::from_se3(&pose);
        let (real, dual) = udq.dual_quaternion().norm();
        assert_relative_eq!(real, 1.0, epsilon = EPSILON);
        assert_relative_eq!(dual, 0.0, epsilon = EPSILON);
        assert!(udq.to_se3().approx_eq(&pose, EPSILON));
    }

    #[test]
    fn test_product_is_composition() {
        let (a, b) = (SE3F64::from_random(), SE3F64::from_random());
        let product = UnitDualQuaternion::from_se3(&a) * UnitDualQuaternion::from_se3(&b);
        assert!(product.to_se3().approx_eq(&(a * b), EPSILON));

        let inv = UnitDualQuaternion::from_se3(&a).inverse();
        assert!(inv.to_se3().approx_eq(&a.inverse(), EPSILON));
    }

    #[test]
    fn test_act_point() {
        let pose = SE3F64::new(SO3F64::rot_z(FRAC_PI_2), DVec3::new(1.0, 2.0, 3.0));
        let udq = pose.to_dual_quaternion();
        let p = DVec3::new(1.0, 0.0, 0.0);
        assert!(udq.act_point(p).abs_diff_eq(DVec3::new(1.0, 3.0, 3.0), EPSILON));

        let pose = SE3F64::from_random();
        let p = DVec3::new(-0.3, 0.7, 2.0);
        assert!(pose.to_dual_quaternion().act_point(p).abs_diff_eq(pose * p, EPSILON));
    }

    #[test]
    fn test_try_from() {
        let tol = Tolerance::default();
        let good = SE3F64::from_random().to_dual_quaternion().dual_quaternion();
        assert!(UnitDualQuaternion::try_from(good, &tol).is_ok());

        let scaled = DualQuaternion::new(good.real * 2.0, good.dual);
        assert!(matches!(
            UnitDualQuaternion::try_from(scaled, &tol),
            Err(LieError::NonUnitDualQuaternion { .. })
        ));
        let skewed = DualQuaternion::new(good.real, good.dual + good.real);
        assert!(matches!(
            UnitDualQuaternion::try_from(skewed, &tol),
            Err(LieError::NonUnitDualQuaternion { .. })
        ));
    }

    #[test]
    fn test_matrix_is_left_product() {
        let a = DualQuaternion::from_array([0.1, -0.2, 0.3, 0.9, 0.5, 0.4, -0.6, 0.2]);
        let b = DualQuaternion::from_array([-0.7, 0.2, 0.1, 0.4, 0.3, -0.8, 0.9, -0.1]);
        let m = a.matrix();
        let bv = b.to_array();
        let mut mv = [0.0; 8];
        for (r, value) in mv.iter_mut().enumerate() {
            *value = (0..8).map(|c| m[r][c] * bv[c]).sum();
        }
        assert!(array_eq(&mv, &(a * b).to_array(), EPSILON));
    }

    #[test]
    fn test_arithmetic() {
        let a = DualQuaternion::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!((a + a).to_array(), [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0]);
        assert_eq!((a - a).to_array(), [0.0; 8]);
        assert_eq!(a.conj().to_array(), [-1.0, -2.0, -3.0, 4.0, -5.0, -6.0, -7.0, 8.0]);
        assert_eq!(DualQuaternion::pure(DVec3::X).to_array(), [0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(a.to_string(), "4 < 1, 2, 3 > + ε 8 < 5, 6, 7 >");
    }
}
