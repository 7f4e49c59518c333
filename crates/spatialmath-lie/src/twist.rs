//! Tangent vectors of SE(2) and SE(3).
//!
//! Both twists are ordered linear part first, `[v, ω]`, which is the order
//! used by the exp/log maps, the adjoint matrices and the 6x6 covariances.

use crate::rotation::{skew, unskew};
use crate::se2::SE2F64;
use crate::se3::SE3F64;
use glam::{DMat3, DMat4, DVec2, DVec3};
use spatialmath_linalg::{Mat6F64, Vec6F64};
use std::ops::{Add, Mul, Neg, Sub};

/// Element of se(2): linear velocity `v` and angular velocity `w`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Twist2 {
    /// Linear part.
    pub v: DVec2,
    /// Angular part.
    pub w: f64,
}

impl Twist2 {
    /// The zero twist.
    pub const ZERO: Self = Self {
        v: DVec2::ZERO,
        w: 0.0,
    };

    /// Create a twist from its linear and angular parts.
    pub const fn new(v: DVec2, w: f64) -> Self {
        Self { v, w }
    }

    /// From `[vx, vy, w]`.
    pub fn from_array(a: [f64; 3]) -> Self {
        Self::new(DVec2::new(a[0], a[1]), a[2])
    }

    /// As `[vx, vy, w]`.
    pub fn to_array(&self) -> [f64; 3] {
        [self.v.x, self.v.y, self.w]
    }

    /// Euclidean norm of the 3-vector.
    pub fn norm(&self) -> f64 {
        (self.v.length_squared() + self.w * self.w).sqrt()
    }

    /// 3x3 matrix form
    ///
    /// ```text
    /// ⎡ 0  -w  vx ⎤
    /// ⎢ w   0  vy ⎥
    /// ⎣ 0   0   0 ⎦
    /// ```
    pub fn hat(&self) -> DMat3 {
        DMat3::from_cols_array(&[0.0, self.w, 0.0, -self.w, 0.0, 0.0, self.v.x, self.v.y, 0.0])
    }

    /// Inverse of [`Self::hat`].
    pub fn vee(m: &DMat3) -> Self {
        Self::new(DVec2::new(m.z_axis.x, m.z_axis.y), m.x_axis.y)
    }

    /// Lie bracket matrix, `ad(a)·b = vee(hat(a)·hat(b) − hat(b)·hat(a))`.
    ///
    /// ```text
    /// ⎡ 0  -w   vy ⎤
    /// ⎢ w   0  -vx ⎥
    /// ⎣ 0   0    0 ⎦
    /// ```
    pub fn ad(&self) -> DMat3 {
        DMat3::from_cols_array(&[0.0, self.w, 0.0, -self.w, 0.0, 0.0, self.v.y, -self.v.x, 0.0])
    }

    /// Exponential map to a pose.
    #[inline]
    pub fn exp(&self) -> SE2F64 {
        SE2F64::exp(*self)
    }
}

impl Add for Twist2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.v + rhs.v, self.w + rhs.w)
    }
}

impl Sub for Twist2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.v - rhs.v, self.w - rhs.w)
    }
}

impl Neg for Twist2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.v, -self.w)
    }
}

impl Mul<f64> for Twist2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.v * rhs, self.w * rhs)
    }
}

/// Element of se(3): linear velocity `v` and angular velocity `w`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Twist3 {
    /// Linear part.
    pub v: DVec3,
    /// Angular part.
    pub w: DVec3,
}

impl Twist3 {
    /// The zero twist.
    pub const ZERO: Self = Self {
        v: DVec3::ZERO,
        w: DVec3::ZERO,
    };

    /// Create a twist from its linear and angular parts.
    pub const fn new(v: DVec3, w: DVec3) -> Self {
        Self { v, w }
    }

    /// From `[vx, vy, vz, wx, wy, wz]`.
    pub fn from_array(a: [f64; 6]) -> Self {
        Self::new(DVec3::new(a[0], a[1], a[2]), DVec3::new(a[3], a[4], a[5]))
    }

    /// As `[vx, vy, vz, wx, wy, wz]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.v.x, self.v.y, self.v.z, self.w.x, self.w.y, self.w.z]
    }

    /// As a 6-vector.
    pub fn to_vec6(&self) -> Vec6F64 {
        Vec6F64::from_parts(self.v, self.w)
    }

    /// From a 6-vector.
    pub fn from_vec6(x: &Vec6F64) -> Self {
        Self::new(x.top(), x.bottom())
    }

    /// Euclidean norm of the 6-vector.
    pub fn norm(&self) -> f64 {
        (self.v.length_squared() + self.w.length_squared()).sqrt()
    }

    /// 4x4 matrix form `[[ [w]ₓ, v ], [0, 0]]`.
    pub fn hat(&self) -> DMat4 {
        let w = skew(self.w);
        DMat4::from_cols(
            w.x_axis.extend(0.0),
            w.y_axis.extend(0.0),
            w.z_axis.extend(0.0),
            self.v.extend(0.0),
        )
    }

    /// Inverse of [`Self::hat`].
    pub fn vee(m: &DMat4) -> Self {
        Self::new(m.w_axis.truncate(), unskew(&DMat3::from_mat4(*m)))
    }

    /// Lie bracket matrix `[[ [w]ₓ, [v]ₓ ], [0, [w]ₓ]]`.
    pub fn ad(&self) -> Mat6F64 {
        let w = skew(self.w);
        Mat6F64::from_blocks(w, skew(self.v), DMat3::ZERO, w)
    }

    /// Exponential map to a pose.
    #[inline]
    pub fn exp(&self) -> SE3F64 {
        SE3F64::exp(*self)
    }

    /// Screw magnitude: `|w|` for a twist with rotation, `|v|` for a pure
    /// translation.
    pub fn theta(&self) -> f64 {
        let w = self.w.length();
        if w > f64::EPSILON {
            w
        } else {
            self.v.length()
        }
    }

    /// Twist scaled to unit [`Self::theta`]. The zero twist is returned unchanged.
    pub fn unit(&self) -> Self {
        let theta = self.theta();
        if theta > f64::EPSILON {
            *self * (1.0 / theta)
        } else {
            *self
        }
    }

    /// Screw pitch `w·v / |w|²`, infinite for a pure translation.
    pub fn pitch(&self) -> f64 {
        let w2 = self.w.length_squared();
        if w2 > f64::EPSILON * f64::EPSILON {
            self.w.dot(self.v) / w2
        } else {
            f64::INFINITY
        }
    }

    /// Point on the screw axis closest to the origin, `w × v / |w|²`.
    ///
    /// `None` for a pure translation, whose axis is at infinity.
    pub fn pole(&self) -> Option<DVec3> {
        let w2 = self.w.length_squared();
        (w2 > f64::EPSILON * f64::EPSILON).then(|| self.w.cross(self.v) / w2)
    }
}

impl Add for Twist3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.v + rhs.v, self.w + rhs.w)
    }
}

impl Sub for Twist3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.v - rhs.v, self.w - rhs.w)
    }
}

impl Neg for Twist3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.v, -self.w)
    }
}

impl Mul<f64> for Twist3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.v * rhs, self.w * rhs)
    }
}
