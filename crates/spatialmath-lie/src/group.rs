//! A common interface over the four matrix Lie groups.
//!
//! The concrete types keep their own inherent methods; this trait only
//! forwards to them so generic code (interpolation, trajectories, tests over
//! every group) can be written once.

use crate::se2::SE2F64;
use crate::se3::SE3F64;
use crate::so2::SO2F64;
use crate::so3::SO3F64;
use crate::twist::{Twist2, Twist3};
use glam::{DMat3, DVec3};
use spatialmath_linalg::Mat6F64;
use std::ops::Mul;

/// A matrix Lie group with a vector tangent space.
pub trait LieGroup: Copy {
    /// Element of the Lie algebra in vector form.
    type Tangent: Copy + Mul<f64, Output = Self::Tangent>;
    /// Matrix form of the adjoint action on [`Self::Tangent`].
    type Adjoint: Copy + Mul<Self::Adjoint, Output = Self::Adjoint>;

    /// Degrees of freedom, the dimension of the tangent space.
    const DOF: usize;

    /// The identity element.
    fn identity() -> Self;

    /// Group product `self ∘ other`.
    fn compose(&self, other: &Self) -> Self;

    /// Group inverse.
    fn inverse(&self) -> Self;

    /// Exponential map.
    fn exp(tau: &Self::Tangent) -> Self;

    /// Logarithm map, the inverse of [`LieGroup::exp`] on its principal range.
    fn log(&self) -> Self::Tangent;

    /// Adjoint matrix.
    fn adjoint(&self) -> Self::Adjoint;

    /// Relative element `self⁻¹ ∘ other`.
    fn between(&self, other: &Self) -> Self {
        self.inverse().compose(other)
    }
}

impl LieGroup for SO2F64 {
    type Tangent = f64;
    type Adjoint = f64;

    const DOF: usize = 1;

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn compose(&self, other: &Self) -> Self {
        *self * *other
    }

    fn inverse(&self) -> Self {
        SO2F64::inverse(self)
    }

    fn exp(tau: &f64) -> Self {
        SO2F64::exp(*tau)
    }

    fn log(&self) -> f64 {
        SO2F64::log(self)
    }

    fn adjoint(&self) -> f64 {
        SO2F64::adjoint(self)
    }
}

impl LieGroup for SO3F64 {
    type Tangent = DVec3;
    type Adjoint = DMat3;

    const DOF: usize = 3;

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn compose(&self, other: &Self) -> Self {
        *self * *other
    }

    fn inverse(&self) -> Self {
        SO3F64::inverse(self)
    }

    fn exp(tau: &DVec3) -> Self {
        SO3F64::exp(*tau)
    }

    fn log(&self) -> DVec3 {
        SO3F64::log(self)
    }

    fn adjoint(&self) -> DMat3 {
        SO3F64::adjoint(self)
    }
}

impl LieGroup for SE2F64 {
    type Tangent = Twist2;
    type Adjoint = DMat3;

    const DOF: usize = 3;

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn compose(&self, other: &Self) -> Self {
        *self * *other
    }

    fn inverse(&self) -> Self {
        SE2F64::inverse(self)
    }

    fn exp(tau: &Twist2) -> Self {
        SE2F64::exp(*tau)
    }

    fn log(&self) -> Twist2 {
        SE2F64::log(self)
    }

    fn adjoint(&self) -> DMat3 {
        SE2F64::adjoint(self)
    }
}

impl LieGroup for SE3F64 {
    type Tangent = Twist3;
    type Adjoint = Mat6F64;

    const DOF: usize = 6;

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn compose(&self, other: &Self) -> Self {
        *self * *other
    }

    fn inverse(&self) -> Self {
        SE3F64::inverse(self)
    }

    fn exp(tau: &Twist3) -> Self {
        SE3F64::exp(*tau)
    }

    fn log(&self) -> Twist3 {
        SE3F64::log(self)
    }

    fn adjoint(&self) -> Mat6F64 {
        SE3F64::adjoint(self)
    }
}
