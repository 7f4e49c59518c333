use super::convert::{angle_axis_to_matrix, canonicalize_quaternion, matrix_to_angle_axis};
use crate::error::LieError;
use crate::tolerance::{Tolerance, Validation};
use glam::{DMat3, DQuat, DVec3};

/// Rotation by `angle` radians about a unit `axis`.
///
/// The axis is kept unit length by construction. A zero angle carries the
/// default axis `+X`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleAxis {
    axis: DVec3,
    angle: f64,
}

impl AngleAxis {
    /// Zero rotation about the default axis `+X`.
    pub const ZERO: Self = Self {
        axis: DVec3::X,
        angle: 0.0,
    };

    #[inline]
    pub(crate) const fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    pub(crate) const fn from_parts(axis: DVec3, angle: f64) -> Self {
        Self { axis, angle }
    }

    /// Create from an axis that must be unit length within the default tolerance.
    pub fn new(axis: DVec3, angle: f64) -> Result<Self, LieError> {
        Self::new_with(axis, angle, &Tolerance::default(), Validation::Strict)
    }

    /// Create from an axis, validating it against `tol.unit_norm`.
    ///
    /// With [`Validation::Normalize`] a non-unit axis is rescaled. A zero
    /// axis is rejected in both modes.
    pub fn new_with(
        axis: DVec3,
        angle: f64,
        tol: &Tolerance,
        validation: Validation,
    ) -> Result<Self, LieError> {
        if !axis.is_finite() || !angle.is_finite() {
            return Err(LieError::NonFinite);
        }
        let norm = axis.length();
        if (norm - 1.0).abs() <= tol.unit_norm {
            return Ok(Self {
                axis: axis / norm,
                angle,
            });
        }
        match validation {
            Validation::Normalize if norm > f64::EPSILON => {
                log::debug!("normalizing rotation axis with norm {norm}");
                Ok(Self {
                    axis: axis / norm,
                    angle,
                })
            }
            _ => Err(LieError::NonUnitAxis { norm }),
        }
    }

    /// Split a rotation vector `θ·a` into axis and angle with the default
    /// tolerance.
    pub fn from_rotation_vector(v: DVec3) -> Self {
        Self::from_rotation_vector_with(v, &Tolerance::default())
    }

    /// Split a rotation vector `θ·a` into axis and angle.
    ///
    /// Vectors shorter than `tol.small_angle` give [`AngleAxis::ZERO`].
    pub fn from_rotation_vector_with(v: DVec3, tol: &Tolerance) -> Self {
        let angle = v.length();
        if angle < tol.small_angle {
            return Self::ZERO;
        }
        Self {
            axis: v / angle,
            angle,
        }
    }

    /// Extract axis and angle from a rotation matrix, angle in `[0, π]`.
    ///
    /// PRECONDITION: `m` is a rotation matrix. Use [`crate::SO3F64::from_matrix`]
    /// to validate untrusted input first.
    pub fn from_matrix(m: &DMat3, tol: &Tolerance) -> Self {
        matrix_to_angle_axis(m, tol)
    }

    /// Unit rotation axis.
    #[inline]
    pub fn axis(&self) -> DVec3 {
        self.axis
    }

    /// Rotation angle in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The rotation vector `θ·a`.
    #[inline]
    pub fn rotation_vector(&self) -> DVec3 {
        self.axis * self.angle
    }

    /// Rotation matrix via Rodrigues' formula.
    #[inline]
    pub fn to_matrix(&self) -> DMat3 {
        angle_axis_to_matrix(self.axis, self.angle)
    }

    /// Unit quaternion `(sin(θ/2)·a, cos(θ/2))` in canonical sign.
    pub fn to_quaternion(&self) -> DQuat {
        let (s, c) = (0.5 * self.angle).sin_cos();
        let v = self.axis * s;
        canonicalize_quaternion(DQuat::from_xyzw(v.x, v.y, v.z, c))
    }

    /// Same rotation expressed with the opposite axis and negated angle.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            axis: -self.axis,
            angle: -self.angle,
        }
    }
}

impl Default for AngleAxis {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_new_validates_axis() {
        assert!(AngleAxis::new(DVec3::Z, 1.0).is_ok());
        assert_eq!(
            AngleAxis::new(DVec3::new(0.0, 0.0, 2.0), 1.0),
            Err(LieError::NonUnitAxis { norm: 2.0 })
        );
        assert_eq!(
            AngleAxis::new(DVec3::new(f64::NAN, 0.0, 1.0), 1.0),
            Err(LieError::NonFinite)
        );
    }

    #[test]
    fn test_near_unit_axis_is_normalized() -> Result<(), LieError> {
        let aa = AngleAxis::new(DVec3::new(0.0, 0.6, 0.8) * (1.0 - 5e-7), 0.3)?;
        assert_relative_eq!(aa.axis().length(), 1.0, epsilon = 1e-15);
        Ok(())
    }

    #[test]
    fn test_new_with_normalize() -> Result<(), LieError> {
        let tol = Tolerance::default();
        let aa = AngleAxis::new_with(DVec3::new(0.0, 3.0, 4.0), 0.5, &tol, Validation::Normalize)?;
        assert!(aa.axis().abs_diff_eq(DVec3::new(0.0, 0.6, 0.8), EPSILON));
        assert_relative_eq!(aa.angle(), 0.5);
        assert!(AngleAxis::new_with(DVec3::ZERO, 0.5, &tol, Validation::Normalize).is_err());
        Ok(())
    }

    #[test]
    fn test_rotation_vector_roundtrip() {
        let v = DVec3::new(0.1, -0.2, 0.3);
        let aa = AngleAxis::from_rotation_vector(v);
        assert_relative_eq!(aa.axis().length(), 1.0, epsilon = EPSILON);
        assert!(aa.rotation_vector().abs_diff_eq(v, EPSILON));
        assert_eq!(AngleAxis::from_rotation_vector(DVec3::ZERO), AngleAxis::ZERO);
    }

    #[test]
    fn test_to_quaternion() -> Result<(), LieError> {
        let aa = AngleAxis::new(DVec3::Z, FRAC_PI_2)?;
        let q = aa.to_quaternion();
        assert_relative_eq!(q.w, 0.5f64.sqrt(), epsilon = EPSILON);
        assert_relative_eq!(q.z, 0.5f64.sqrt(), epsilon = EPSILON);
        // angles beyond π produce the canonical hemisphere
        let q = AngleAxis::new(DVec3::X, 3.0 * FRAC_PI_2)?.to_quaternion();
        assert!(q.w >= 0.0);
        assert!(q.x < 0.0);
        Ok(())
    }

    #[test]
    fn test_matrix_roundtrip() -> Result<(), LieError> {
        let aa = AngleAxis::new(DVec3::new(1.0, 1.0, 1.0).normalize(), 2.0)?;
        let back = AngleAxis::from_matrix(&aa.to_matrix(), &Tolerance::default());
        assert!(back.axis().abs_diff_eq(aa.axis(), 1e-10));
        assert_relative_eq!(back.angle(), aa.angle(), epsilon = 1e-10);
        Ok(())
    }

    #[test]
    fn test_rotation_vector_small_angle_tolerance() {
        let v = DVec3::new(0.0, 0.0, 1e-5);
        let aa = AngleAxis::from_rotation_vector(v);
        assert!(aa.axis().abs_diff_eq(DVec3::Z, EPSILON));
        assert_relative_eq!(aa.angle(), 1e-5);

        let coarse = Tolerance {
            small_angle: 1e-4,
            ..Default::default()
        };
        assert_eq!(AngleAxis::from_rotation_vector_with(v, &coarse), AngleAxis::ZERO);
        assert_eq!(AngleAxis::from_rotation_vector(DVec3::ZERO), AngleAxis::ZERO);
    }

    #[test]
    fn test_flipped_is_same_rotation() -> Result<(), LieError> {
        let aa = AngleAxis::new(DVec3::Y, 0.8)?;
        assert!(aa.flipped().to_matrix().abs_diff_eq(aa.to_matrix(), EPSILON));
        Ok(())
    }
}
