//! Euler and Tait–Bryan angle triples tagged with their convention.
//!
//! A convention is an axis [`EulerSequence`] plus an [`EulerFrame`]:
//!
//! - intrinsic `(i, j, k)` with angles `(a, b, c)` is `R = Rᵢ(a)·Rⱼ(b)·Rₖ(c)`,
//!   each rotation about the axes of the already rotated frame;
//! - extrinsic `(i, j, k)` with angles `(a, b, c)` is `R = Rₖ(c)·Rⱼ(b)·Rᵢ(a)`,
//!   each rotation about the fixed world axes.
//!
//! Extrinsic `(i, j, k)` with `(a, b, c)` is therefore the same rotation as
//! intrinsic `(k, j, i)` with `(c, b, a)`.
//!
//! # Gimbal lock
//!
//! When the middle angle reaches a singular value (±π/2 for Tait–Bryan
//! sequences, 0 or π for proper Euler sequences) only the sum or difference
//! of the outer angles is observable. Decomposition then sets the
//! convention's **first** angle to zero and folds the whole outer rotation
//! into the third one. For roll-pitch-yaw this means `roll = 0`.

use super::convert::at;
use crate::error::LieError;
use crate::scalar::angle_diff;
use crate::so3::SO3F64;
use crate::tolerance::Tolerance;
use glam::DMat3;
use std::fmt;

/// Ordered triple of rotation axes.
///
/// Six Tait–Bryan sequences use three distinct axes, six proper Euler
/// sequences repeat the first axis last.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EulerSequence {
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
    XYX,
    XZX,
    YXY,
    YZY,
    ZXZ,
    ZYZ,
}

impl EulerSequence {
    /// All twelve sequences.
    pub const ALL: [Self; 12] = [
        Self::XYZ,
        Self::XZY,
        Self::YXZ,
        Self::YZX,
        Self::ZXY,
        Self::ZYX,
        Self::XYX,
        Self::XZX,
        Self::YXY,
        Self::YZY,
        Self::ZXZ,
        Self::ZYZ,
    ];

    /// Axis indices, `0 = X`, `1 = Y`, `2 = Z`.
    pub const fn axes(self) -> [usize; 3] {
        match self {
            Self::XYZ => [0, 1, 2],
            Self::XZY => [0, 2, 1],
            Self::YXZ => [1, 0, 2],
            Self::YZX => [1, 2, 0],
            Self::ZXY => [2, 0, 1],
            Self::ZYX => [2, 1, 0],
            Self::XYX => [0, 1, 0],
            Self::XZX => [0, 2, 0],
            Self::YXY => [1, 0, 1],
            Self::YZY => [1, 2, 1],
            Self::ZXZ => [2, 0, 2],
            Self::ZYZ => [2, 1, 2],
        }
    }

    /// Whether the first axis is repeated last (proper Euler sequence).
    pub const fn is_proper(self) -> bool {
        let [i, _, k] = self.axes();
        i == k
    }
}

impl fmt::Display for EulerSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [char; 3] = ['X', 'Y', 'Z'];
        let [i, j, k] = self.axes();
        write!(f, "{}{}{}", NAMES[i], NAMES[j], NAMES[k])
    }
}

/// Whether the elementary rotations are about moving or fixed axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EulerFrame {
    /// Each rotation is about an axis of the frame produced by the previous ones.
    Intrinsic,
    /// Each rotation is about a fixed world axis.
    Extrinsic,
}

impl fmt::Display for EulerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intrinsic => write!(f, "intrinsic"),
            Self::Extrinsic => write!(f, "extrinsic"),
        }
    }
}

/// Axis sequence plus frame, the full meaning of an Euler angle triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulerConvention {
    /// Axis order.
    pub sequence: EulerSequence,
    /// Moving or fixed axes.
    pub frame: EulerFrame,
}

impl EulerConvention {
    /// Roll about world X, then pitch about world Y, then yaw about world Z.
    pub const ROLL_PITCH_YAW: Self = Self::new(EulerSequence::XYZ, EulerFrame::Extrinsic);

    /// Yaw, pitch, roll about moving Z, Y, X. Same rotation as
    /// [`Self::ROLL_PITCH_YAW`] with the angles listed in reverse.
    pub const YAW_PITCH_ROLL: Self = Self::new(EulerSequence::ZYX, EulerFrame::Intrinsic);

    /// Classical intrinsic Z-Y-Z Euler angles.
    pub const ZYZ: Self = Self::new(EulerSequence::ZYZ, EulerFrame::Intrinsic);

    /// Create a convention.
    pub const fn new(sequence: EulerSequence, frame: EulerFrame) -> Self {
        Self { sequence, frame }
    }

    /// The intrinsic axis order that produces the same matrix, with the
    /// angles read in that order.
    const fn intrinsic_axes(self) -> [usize; 3] {
        let [i, j, k] = self.sequence.axes();
        match self.frame {
            EulerFrame::Intrinsic => [i, j, k],
            EulerFrame::Extrinsic => [k, j, i],
        }
    }
}

impl fmt::Display for EulerConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.frame, self.sequence)
    }
}

/// Which angle a gimbal-locked decomposition sets to zero, in intrinsic order.
#[derive(Clone, Copy)]
enum LockedAngle {
    First,
    Third,
}

/// Rotation about a single coordinate axis.
#[inline]
pub(crate) fn axis_rotation(axis: usize, angle: f64) -> DMat3 {
    match axis {
        0 => DMat3::from_rotation_x(angle),
        1 => DMat3::from_rotation_y(angle),
        _ => DMat3::from_rotation_z(angle),
    }
}

/// `+1` when `(i, j, k)` is a cyclic permutation of `(0, 1, 2)`.
#[inline]
fn parity(i: usize, j: usize) -> f64 {
    if j == (i + 1) % 3 {
        1.0
    } else {
        -1.0
    }
}

/// Decompose `m = Rᵢ(a)·Rⱼ(b)·Rₖ(c)` for intrinsic axes `[i, j, k]`.
fn decompose_intrinsic(m: &DMat3, axes: [usize; 3], gimbal: f64, locked: LockedAngle) -> [f64; 3] {
    let [i, j, last] = axes;
    let k = 3 - i - j;
    let s = parity(i, j);
    let r = |row: usize, col: usize| at(m, row, col);

    if i != last {
        // b in [-π/2, π/2]
        let cos_b = r(i, i).hypot(r(i, j));
        let b = (s * r(i, k)).atan2(cos_b);
        if cos_b > gimbal {
            let a = (-s * r(j, k)).atan2(r(k, k));
            let c = (-s * r(i, j)).atan2(r(i, i));
            return [a, b, c];
        }
        log::trace!("gimbal lock in tait-bryan decomposition, cos(b) = {cos_b}");
        return match locked {
            LockedAngle::First => [0.0, b, (s * r(j, i)).atan2(r(j, j))],
            LockedAngle::Third => [(s * r(k, j)).atan2(r(j, j)), b, 0.0],
        };
    }

    // b in [0, π]
    let sin_b = r(i, j).hypot(r(i, k));
    let b = sin_b.atan2(r(i, i));
    if sin_b > gimbal {
        let a = r(j, i).atan2(-s * r(k, i));
        let c = r(i, j).atan2(s * r(i, k));
        return [a, b, c];
    }
    log::trace!("gimbal lock in proper euler decomposition, sin(b) = {sin_b}");
    match locked {
        LockedAngle::First => [0.0, b, (-s * r(j, k)).atan2(r(j, j))],
        LockedAngle::Third => [(s * r(k, j)).atan2(r(j, j)), b, 0.0],
    }
}

/// Three angles in radians together with the convention that gives them meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulerAngles {
    /// Angles in the order of the convention's axis sequence.
    pub angles: [f64; 3],
    /// How to read the angles.
    pub convention: EulerConvention,
}

impl EulerAngles {
    /// Create an angle triple.
    pub const fn new(angles: [f64; 3], convention: EulerConvention) -> Self {
        Self { angles, convention }
    }

    /// Roll, pitch and yaw about the fixed X, Y and Z axes.
    pub const fn roll_pitch_yaw(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new([roll, pitch, yaw], EulerConvention::ROLL_PITCH_YAW)
    }

    /// Rotation matrix of the triple.
    pub fn to_matrix(&self) -> DMat3 {
        let [a, b, c] = self.angles;
        let [i, j, k] = self.convention.sequence.axes();
        match self.convention.frame {
            EulerFrame::Intrinsic => axis_rotation(i, a) * axis_rotation(j, b) * axis_rotation(k, c),
            EulerFrame::Extrinsic => axis_rotation(k, c) * axis_rotation(j, b) * axis_rotation(i, a),
        }
    }

    /// The rotation as an [`SO3F64`].
    pub fn to_rotation(&self) -> SO3F64 {
        SO3F64::from_euler(self)
    }

    /// Decompose a rotation matrix with the default tolerance.
    ///
    /// PRECONDITION: `m` is a rotation matrix.
    pub fn from_matrix(m: &DMat3, convention: EulerConvention) -> Self {
        Self::from_matrix_with(m, convention, &Tolerance::default())
    }

    /// Decompose a rotation matrix, declaring gimbal lock below `tol.gimbal`.
    ///
    /// The middle angle lies in `[-π/2, π/2]` for Tait–Bryan sequences and in
    /// `[0, π]` for proper Euler sequences. The outer angles lie in `[-π, π]`.
    /// At gimbal lock the first angle is zero (see the module docs).
    pub fn from_matrix_with(m: &DMat3, convention: EulerConvention, tol: &Tolerance) -> Self {
        let axes = convention.intrinsic_axes();
        let angles = match convention.frame {
            EulerFrame::Intrinsic => decompose_intrinsic(m, axes, tol.gimbal, LockedAngle::First),
            EulerFrame::Extrinsic => {
                // the convention's first angle is the last intrinsic one
                let [c, b, a] = decompose_intrinsic(m, axes, tol.gimbal, LockedAngle::Third);
                [a, b, c]
            }
        };
        Self { angles, convention }
    }

    /// Re-express the same rotation in another convention.
    pub fn to_convention(&self, target: EulerConvention, tol: &Tolerance) -> Self {
        if target == self.convention {
            return *self;
        }
        Self::from_matrix_with(&self.to_matrix(), target, tol)
    }

    /// Compose two rotations given in the same convention, `self` applied last.
    ///
    /// Fails with [`LieError::ConventionMismatch`] when the conventions
    /// differ; convert one side first with [`Self::to_convention`].
    pub fn compose(&self, other: &Self) -> Result<Self, LieError> {
        if self.convention != other.convention {
            return Err(LieError::ConventionMismatch {
                expected: self.convention,
                actual: other.convention,
            });
        }
        Ok(Self::from_matrix(
            &(self.to_matrix() * other.to_matrix()),
            self.convention,
        ))
    }

    /// Whether the middle angle sits at a singular configuration.
    pub fn is_gimbal_locked(&self, tol: &Tolerance) -> bool {
        let b = self.angles[1];
        if self.convention.sequence.is_proper() {
            b.sin().abs() < tol.gimbal
        } else {
            b.cos().abs() < tol.gimbal
        }
    }

    /// Same convention and every angle within `tol` modulo 2π.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.convention == other.convention
            && self
                .angles
                .iter()
                .zip(other.angles.iter())
                .all(|(a, b)| angle_diff(*a, *b).abs() <= tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-9;

    fn all_conventions() -> impl Iterator<Item = EulerConvention> {
        EulerSequence::ALL.into_iter().flat_map(|s| {
            [EulerFrame::Intrinsic, EulerFrame::Extrinsic]
                .into_iter()
                .map(move |f| EulerConvention::new(s, f))
        })
    }

    #[test]
    fn test_display() {
        assert_eq!(EulerConvention::ROLL_PITCH_YAW.to_string(), "extrinsic XYZ");
        assert_eq!(EulerConvention::ZYZ.to_string(), "intrinsic ZYZ");
        assert_eq!(EulerSequence::YZX.to_string(), "YZX");
    }

    #[test]
    fn test_rpy_yaw_only() {
        let m = EulerAngles::roll_pitch_yaw(0.0, 0.0, FRAC_PI_2).to_matrix();
        assert!(m.abs_diff_eq(DMat3::from_rotation_z(FRAC_PI_2), EPSILON));
    }

    #[test]
    fn test_rpy_matches_composition() {
        let (roll, pitch, yaw) = (0.1, 0.2, 0.3);
        let expected = DMat3::from_rotation_z(yaw)
            * DMat3::from_rotation_y(pitch)
            * DMat3::from_rotation_x(roll);
        let m = EulerAngles::roll_pitch_yaw(roll, pitch, yaw).to_matrix();
        assert!(m.abs_diff_eq(expected, EPSILON));
        let ypr = EulerAngles::new([yaw, pitch, roll], EulerConvention::YAW_PITCH_ROLL);
        assert!(ypr.to_matrix().abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn test_roundtrip_all_conventions() {
        let mut rng = rand::rng();
        for convention in all_conventions() {
            for _ in 0..20 {
                let middle = if convention.sequence.is_proper() {
                    rng.random_range(0.1..PI - 0.1)
                } else {
                    rng.random_range(-FRAC_PI_2 + 0.1..FRAC_PI_2 - 0.1)
                };
                let angles = [
                    rng.random_range(-PI + 0.01..PI - 0.01),
                    middle,
                    rng.random_range(-PI + 0.01..PI - 0.01),
                ];
                let e = EulerAngles::new(angles, convention);
                let back = EulerAngles::from_matrix(&e.to_matrix(), convention);
                assert!(
                    back.approx_eq(&e, 1e-9),
                    "{convention}: {angles:?} -> {:?}",
                    back.angles
                );
            }
        }
    }

    #[test]
    fn test_gimbal_lock_rpy_fixes_roll() {
        let e = EulerAngles::roll_pitch_yaw(0.3, FRAC_PI_2, 0.5);
        let m = e.to_matrix();
        let back = EulerAngles::from_matrix(&m, EulerConvention::ROLL_PITCH_YAW);
        assert_eq!(back.angles[0], 0.0);
        assert_relative_eq!(back.angles[1], FRAC_PI_2, epsilon = 1e-6);
        assert!(back.to_matrix().abs_diff_eq(m, 1e-9));
        assert!(back.is_gimbal_locked(&Tolerance {
            gimbal: 1e-6,
            ..Default::default()
        }));
    }

    #[test]
    fn test_gimbal_lock_all_conventions_reconstruct() {
        for convention in all_conventions() {
            let middles = if convention.sequence.is_proper() {
                [0.0, PI]
            } else {
                [FRAC_PI_2, -FRAC_PI_2]
            };
            for middle in middles {
                let e = EulerAngles::new([0.4, middle, -1.1], convention);
                let m = e.to_matrix();
                let back = EulerAngles::from_matrix(&m, convention);
                assert_eq!(back.angles[0], 0.0, "{convention}");
                assert!(back.to_matrix().abs_diff_eq(m, 1e-9), "{convention}");
            }
        }
    }

    #[test]
    fn test_to_convention() {
        let rpy = EulerAngles::roll_pitch_yaw(0.1, -0.4, 2.0);
        let tol = Tolerance::default();
        let zyz = rpy.to_convention(EulerConvention::ZYZ, &tol);
        assert_eq!(zyz.convention, EulerConvention::ZYZ);
        assert!(zyz.to_matrix().abs_diff_eq(rpy.to_matrix(), EPSILON));
        let ypr = rpy.to_convention(EulerConvention::YAW_PITCH_ROLL, &tol);
        assert_relative_eq!(ypr.angles[0], 2.0, epsilon = EPSILON);
        assert_relative_eq!(ypr.angles[1], -0.4, epsilon = EPSILON);
        assert_relative_eq!(ypr.angles[2], 0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_compose() -> Result<(), LieError> {
        let a = EulerAngles::roll_pitch_yaw(0.0, 0.0, 0.3);
        let b = EulerAngles::roll_pitch_yaw(0.0, 0.0, 0.4);
        let c = a.compose(&b)?;
        assert_relative_eq!(c.angles[2], 0.7, epsilon = EPSILON);
        assert!(c.to_rotation().approx_eq(&SO3F64::rot_z(0.7), EPSILON));

        let zyz = EulerAngles::new([0.1, 0.2, 0.3], EulerConvention::ZYZ);
        assert_eq!(
            a.compose(&zyz),
            Err(LieError::ConventionMismatch {
                expected: EulerConvention::ROLL_PITCH_YAW,
                actual: EulerConvention::ZYZ,
            })
        );
        Ok(())
    }

    #[test]
    fn test_approx_eq_wraps() {
        let a = EulerAngles::roll_pitch_yaw(PI - 1e-12, 0.0, 0.0);
        let b = EulerAngles::roll_pitch_yaw(-PI + 1e-12, 0.0, 0.0);
        assert!(a.approx_eq(&b, 1e-9));
    }
}
