//! Rate Jacobians of the rotation parameterizations.
//!
//! These map the time derivative of a parameterization to angular velocity
//! and back. The angular velocity is expressed either in the rotating body
//! frame or in the fixed world frame, chosen by [`VelocityFrame`]:
//!
//! ```text
//! q̇ = ½ q ⊗ (ω_b, 0)        q̇ = ½ (ω_w, 0) ⊗ q
//! ```
//!
//! The exp-coordinate Jacobians live on the group types themselves, see
//! [`crate::SO3F64::left_jacobian`] and [`crate::SE2F64::right_jacobian`].

use crate::error::LieError;
use crate::rotation::{axis_rotation, skew, EulerAngles, EulerFrame};
use crate::tolerance::Tolerance;
use glam::{DMat3, DQuat, DVec3};

/// Frame in which an angular velocity is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VelocityFrame {
    /// Axes attached to the rotating body.
    #[default]
    Body,
    /// Fixed world axes.
    World,
}

/// 4x3 matrix `E(q)` with `q̇ = E(q)·ω`, rows ordered `x, y, z, w`.
///
/// ```text
/// E_body  = ½ ⎡ w·I + [v]ₓ ⎤     E_world = ½ ⎡ w·I − [v]ₓ ⎤
///             ⎣    −vᵀ     ⎦                 ⎣    −vᵀ     ⎦
/// ```
pub fn quaternion_rate_jacobian(q: DQuat, frame: VelocityFrame) -> [[f64; 3]; 4] {
    let v = DVec3::new(q.x, q.y, q.z);
    let sign = match frame {
        VelocityFrame::Body => 1.0,
        VelocityFrame::World => -1.0,
    };
    let top = DMat3::from_diagonal(DVec3::splat(q.w)) + skew(v) * sign;
    let row = |r: usize| [0.5 * top.x_axis[r], 0.5 * top.y_axis[r], 0.5 * top.z_axis[r]];
    [row(0), row(1), row(2), [-0.5 * v.x, -0.5 * v.y, -0.5 * v.z]]
}

/// Quaternion time derivative for angular velocity `omega`.
pub fn quaternion_rate(q: DQuat, omega: DVec3, frame: VelocityFrame) -> DQuat {
    let w = DQuat::from_xyzw(omega.x, omega.y, omega.z, 0.0);
    match frame {
        VelocityFrame::Body => q * w * 0.5,
        VelocityFrame::World => w * q * 0.5,
    }
}

/// Angular velocity from a unit quaternion and its time derivative.
///
/// Inverse of [`quaternion_rate`]. The scalar part of the product, which is
/// zero when `q̇` is tangent to the unit sphere, is discarded.
pub fn angular_velocity_from_quaternion_rate(
    q: DQuat,
    q_dot: DQuat,
    frame: VelocityFrame,
) -> DVec3 {
    let p = match frame {
        VelocityFrame::Body => q.conjugate() * q_dot,
        VelocityFrame::World => q_dot * q.conjugate(),
    };
    2.0 * DVec3::new(p.x, p.y, p.z)
}

/// Matrix `J` with `ω = J·[ȧ, ḃ, ċ]` for Euler angles `[a, b, c]`.
///
/// Each column is the axis of the corresponding elementary rotation,
/// expressed in the requested frame.
pub fn euler_rate_jacobian(angles: &EulerAngles, frame: VelocityFrame) -> DMat3 {
    let [i, j, k] = angles.convention.sequence.axes();
    let [a, b, c] = angles.angles;
    let e = |axis: usize| DMat3::IDENTITY.col(axis);

    let world = match angles.convention.frame {
        // R = R_i(a)·R_j(b)·R_k(c)
        EulerFrame::Intrinsic => {
            let ri = axis_rotation(i, a);
            DMat3::from_cols(e(i), ri * e(j), ri * axis_rotation(j, b) * e(k))
        }
        // R = R_k(c)·R_j(b)·R_i(a)
        EulerFrame::Extrinsic => {
            let rk = axis_rotation(k, c);
            DMat3::from_cols(rk * axis_rotation(j, b) * e(i), rk * e(j), e(k))
        }
    };

    match frame {
        VelocityFrame::World => world,
        VelocityFrame::Body => angles.to_matrix().transpose() * world,
    }
}

/// Matrix mapping angular velocity to Euler-angle rates.
///
/// Fails with [`LieError::SingularJacobian`] at gimbal lock, where the rates
/// of the first and third angles are not separable.
pub fn inverse_euler_rate_jacobian(
    angles: &EulerAngles,
    frame: VelocityFrame,
    tol: &Tolerance,
) -> Result<DMat3, LieError> {
    if angles.is_gimbal_locked(tol) {
        log::trace!(
            "euler rate jacobian singular for {} at {:?}",
            angles.convention,
            angles.angles
        );
        return Err(LieError::SingularJacobian {
            reason: format!(
                "gimbal lock in {} at middle angle {}",
                angles.convention, angles.angles[1]
            ),
        });
    }
    Ok(euler_rate_jacobian(angles, frame).inverse())
}

/// Central-difference Jacobian of `f` at `x`, indexed `[output][input]`.
pub fn numerical_jacobian<const N: usize, const M: usize>(
    f: impl Fn([f64; N]) -> [f64; M],
    x: [f64; N],
    h: f64,
) -> [[f64; N]; M] {
    let mut jacobian = [[0.0; N]; M];
    let inv_2h = 1.0 / (2.0 * h);

    for c in 0..N {
        let mut plus = x;
        let mut minus = x;
        plus[c] += h;
        minus[c] -= h;

        let (fp, fm) = (f(plus), f(minus));
        for (r, row) in jacobian.iter_mut().enumerate() {
            row[c] = (fp[r] - fm[r]) * inv_2h;
        }
    }

    jacobian
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{EulerConvention, EulerSequence};
    use crate::so3::SO3F64;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-12;
    const NUM_EPSILON: f64 = 1e-6;

    fn assert_mat3_eq(m: &DMat3, n: &[[f64; 3]; 3], epsilon: f64) {
        for (r, row) in n.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                assert_relative_eq!(m.col(c)[r], *value, epsilon = epsilon);
            }
        }
    }

    #[test]
    fn test_quaternion_rate_matches_jacobian() {
        let q = SO3F64::from_random().quaternion();
        let omega = DVec3::new(0.3, -1.2, 0.5);
        for frame in [VelocityFrame::Body, VelocityFrame::World] {
            let e = quaternion_rate_jacobian(q, frame);
            let q_dot = quaternion_rate(q, omega, frame);
            let dot = |row: [f64; 3]| row[0] * omega.x + row[1] * omega.y + row[2] * omega.z;
            assert_relative_eq!(q_dot.x, dot(e[0]), epsilon = EPSILON);
            assert_relative_eq!(q_dot.y, dot(e[1]), epsilon = EPSILON);
            assert_relative_eq!(q_dot.z, dot(e[2]), epsilon = EPSILON);
            assert_relative_eq!(q_dot.w, dot(e[3]), epsilon = EPSILON);
            // tangent to the unit sphere
            assert_relative_eq!(q.dot(q_dot), 0.0, epsilon = EPSILON);

            let back = angular_velocity_from_quaternion_rate(q, q_dot, frame);
            assert!(back.abs_diff_eq(omega, 1e-10));
        }
    }

    #[test]
    fn test_quaternion_rate_integrates() {
        // one small Euler step matches the exact body-frame increment
        let q = SO3F64::from_random();
        let omega = DVec3::new(0.1, 0.2, -0.3);
        let dt = 1e-6;
        let q_dot = quaternion_rate(q.quaternion(), omega, VelocityFrame::Body);
        let stepped = (q.quaternion() + q_dot * dt).normalize();
        let exact = (q * SO3F64::exp(omega * dt)).quaternion();
        assert!(stepped.abs_diff_eq(exact, 1e-10) || stepped.abs_diff_eq(-exact, 1e-10));

        let q_dot = quaternion_rate(q.quaternion(), omega, VelocityFrame::World);
        let stepped = (q.quaternion() + q_dot * dt).normalize();
        let exact = (SO3F64::exp(omega * dt) * q).quaternion();
        assert!(stepped.abs_diff_eq(exact, 1e-10) || stepped.abs_diff_eq(-exact, 1e-10));
    }

    #[test]
    fn test_roll_pitch_yaw_body_rates() {
        // classic aerospace result for intrinsic ZYX (yaw, pitch, roll)
        let (yaw, pitch, roll) = (0.4, 0.3, -0.2);
        let angles = EulerAngles::new([yaw, pitch, roll], EulerConvention::YAW_PITCH_ROLL);
        let j = euler_rate_jacobian(&angles, VelocityFrame::Body);
        let (sp, cp) = pitch.sin_cos();
        let (sr, cr) = roll.sin_cos();
        let expected = [
            [-sp, 0.0, 1.0],
            [cp * sr, cr, 0.0],
            [cp * cr, -sr, 0.0],
        ];
        assert_mat3_eq(&j, &expected, EPSILON);
    }

    #[test]
    fn test_euler_rate_jacobian_matches_numerical() {
        let angles = [0.3, -0.4, 1.1];
        for sequence in EulerSequence::ALL {
            for convention in [
                EulerConvention::new(sequence, EulerFrame::Intrinsic),
                EulerConvention::new(sequence, EulerFrame::Extrinsic),
            ] {
                let base = EulerAngles::new(angles, convention);
                let r0 = base.to_rotation();
                let perturbed = |d: [f64; 3]| {
                    let a = [angles[0] + d[0], angles[1] + d[1], angles[2] + d[2]];
                    EulerAngles::new(a, convention).to_rotation()
                };
                let world = numerical_jacobian(
                    |d| SO3F64::lminus(&perturbed(d), &r0).to_array(),
                    [0.0; 3],
                    1e-6,
                );
                let body = numerical_jacobian(|d| r0.rminus(&perturbed(d)).to_array(), [0.0; 3], 1e-6);
                assert_mat3_eq(&euler_rate_jacobian(&base, VelocityFrame::World), &world, NUM_EPSILON);
                assert_mat3_eq(&euler_rate_jacobian(&base, VelocityFrame::Body), &body, NUM_EPSILON);
            }
        }
    }

    #[test]
    fn test_inverse_euler_rate_jacobian() -> Result<(), LieError> {
        let tol = Tolerance::default();
        let angles = EulerAngles::roll_pitch_yaw(0.2, 0.5, -1.0);
        for frame in [VelocityFrame::Body, VelocityFrame::World] {
            let j = euler_rate_jacobian(&angles, frame);
            let j_inv = inverse_euler_rate_jacobian(&angles, frame, &tol)?;
            assert!((j * j_inv).abs_diff_eq(DMat3::IDENTITY, 1e-10));
        }

        let locked = EulerAngles::roll_pitch_yaw(0.2, FRAC_PI_2, -1.0);
        assert!(matches!(
            inverse_euler_rate_jacobian(&locked, VelocityFrame::Body, &tol),
            Err(LieError::SingularJacobian { .. })
        ));
        let locked = EulerAngles::new([0.1, 0.0, 0.3], EulerConvention::ZYZ);
        assert!(matches!(
            inverse_euler_rate_jacobian(&locked, VelocityFrame::World, &tol),
            Err(LieError::SingularJacobian { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_so3_jacobians_match_numerical() {
        for v in [DVec3::new(0.3, -0.5, 0.8), DVec3::new(1e-9, 0.0, 0.0), DVec3::new(0.0, 3.0, 0.0)] {
            let x = SO3F64::exp(v);
            let perturbed = |d: [f64; 3]| SO3F64::exp(v + DVec3::from_array(d));
            let right = numerical_jacobian(|d| x.rminus(&perturbed(d)).to_array(), [0.0; 3], 1e-6);
            let left = numerical_jacobian(|d| SO3F64::lminus(&perturbed(d), &x).to_array(), [0.0; 3], 1e-6);
            let to_rows = |m: DMat3| {
                let t = m.transpose();
                [t.x_axis.to_array(), t.y_axis.to_array(), t.z_axis.to_array()]
            };
            assert_mat3_eq(&SO3F64::right_jacobian(v), &right, NUM_EPSILON);
            assert_mat3_eq(&SO3F64::left_jacobian(v), &left, NUM_EPSILON);
            assert_mat3_eq(
                &SO3F64::left_jacobian_inverse(v),
                &to_rows(SO3F64::left_jacobian(v).inverse()),
                1e-9,
            );
            assert_mat3_eq(
                &SO3F64::right_jacobian_inverse(v),
                &to_rows(SO3F64::right_jacobian(v).inverse()),
                1e-9,
            );
        }
    }

    #[test]
    fn test_numerical_jacobian_linear() {
        // f(x) = A·x has Jacobian A
        let jac = numerical_jacobian(
            |x: [f64; 2]| [2.0 * x[0] - x[1], 3.0 * x[1], x[0] + x[1]],
            [0.5, -1.0],
            1e-4,
        );
        assert_eq!(jac.len(), 3);
        assert_relative_eq!(jac[0][0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(jac[0][1], -1.0, epsilon = 1e-9);
        assert_relative_eq!(jac[1][1], 3.0, epsilon = 1e-9);
        assert_relative_eq!(jac[2][0], 1.0, epsilon = 1e-9);
    }
}
