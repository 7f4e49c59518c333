//! Closed-form conversions between rotation matrices, unit quaternions and
//! rotation vectors.
//!
//! Quaternions use glam's `[x, y, z, w]` layout. Every quaternion returned
//! from this module is in canonical sign (see [`canonicalize_quaternion`]).

use super::AngleAxis;
use crate::scalar::{clamp_unit, one_minus_cos_over_x2, sin_over_x};
use crate::tolerance::Tolerance;
use glam::{DMat3, DQuat, DVec3};

/// Entry at row `r`, column `c` of a column-major glam matrix.
#[inline]
pub(crate) fn at(m: &DMat3, r: usize, c: usize) -> f64 {
    m.col(c)[r]
}

/// Pick the representative of `{q, -q}` with a non-negative scalar part.
///
/// When `w == 0` the tie is broken by making the first non-zero of
/// `x, y, z` positive, so the result is fully deterministic.
pub fn canonicalize_quaternion(q: DQuat) -> DQuat {
    if q.w > 0.0 {
        return q;
    }
    if q.w < 0.0 {
        return -q;
    }
    let first_nonzero = [q.x, q.y, q.z].into_iter().find(|v| *v != 0.0);
    match first_nonzero {
        Some(v) if v < 0.0 => -q,
        _ => q,
    }
}

/// Skew-symmetric matrix `[v]ₓ` such that `[v]ₓ·u = v × u`.
pub fn skew(v: DVec3) -> DMat3 {
    let (a, b, c) = (v.x, v.y, v.z);
    DMat3::from_cols_array(&[0.0, c, -b, -c, 0.0, a, b, -a, 0.0])
}

/// Inverse of [`skew`], reading the off-diagonal entries below the diagonal.
pub fn unskew(m: &DMat3) -> DVec3 {
    DVec3::new(m.y_axis.z, m.z_axis.x, m.x_axis.y)
}

/// Convert a rotation matrix to a unit quaternion in canonical sign.
///
/// Uses Shepperd's method: the largest of `trace, R₀₀, R₁₁, R₂₂` selects the
/// branch, so the divisor is never close to zero.
///
/// PRECONDITION: `m` is a rotation matrix.
pub fn matrix_to_quaternion(m: &DMat3) -> DQuat {
    let (m00, m11, m22) = (at(m, 0, 0), at(m, 1, 1), at(m, 2, 2));
    let trace = m00 + m11 + m22;

    let q = if trace >= m00 && trace >= m11 && trace >= m22 {
        let s = 2.0 * (1.0 + trace).sqrt();
        DQuat::from_xyzw(
            (at(m, 2, 1) - at(m, 1, 2)) / s,
            (at(m, 0, 2) - at(m, 2, 0)) / s,
            (at(m, 1, 0) - at(m, 0, 1)) / s,
            0.25 * s,
        )
    } else if m00 >= m11 && m00 >= m22 {
        let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
        DQuat::from_xyzw(
            0.25 * s,
            (at(m, 0, 1) + at(m, 1, 0)) / s,
            (at(m, 0, 2) + at(m, 2, 0)) / s,
            (at(m, 2, 1) - at(m, 1, 2)) / s,
        )
    } else if m11 >= m22 {
        let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
        DQuat::from_xyzw(
            (at(m, 0, 1) + at(m, 1, 0)) / s,
            0.25 * s,
            (at(m, 1, 2) + at(m, 2, 1)) / s,
            (at(m, 0, 2) - at(m, 2, 0)) / s,
        )
    } else {
        let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
        DQuat::from_xyzw(
            (at(m, 0, 2) + at(m, 2, 0)) / s,
            (at(m, 1, 2) + at(m, 2, 1)) / s,
            0.25 * s,
            (at(m, 1, 0) - at(m, 0, 1)) / s,
        )
    };

    canonicalize_quaternion(q.normalize())
}

/// Convert a unit quaternion to a rotation matrix.
#[inline]
pub fn quaternion_to_matrix(q: DQuat) -> DMat3 {
    DMat3::from_quat(q)
}

/// Rodrigues' formula `R = I + sin θ/θ·[ω]ₓ + (1 − cos θ)/θ²·[ω]ₓ²`.
///
/// Below the small-angle threshold the ratios use their Taylor expansions,
/// so a zero vector gives the identity exactly.
pub fn so3_exp_matrix(omega: DVec3) -> DMat3 {
    let theta = omega.length();
    let w = skew(omega);
    DMat3::IDENTITY + sin_over_x(theta) * w + one_minus_cos_over_x2(theta) * (w * w)
}

/// Inverse Rodrigues: rotation matrix to axis and angle in `[0, π]`.
///
/// - `θ = acos((tr R − 1)/2)` with the cosine clamped to `[-1, 1]`.
/// - Below `tol.small_angle` the axis is undefined and `+X` is returned.
/// - Within `tol.near_pi` of π the axis comes from the symmetric part of
///   `R`, since the antisymmetric part vanishes there. Its sign follows the
///   antisymmetric part when that is still informative, otherwise the
///   largest-magnitude component is made positive.
pub fn matrix_to_angle_axis(m: &DMat3, tol: &Tolerance) -> AngleAxis {
    let trace = at(m, 0, 0) + at(m, 1, 1) + at(m, 2, 2);
    let cos_theta = clamp_unit(0.5 * (trace - 1.0));
    let theta = cos_theta.acos();

    // 2·sin θ·axis
    let antisym = DVec3::new(
        at(m, 2, 1) - at(m, 1, 2),
        at(m, 0, 2) - at(m, 2, 0),
        at(m, 1, 0) - at(m, 0, 1),
    );

    if theta < tol.small_angle {
        return AngleAxis::zero();
    }

    if std::f64::consts::PI - theta >= tol.near_pi {
        return AngleAxis::from_parts(antisym.normalize(), theta);
    }

    log::trace!("rotation angle {theta} is close to π, using symmetric part for the axis");

    // (R + Rᵀ)/2 = cos θ·I + (1 − cos θ)·a·aᵀ
    let one_minus_cos = 1.0 - cos_theta;
    let outer = |r: usize, c: usize| {
        let sym = 0.5 * (at(m, r, c) + at(m, c, r));
        let diag = if r == c { cos_theta } else { 0.0 };
        (sym - diag) / one_minus_cos
    };
    let diag = [outer(0, 0), outer(1, 1), outer(2, 2)];
    let k = (0..3)
        .max_by(|&i, &j| diag[i].total_cmp(&diag[j]))
        .unwrap_or(0);
    let a_k = diag[k].max(0.0).sqrt();
    let mut axis = DVec3::new(outer(0, k), outer(1, k), outer(2, k)) / a_k;
    axis = axis.normalize();

    let alignment = axis.dot(antisym);
    let flip = if alignment.abs() > tol.small_angle {
        alignment < 0.0
    } else {
        let largest = axis
            .to_array()
            .into_iter()
            .max_by(|a, b| a.abs().total_cmp(&b.abs()))
            .unwrap_or(0.0);
        largest < 0.0
    };
    if flip {
        axis = -axis;
    }
    AngleAxis::from_parts(axis, theta)
}

/// Rotation matrix from an axis and an angle.
///
/// PRECONDITION: `axis` is a unit vector.
#[inline]
pub fn angle_axis_to_matrix(axis: DVec3, angle: f64) -> DMat3 {
    so3_exp_matrix(axis * angle)
}

/// Matrix logarithm of a rotation, as a rotation vector with norm in `[0, π]`.
///
/// The identity maps to the zero vector exactly.
pub fn so3_log_matrix(m: &DMat3, tol: &Tolerance) -> DVec3 {
    matrix_to_angle_axis(m, tol).rotation_vector()
}
