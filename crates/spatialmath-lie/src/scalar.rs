//! Angle wrapping, closeness tests and trigonometric ratios that stay finite
//! at the origin.

use std::f64::consts::{PI, TAU};

/// Default threshold below which the ratio helpers switch to Taylor series.
pub const SMALL_ANGLE_EPSILON: f64 = 1.0e-8;

/// Wrap an angle to `[-π, π)`.
#[inline]
pub fn wrap_to_pi(theta: f64) -> f64 {
    (theta + PI).rem_euclid(TAU) - PI
}

/// Wrap an angle to `[0, 2π)`.
#[inline]
pub fn wrap_to_2pi(theta: f64) -> f64 {
    theta.rem_euclid(TAU)
}

/// Signed difference `a − b` wrapped to `[-π, π)`.
#[inline]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    wrap_to_pi(a - b)
}

/// Clamp to `[-1, 1]`, absorbing drift before `acos`/`asin`.
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// `|x| < tol`.
#[inline]
pub fn is_near_zero(x: f64, tol: f64) -> bool {
    x.abs() < tol
}

/// `|a − b| <= tol`.
#[inline]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// `sin(θ)/θ`, equal to 1 at the origin.
#[inline]
pub fn sin_over_x(theta: f64) -> f64 {
    if theta.abs() < SMALL_ANGLE_EPSILON {
        1.0 - theta * theta / 6.0
    } else {
        theta.sin() / theta
    }
}

/// `(1 − cos θ)/θ²`, equal to 1/2 at the origin.
#[inline]
pub fn one_minus_cos_over_x2(theta: f64) -> f64 {
    if theta.abs() < SMALL_ANGLE_EPSILON {
        0.5 - theta * theta / 24.0
    } else {
        // 2·sin²(θ/2)/θ² avoids the cancellation in 1 − cos θ
        let half = 0.5 * theta;
        let s = half.sin() / half;
        0.5 * s * s
    }
}

/// `(θ − sin θ)/θ³`, equal to 1/6 at the origin.
#[inline]
pub fn x_minus_sin_over_x3(theta: f64) -> f64 {
    // cancellation makes the closed form inaccurate well above 1e-8
    if theta.abs() < 1e-4 {
        1.0 / 6.0 - theta * theta / 120.0
    } else {
        (theta - theta.sin()) / (theta * theta * theta)
    }
}

/// `(1 − cos θ)/θ`, equal to 0 at the origin.
#[inline]
pub fn one_minus_cos_over_x(theta: f64) -> f64 {
    if theta.abs() < SMALL_ANGLE_EPSILON {
        theta / 2.0
    } else {
        let half = (0.5 * theta).sin();
        2.0 * half * half / theta
    }
}
