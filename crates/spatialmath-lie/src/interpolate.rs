//! Interpolation on the rotation and pose groups.
//!
//! - [`slerp`]: constant angular velocity path between two unit quaternions.
//! - [`interpolate`]: geodesic `a ∘ exp(s·log(a⁻¹ ∘ b))` on any [`LieGroup`].
//!   On SE(2) and SE(3) this is the screw motion between the two poses.
//! - [`Trajectory`]: time-stamped keyframes sampled by piecewise geodesics.

use crate::error::LieError;
use crate::group::LieGroup;
use crate::scalar::clamp_unit;
use glam::DQuat;

/// Below this distance of `|cos Ω|` to 1 the arc is too short for the sine
/// ratios and slerp falls back to normalized linear interpolation.
const SLERP_LINEAR_THRESHOLD: f64 = 1e-6;

/// Spherical linear interpolation between two unit quaternions.
///
/// `s = 0` returns `q0` and `s = 1` returns `q1` (or `-q1`, the same
/// rotation). The shorter of the two arcs is always taken. Values of `s`
/// outside `[0, 1]` extrapolate along the same great circle. The result is
/// unit length.
pub fn slerp(q0: DQuat, q1: DQuat, s: f64) -> DQuat {
    let mut cos_omega = q0.dot(q1);

    // q and -q are the same rotation, pick the closer hemisphere
    let q1 = if cos_omega < 0.0 {
        cos_omega = -cos_omega;
        -q1
    } else {
        q1
    };

    if 1.0 - cos_omega < SLERP_LINEAR_THRESHOLD {
        log::trace!("slerp: nearly identical rotations, falling back to lerp");
        return (q0 * (1.0 - s) + q1 * s).normalize();
    }

    let omega = clamp_unit(cos_omega).acos();
    let sin_omega = omega.sin();
    let a = ((1.0 - s) * omega).sin() / sin_omega;
    let b = (s * omega).sin() / sin_omega;

    (q0 * a + q1 * b).normalize()
}

/// Geodesic interpolation `a ∘ exp(s·log(a⁻¹ ∘ b))`.
///
/// `s` is not clamped.
pub fn interpolate<G: LieGroup>(a: &G, b: &G, s: f64) -> G {
    a.compose(&G::exp(&(a.between(b).log() * s)))
}

/// Validate keyframe times: at least `required` of them, finite and strictly
/// increasing.
pub(crate) fn check_keyframe_times<const N: usize>(
    times: &[f64; N],
    required: usize,
) -> Result<(), LieError> {
    if N < required {
        return Err(LieError::TooFewPoses {
            required,
            actual: N,
        });
    }
    if !times.iter().all(|t| t.is_finite()) {
        return Err(LieError::NonFinite);
    }
    if let Some(index) = (1..N).find(|&i| times[i] <= times[i - 1]) {
        return Err(LieError::NonIncreasingTimes { index });
    }
    Ok(())
}

/// Index of the segment `[times[i], times[i + 1]]` containing `t` and the
/// fraction of the way through it, `t` clamped to the keyframe interval.
///
/// PRECONDITION: `N >= 2` and `times` is strictly increasing.
pub(crate) fn locate_segment<const N: usize>(times: &[f64; N], t: f64) -> (usize, f64) {
    let i = times.partition_point(|&ti| ti <= t).clamp(1, N - 1) - 1;
    let s = (t - times[i]) / (times[i + 1] - times[i]);
    (i, s.clamp(0.0, 1.0))
}

/// Keyframes of a Lie group element at strictly increasing times, joined by
/// geodesics.
///
/// Sampling between two keyframes interpolates along the geodesic joining
/// them, so SE(3) trajectories move along a screw on each segment. The path
/// is continuous but its velocity jumps at every keyframe; see
/// [`crate::spline::InterpSplineSE3`] for a smooth interpolant. Samples
/// before the first time or after the last are clamped to the end keyframes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory<G, const N: usize> {
    times: [f64; N],
    poses: [G; N],
}

impl<G: LieGroup, const N: usize> Trajectory<G, N> {
    /// Create a trajectory from keyframes.
    ///
    /// Fails with [`LieError::TooFewPoses`] when there are no keyframes,
    /// [`LieError::NonIncreasingTimes`] when the times are not strictly
    /// increasing and [`LieError::NonFinite`] for non-finite times.
    pub fn new(times: [f64; N], poses: [G; N]) -> Result<Self, LieError> {
        check_keyframe_times(&times, 1)?;
        Ok(Self { times, poses })
    }

    /// Keyframe times.
    pub fn times(&self) -> &[f64; N] {
        &self.times
    }

    /// Keyframe poses.
    pub fn poses(&self) -> &[G; N] {
        &self.poses
    }

    /// Time of the first keyframe.
    pub fn start_time(&self) -> f64 {
        self.times[0]
    }

    /// Time of the last keyframe.
    pub fn end_time(&self) -> f64 {
        self.times[N - 1]
    }

    /// Same keyframes with times rescaled to `[0, 1]`.
    ///
    /// A single keyframe is placed at `0`.
    pub fn with_normalized_time(&self) -> Self {
        let (t0, span) = (self.start_time(), self.end_time() - self.start_time());
        let mut times = self.times;
        if span > 0.0 {
            times.iter_mut().for_each(|t| *t = (*t - t0) / span);
        } else {
            times.iter_mut().for_each(|t| *t = 0.0);
        }
        Self {
            times,
            poses: self.poses,
        }
    }

    /// Pose at time `t`, clamped to the end keyframes.
    pub fn sample(&self, t: f64) -> G {
        if t <= self.times[0] {
            return self.poses[0];
        }
        if t >= self.times[N - 1] {
            return self.poses[N - 1];
        }
        // first keyframe strictly after t, in 1..N
        let i = self.times.partition_point(|&ti| ti <= t);
        let (t0, t1) = (self.times[i - 1], self.times[i]);
        interpolate(&self.poses[i - 1], &self.poses[i], (t - t0) / (t1 - t0))
    }

    /// Body-frame velocity of the segment containing `t`, constant on each
    /// segment. Zero outside the keyframe interval.
    pub fn velocity(&self, t: f64) -> G::Tangent {
        if N < 2 || t < self.times[0] || t > self.times[N - 1] {
            return G::identity().log();
        }
        let i = self.times.partition_point(|&ti| ti <= t).clamp(1, N - 1);
        let dt = self.times[i] - self.times[i - 1];
        self.poses[i - 1].between(&self.poses[i]).log() * (1.0 / dt)
    }
}
