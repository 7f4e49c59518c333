//! Smooth curves through or near a sequence of poses.
//!
//! - [`BSpline`]: cumulative cubic B-spline over control poses, on any
//!   [`LieGroup`]. The curve starts at the first control pose and ends at the
//!   last, and is C2 in between, but does not pass through the interior ones.
//! - [`InterpSplineSE3`]: smooth interpolant through timed SE(3) waypoints.
//!   Translation follows a natural cubic spline (C2). Rotation follows a
//!   geodesic cubic Bézier per segment with shared knot velocities (C1).
//!
//! The cumulative form evaluates
//!
//! ```text
//! T(s) = T_0 · Π_{j≥1} exp(B̃_j(s) · log(T_{j-1}⁻¹ · T_j))
//! ```
//!
//! where `B̃_j = Σ_{l≥j} B_l` are cumulative basis functions of a clamped
//! uniform knot vector on `[0, 1]`.

use crate::error::LieError;
use crate::group::LieGroup;
use crate::interpolate::{check_keyframe_times, locate_segment};
use crate::se3::SE3F64;
use crate::so3::SO3F64;
use glam::DVec3;

/// Polynomial degree of [`BSpline`].
pub const BSPLINE_DEGREE: usize = 3;

/// Step in segment fraction for the numerical angular velocity.
const ANGULAR_VELOCITY_STEP: f64 = 1e-6;

/// Cumulative cubic B-spline over `N` control poses, parameterized on `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BSpline<G, const N: usize> {
    control: [G; N],
}

/// Cumulative cubic B-spline over SE(3) control poses.
pub type BSplineSE3<const N: usize> = BSpline<SE3F64, N>;

impl<G: LieGroup, const N: usize> BSpline<G, N> {
    /// Create a spline from its control poses.
    ///
    /// Fails with [`LieError::TooFewPoses`] for fewer than
    /// `BSPLINE_DEGREE + 1` control poses.
    pub fn new(control: [G; N]) -> Result<Self, LieError> {
        if N <= BSPLINE_DEGREE {
            return Err(LieError::TooFewPoses {
                required: BSPLINE_DEGREE + 1,
                actual: N,
            });
        }
        Ok(Self { control })
    }

    /// Control poses.
    pub fn control_poses(&self) -> &[G; N] {
        &self.control
    }

    /// Knot `i` of the clamped uniform knot vector with `N + 4` entries.
    fn knot(i: usize) -> f64 {
        let segments = N.saturating_sub(BSPLINE_DEGREE);
        if i <= BSPLINE_DEGREE {
            0.0
        } else if i >= N {
            1.0
        } else {
            (i - BSPLINE_DEGREE) as f64 / segments as f64
        }
    }

    /// Knot span `span` with `knot(span) <= s < knot(span + 1)`, the last
    /// span closed at `s = 1`.
    fn span(s: f64) -> usize {
        let segments = N.saturating_sub(BSPLINE_DEGREE);
        let offset = (s * segments as f64).floor() as usize;
        BSPLINE_DEGREE + offset.min(segments.saturating_sub(1))
    }

    /// Non-zero basis functions `B_{span-3} .. B_span` at `s` (Cox–de Boor).
    fn basis(span: usize, s: f64) -> [f64; BSPLINE_DEGREE + 1] {
        let mut n = [0.0; BSPLINE_DEGREE + 1];
        let mut left = [0.0; BSPLINE_DEGREE + 1];
        let mut right = [0.0; BSPLINE_DEGREE + 1];
        n[0] = 1.0;
        for j in 1..=BSPLINE_DEGREE {
            left[j] = s - Self::knot(span + 1 - j);
            right[j] = Self::knot(span + j) - s;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = n[r] / (right[r + 1] + left[j - r]);
                n[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            n[j] = saved;
        }
        n
    }

    /// Pose at parameter `s`, clamped to `[0, 1]`.
    ///
    /// `s = 0` gives the first control pose and `s = 1` the last.
    pub fn sample(&self, s: f64) -> G {
        let s = s.clamp(0.0, 1.0);
        let span = Self::span(s);
        let basis = Self::basis(span, s);

        // cumulative weights are 1 up to `first` and 0 past `span`
        let first = span - BSPLINE_DEGREE;
        let mut pose = self.control[first];
        for j in first + 1..=span {
            let weight: f64 = basis[j - first..].iter().sum();
            let increment = self.control[j - 1].between(&self.control[j]).log();
            pose = pose.compose(&G::exp(&(increment * weight)));
        }
        pose
    }
}

/// Smooth interpolant through SE(3) waypoints at strictly increasing times.
///
/// Passes through every waypoint. The translation is twice continuously
/// differentiable with zero acceleration at the ends. The rotation is
/// continuously differentiable: each segment is a cubic Bézier built from
/// geodesics, with the body angular velocity at a waypoint averaged from
/// its neighbouring segments. Samples outside the time interval are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpSplineSE3<const N: usize> {
    times: [f64; N],
    poses: [SE3F64; N],
    // second derivative of the translation at each waypoint
    accelerations: [DVec3; N],
    // body-frame angular velocity at each waypoint
    angular_velocities: [DVec3; N],
}

impl<const N: usize> InterpSplineSE3<N> {
    /// Create a spline through `poses` at `times`.
    ///
    /// Fails with [`LieError::TooFewPoses`] for fewer than two waypoints,
    /// [`LieError::NonIncreasingTimes`] when the times are not strictly
    /// increasing and [`LieError::NonFinite`] for non-finite times.
    pub fn new(times: [f64; N], poses: [SE3F64; N]) -> Result<Self, LieError> {
        check_keyframe_times(&times, 2)?;
        Ok(Self::build(times, poses))
    }

    fn build(times: [f64; N], poses: [SE3F64; N]) -> Self {
        let points: [DVec3; N] = std::array::from_fn(|i| poses[i].t);
        Self {
            times,
            poses,
            accelerations: natural_spline_accelerations(&times, &points),
            angular_velocities: knot_angular_velocities(&times, &poses),
        }
    }

    /// Waypoint times.
    pub fn times(&self) -> &[f64; N] {
        &self.times
    }

    /// Waypoint poses.
    pub fn poses(&self) -> &[SE3F64; N] {
        &self.poses
    }

    /// Same waypoints with times rescaled to `[0, 1]`.
    pub fn with_normalized_time(&self) -> Self {
        let (t0, span) = (self.times[0], self.times[N - 1] - self.times[0]);
        let times = self.times.map(|t| (t - t0) / span);
        Self::build(times, self.poses)
    }

    /// Pose at time `t`, clamped to the waypoint interval.
    pub fn sample(&self, t: f64) -> SE3F64 {
        let (i, s) = locate_segment(&self.times, t);
        SE3F64::new(self.rotation_at(i, s), self.translation_at(i, s))
    }

    /// World-frame linear velocity of the translation at time `t`.
    pub fn linear_velocity(&self, t: f64) -> DVec3 {
        let (i, s) = locate_segment(&self.times, t);
        let h = self.times[i + 1] - self.times[i];
        let (u, v) = (s * h, (1.0 - s) * h);
        let (m0, m1) = (self.accelerations[i], self.accelerations[i + 1]);
        let (p0, p1) = (self.poses[i].t, self.poses[i + 1].t);
        (m1 * (u * u) - m0 * (v * v)) / (2.0 * h) + (p1 - p0) / h - (m1 - m0) * (h / 6.0)
    }

    /// Body-frame angular velocity at time `t`, by central differences
    /// inside the segment containing `t`.
    pub fn angular_velocity(&self, t: f64) -> DVec3 {
        let (i, s) = locate_segment(&self.times, t);
        let h = self.times[i + 1] - self.times[i];
        let s0 = (s - ANGULAR_VELOCITY_STEP).max(0.0);
        let s1 = (s + ANGULAR_VELOCITY_STEP).min(1.0);
        self.rotation_at(i, s0).rminus(&self.rotation_at(i, s1)) / ((s1 - s0) * h)
    }

    fn translation_at(&self, i: usize, s: f64) -> DVec3 {
        let h = self.times[i + 1] - self.times[i];
        let (u, v) = (s * h, (1.0 - s) * h);
        let (m0, m1) = (self.accelerations[i], self.accelerations[i + 1]);
        let (p0, p1) = (self.poses[i].t, self.poses[i + 1].t);
        (m0 * (v * v * v) + m1 * (u * u * u)) / (6.0 * h)
            + (p0 / h - m0 * (h / 6.0)) * v
            + (p1 / h - m1 * (h / 6.0)) * u
    }

    fn rotation_at(&self, i: usize, s: f64) -> SO3F64 {
        let h = self.times[i + 1] - self.times[i];
        let (r0, r3) = (self.poses[i].r, self.poses[i + 1].r);
        let r1 = r0.rplus(self.angular_velocities[i] * (h / 3.0));
        let r2 = r3.rplus(self.angular_velocities[i + 1] * (-h / 3.0));

        // de Casteljau along geodesics
        let (a, b, c) = (r0.slerp(&r1, s), r1.slerp(&r2, s), r2.slerp(&r3, s));
        let (d, e) = (a.slerp(&b, s), b.slerp(&c, s));
        d.slerp(&e, s)
    }
}

/// Second derivatives of the natural cubic spline through `points`.
///
/// Solves the tridiagonal system with the Thomas algorithm. The end values
/// are zero.
fn natural_spline_accelerations<const N: usize>(
    times: &[f64; N],
    points: &[DVec3; N],
) -> [DVec3; N] {
    let mut m = [DVec3::ZERO; N];
    if N < 3 {
        return m;
    }
    let mut c_prime = [0.0; N];
    let mut d_prime = [DVec3::ZERO; N];
    for i in 1..N - 1 {
        let h0 = times[i] - times[i - 1];
        let h1 = times[i + 1] - times[i];
        let rhs = ((points[i + 1] - points[i]) / h1 - (points[i] - points[i - 1]) / h0) * 6.0;
        let denom = 2.0 * (h0 + h1) - h0 * c_prime[i - 1];
        c_prime[i] = h1 / denom;
        d_prime[i] = (rhs - d_prime[i - 1] * h0) / denom;
    }
    for i in (1..N - 1).rev() {
        m[i] = d_prime[i] - m[i + 1] * c_prime[i];
    }
    m
}

/// Body angular velocity at each waypoint, the duration-weighted average of
/// the constant velocities of the adjacent segments.
fn knot_angular_velocities<const N: usize>(times: &[f64; N], poses: &[SE3F64; N]) -> [DVec3; N] {
    let segment = |k: usize| poses[k].r.rminus(&poses[k + 1].r) / (times[k + 1] - times[k]);
    std::array::from_fn(|i| {
        if i == 0 {
            segment(0)
        } else if i == N - 1 {
            segment(i - 1)
        } else {
            let (h0, h1) = (times[i] - times[i - 1], times[i + 1] - times[i]);
            (segment(i - 1) * h1 + segment(i) * h0) / (h0 + h1)
        }
    })
}
