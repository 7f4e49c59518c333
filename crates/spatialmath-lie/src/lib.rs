#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! This crate provides:
//! - Rotation and pose groups SO(2), SE(2), SO(3) and SE(3) in double precision
//! - Rotation parameterizations (matrix, quaternion, angle-axis, Euler angles)
//! - Exponential and logarithm maps, adjoints and Jacobians
//! - SLERP, screw interpolation, keyframe trajectories and splines
//! - Unit dual quaternions

/// Unit dual quaternions encoding rigid transforms.
pub mod dual_quaternion;

/// Error type.
pub mod error;

/// Common trait over the four groups.
pub mod group;

/// SLERP, geodesic interpolation and trajectories.
pub mod interpolate;

/// Rate Jacobians and a numerical differentiation helper.
pub mod jacobian;

/// Rotation parameterizations.
pub mod rotation;

/// Scalar angle helpers.
pub mod scalar;

/// B-splines and smooth interpolating splines over poses.
pub mod spline;

/// Numeric tolerances and validation modes.
pub mod tolerance;

/// Tangent vectors of the pose groups.
pub mod twist;

/// Rigid transforms in the plane.
pub mod se2;

/// Rigid transforms in space.
pub mod se3;

/// Rotations in the plane.
pub mod so2;

/// Rotations in space.
pub mod so3;

pub use dual_quaternion::{DualQuaternion, UnitDualQuaternion};
pub use error::LieError;
pub use group::LieGroup;
pub use interpolate::{interpolate, slerp, Trajectory};
pub use jacobian::VelocityFrame;
pub use rotation::{AngleAxis, EulerAngles, EulerConvention, EulerFrame, EulerSequence};
pub use se2::SE2F64;
pub use se3::SE3F64;
pub use spline::{BSpline, BSplineSE3, InterpSplineSE3};
pub use so2::SO2F64;
pub use so3::SO3F64;
pub use tolerance::{Tolerance, Validation};
pub use twist::{Twist2, Twist3};

// Re-export the numeric types that appear in the public API
pub use glam::{DMat2, DMat3, DMat4, DQuat, DVec2, DVec3};
pub use spatialmath_linalg::{Mat6F64, Vec6F64};

/// Planar rotation.
pub type Rotation2D = SO2F64;
/// Spatial rotation.
pub type Rotation3D = SO3F64;
/// Planar rigid transform.
pub type Pose2D = SE2F64;
/// Spatial rigid transform.
pub type Pose3D = SE3F64;
