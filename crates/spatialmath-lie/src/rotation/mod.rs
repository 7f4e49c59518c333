//! Rotation parameterizations and the conversions between them.
//!
//! [`crate::SO3F64`] stores a unit quaternion; the types here are the other
//! ways of writing the same rotation down: a 3x3 matrix, an axis with an
//! angle, or three Euler angles with an explicit convention.

mod angle_axis;
/// Matrix, quaternion and rotation vector conversions.
pub mod convert;
mod euler;

pub use angle_axis::AngleAxis;
pub use convert::{
    angle_axis_to_matrix, canonicalize_quaternion, matrix_to_angle_axis, matrix_to_quaternion,
    quaternion_to_matrix, skew, so3_exp_matrix, so3_log_matrix, unskew,
};
pub(crate) use euler::axis_rotation;
pub use euler::{EulerAngles, EulerConvention, EulerFrame, EulerSequence};
