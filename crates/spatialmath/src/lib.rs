#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use spatialmath_lie as lie;

#[doc(inline)]
pub use spatialmath_linalg as linalg;

#[doc(inline)]
pub use spatialmath_lie::{
    AngleAxis, BSplineSE3, EulerAngles, EulerConvention, EulerFrame, EulerSequence,
    InterpSplineSE3, LieError, LieGroup, Pose2D, Pose3D, Rotation2D, Rotation3D, Tolerance,
    Twist2, Twist3, Validation, SE2F64, SE3F64, SO2F64, SO3F64,
};
