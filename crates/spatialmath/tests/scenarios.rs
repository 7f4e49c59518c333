use approx::assert_relative_eq;
use spatialmath::lie::{slerp, DMat3, DQuat, DVec3};
use spatialmath::{
    AngleAxis, EulerAngles, EulerConvention, LieError, Pose3D, Rotation3D, Tolerance, Twist3,
    Validation,
};
use std::f64::consts::{FRAC_PI_2, PI};

const EPSILON: f64 = 1e-12;

fn rot_z_90() -> DMat3 {
    // columns of [[0,-1,0],[1,0,0],[0,0,1]]
    DMat3::from_cols_array(&[0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0])
}

#[test]
fn rotation_matrix_to_quaternion_and_angle_axis() -> Result<(), LieError> {
    let r = Rotation3D::from_matrix(&rot_z_90())?;

    let q = r.quaternion();
    assert_relative_eq!(q.w, 0.7071, epsilon = 1e-4);
    assert_relative_eq!(q.x, 0.0, epsilon = 1e-4);
    assert_relative_eq!(q.y, 0.0, epsilon = 1e-4);
    assert_relative_eq!(q.z, 0.7071, epsilon = 1e-4);

    let aa = r.to_angle_axis();
    assert!(aa.axis().abs_diff_eq(DVec3::Z, EPSILON));
    assert_relative_eq!(aa.angle(), FRAC_PI_2, epsilon = EPSILON);
    Ok(())
}

#[test]
fn pose_composition_is_order_sensitive() {
    let translate = Pose3D::from_translation(DVec3::X);
    let rotate = Pose3D::from_rotation(Rotation3D::rot_z(FRAC_PI_2));

    let p = (translate * rotate).act_point(DVec3::ZERO);
    assert!(p.abs_diff_eq(DVec3::X, EPSILON));

    let p = (rotate * translate).act_point(DVec3::ZERO);
    assert!(p.abs_diff_eq(DVec3::Y, EPSILON));
}

#[test]
fn log_of_identity_is_exactly_zero() -> Result<(), LieError> {
    let r = Rotation3D::from_matrix(&DMat3::IDENTITY)?;
    let w = r.log();
    assert_eq!(w, DVec3::ZERO);
    assert!(!w.is_nan());

    let pose = Pose3D::new(r, DVec3::ZERO);
    assert_eq!(pose.log(), Twist3::ZERO);
    assert_eq!(r.to_angle_axis(), AngleAxis::ZERO);
    Ok(())
}

#[test]
fn slerp_between_antipodal_quaternions() {
    let q = DQuat::from_axis_angle(DVec3::new(1.0, 2.0, 3.0).normalize(), 1.3);
    let mid = slerp(q, -q, 0.5);
    assert!(mid.is_finite());
    assert_relative_eq!(mid.length(), 1.0, epsilon = EPSILON);
    assert!(mid.abs_diff_eq(q, EPSILON) || mid.abs_diff_eq(-q, EPSILON));
}

#[test]
fn invalid_representations_are_rejected() {
    let mut skewed = rot_z_90();
    skewed.x_axis.y = 1.1;
    assert!(Rotation3D::from_matrix(&skewed).is_err_and(|e| e.is_invalid_representation()));

    let reflection = DMat3::from_diagonal(DVec3::new(1.0, 1.0, -1.0));
    assert!(matches!(
        Rotation3D::from_matrix(&reflection),
        Err(LieError::ImproperRotation { .. })
    ));

    let q = DQuat::from_xyzw(0.0, 0.0, 0.0, 2.0);
    assert!(matches!(
        Rotation3D::from_quaternion(q),
        Err(LieError::NonUnitQuaternion { .. })
    ));
    // tolerant mode normalizes instead
    let tol = Tolerance::default();
    assert!(Rotation3D::from_quaternion_with(q, &tol, Validation::Normalize).is_ok());

    assert!(matches!(
        AngleAxis::new(DVec3::new(0.0, 0.0, 2.0), 0.5),
        Err(LieError::NonUnitAxis { .. })
    ));
}

#[test]
fn euler_convention_mismatch_is_reported() {
    let rpy = EulerAngles::roll_pitch_yaw(0.1, 0.2, 0.3);
    let ypr = EulerAngles::new([0.3, 0.2, 0.1], EulerConvention::YAW_PITCH_ROLL);
    assert!(matches!(
        rpy.compose(&ypr),
        Err(LieError::ConventionMismatch { .. })
    ));
    // extrinsic XYZ and intrinsic ZYX describe the same rotation
    assert!(rpy.to_rotation().approx_eq(&ypr.to_rotation(), EPSILON));
    let converted = ypr.to_convention(EulerConvention::ROLL_PITCH_YAW, &Tolerance::default());
    assert!(converted.approx_eq(&rpy, 1e-10));
}

#[test]
fn degenerate_inputs_return_documented_values() {
    // angle π: log stays on the principal branch
    let half_turn = Rotation3D::rot_x(PI);
    assert_relative_eq!(half_turn.log().length(), PI, epsilon = 1e-9);

    // gimbal lock: first angle is zero, no error
    let locked = Rotation3D::rot_y(FRAC_PI_2) * Rotation3D::rot_x(0.4);
    let e = locked.to_euler(EulerConvention::YAW_PITCH_ROLL);
    assert_relative_eq!(e.angles[0], 0.0, epsilon = EPSILON);
    assert!(e.to_rotation().approx_eq(&locked, 1e-9));
}
