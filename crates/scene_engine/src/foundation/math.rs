//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of helpers the scene graph
//! needs: clamping, grid rounding, TRS composition and right-angle snapping.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Rotation3, Unit, UnitQuaternion, Vector3};

use serde::{Deserialize, Serialize};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Axis used for yaw rotations (+Y)
pub const YAW_AXIS: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Axis used for pitch rotations (+Z)
pub const PITCH_AXIS: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Axis used for roll rotations (+X)
pub const ROLL_AXIS: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Named rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Rotation about +Y
    Yaw,
    /// Rotation about +Z
    Pitch,
    /// Rotation about +X
    Roll,
}

impl Axis {
    /// Unit vector of this axis
    pub fn unit(self) -> Unit<Vec3> {
        match self {
            Self::Yaw => Unit::new_unchecked(YAW_AXIS),
            Self::Pitch => Unit::new_unchecked(PITCH_AXIS),
            Self::Roll => Unit::new_unchecked(ROLL_AXIS),
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Rotation of `angle` radians about `axis`
pub fn angle_axis(angle: f32, axis: Axis) -> Quat {
    Quat::from_axis_angle(&axis.unit(), angle)
}

/// Clamp every component of `v` into `[lo, hi]`
pub fn clamp_vec(v: Vec3, lo: f32, hi: f32) -> Vec3 {
    v.map(|c| c.clamp(lo, hi))
}

/// Round every component of `v` to the nearest integer
pub fn round_vec(v: Vec3) -> Vec3 {
    v.map(f32::round)
}

/// Compose translate · rotate · scale into one matrix
pub fn trs_matrix(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position) * rotation.to_homogeneous() * Mat4::new_nonuniform_scaling(scale)
}

/// Snap a rotation to the nearest multiple of 90° on every axis.
///
/// Each entry of the rotation matrix is thresholded to {-1, 0, 1} with a 0.5
/// cutoff and the quaternion is rebuilt from the snapped matrix. When drift is
/// large enough that the snapped matrix is no longer a proper rotation the
/// input is returned unchanged.
pub fn snap_to_right_angles(rotation: &Quat) -> Quat {
    let snapped: Mat3 = rotation.to_rotation_matrix().matrix().map(|c| {
        if c.abs() < 0.5 {
            0.0
        } else {
            c.signum()
        }
    });

    let orthonormal = approx::abs_diff_eq!(snapped * snapped.transpose(), Mat3::identity(), epsilon = 1e-4);
    if !orthonormal || (snapped.determinant() - 1.0).abs() > 1e-4 {
        log::warn!("Rotation {:?} is too far from a right angle to snap", rotation);
        return *rotation;
    }

    Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(snapped))
}
