//! # Camera
//!
//! First-person style camera reduced to what the renderer consumes: a view
//! and a projection matrix. Orientation is stored as yaw/pitch; yaw 0 looks
//! down +X, positive pitch looks up.
//!
//! Matrices are cached and rebuilt only after a setter touched the
//! corresponding parameters. Every rebuild raises a "moved" flag that the
//! engine consumes to force a full scene redraw.

use crate::config::CameraConfig;
use crate::foundation::math::{constants, Mat4, Point3, Vec3, YAW_AXIS};

/// Perspective camera with change tracking
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    max_pitch: f32,
    aspect: f32,
    near: f32,
    far: f32,

    front: Vec3,
    up: Vec3,

    view: Mat4,
    projection: Mat4,
    view_dirty: bool,
    projection_dirty: bool,
    moved: bool,
}

impl Camera {
    /// Create a camera from its configuration
    pub fn new(config: &CameraConfig) -> Self {
        // never quite straight up or down
        let max_pitch = (config.max_pitch_degrees * constants::DEG_TO_RAD).clamp(0.0, constants::HALF_PI - 1e-3);
        let mut camera = Self {
            position: config.position,
            yaw: config.yaw,
            pitch: config.pitch.clamp(-max_pitch, max_pitch),
            fov: config.fov_degrees * constants::DEG_TO_RAD,
            max_pitch,
            aspect: config.aspect,
            near: config.near,
            far: config.far,
            front: Vec3::x(),
            up: YAW_AXIS,
            view: Mat4::identity(),
            projection: Mat4::identity(),
            view_dirty: true,
            projection_dirty: true,
            moved: false,
        };
        camera.update_vectors();
        camera.update_matrices(true);
        camera
    }

    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.front = Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        let right = self.front.cross(&YAW_AXIS).normalize();
        self.up = right.cross(&self.front).normalize();
    }

    /// Rebuild whichever matrices are stale, or both when `force`
    ///
    /// Returns true when anything was rebuilt.
    pub fn update_matrices(&mut self, force: bool) -> bool {
        let mut changed = false;

        if self.view_dirty || force {
            let eye = Point3::from(self.position);
            self.view = Mat4::look_at_rh(&eye, &(eye + self.front), &self.up);
            self.view_dirty = false;
            changed = true;
        }

        if self.projection_dirty || force {
            self.projection = Mat4::new_perspective(self.aspect, self.fov, self.near, self.far);
            self.projection_dirty = false;
            changed = true;
        }

        self.moved |= changed;
        changed
    }

    /// Returns and clears the "matrices changed since last asked" flag
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    /// Move the eye
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.view_dirty = true;
    }

    /// Set orientation in radians; yaw wraps to `[0, 2pi)` and pitch is
    /// clamped to the configured limit
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw.rem_euclid(constants::PI * 2.0);
        self.pitch = pitch.clamp(-self.max_pitch, self.max_pitch);
        self.update_vectors();
        self.view_dirty = true;
    }

    /// Vertical field of view in radians
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.projection_dirty = true;
    }

    /// Vertical field of view in radians
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Eye position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit viewing direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World to view matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// View to clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}
