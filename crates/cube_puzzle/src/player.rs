//! First-person player
//!
//! Walks the camera over the floor, turns it with the pointer, zooms with
//! the scroll wheel and jumps. Gravity pulls the eye back down to standing
//! height on every tick.

use scene_engine::config::CameraConfig;
use scene_engine::foundation::math::{clamp_vec, constants::DEG_TO_RAD, Vec3};
use scene_engine::input::InputFrame;
use scene_engine::render::Camera;

use crate::input::Actions;

/// How close to standing height counts as landed
const FLOOR_EPSILON: f32 = 1e-6;

/// Camera controller driven by logical actions
#[derive(Debug, Clone)]
pub struct Player {
    move_speed: f32,
    look_speed: f32,
    zoom_speed: f32,
    min_fov: f32,
    max_fov: f32,
    height: f32,
    jump_speed: f32,
    jump_time: f32,
    gravity: f32,
    border: f32,

    jumping: bool,
    jump_elapsed: f32,
}

impl Player {
    /// Player with the speeds and limits of `config`, kept inside `border`
    pub fn new(config: &CameraConfig, border: f32) -> Self {
        Self {
            move_speed: config.move_speed,
            look_speed: config.look_speed_degrees * DEG_TO_RAD,
            zoom_speed: config.zoom_speed_degrees * DEG_TO_RAD,
            min_fov: config.min_fov_degrees * DEG_TO_RAD,
            max_fov: config.max_fov_degrees.max(config.min_fov_degrees) * DEG_TO_RAD,
            height: config.player_height,
            jump_speed: config.jump_speed,
            jump_time: config.jump_time,
            gravity: config.gravity,
            border: border.abs(),
            jumping: false,
            jump_elapsed: 0.0,
        }
    }

    /// Apply one tick of input to `camera`
    ///
    /// Returns true when anything about the camera changed. Matrices are
    /// left for [`Camera::update_matrices`].
    pub fn update(&mut self, camera: &mut Camera, actions: Actions, frame: &InputFrame, delta_time: f32) -> bool {
        let mut changed = self.look(camera, frame.pointer_delta);
        changed |= self.zoom(camera, frame.scroll);

        let mut position = camera.position();
        if let Some(step) = self.walk_step(camera.yaw(), actions, delta_time) {
            position += step;
        }
        position.y = self.fall(position.y, actions.contains(Actions::JUMP), delta_time);
        let position = clamp_vec(position, -self.border, self.border);

        if position != camera.position() {
            camera.set_position(position);
            changed = true;
        }
        changed
    }

    /// Whether a jump is in progress
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    fn look(&self, camera: &mut Camera, (dx, dy): (f32, f32)) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        // screen y grows downward
        camera.set_orientation(camera.yaw() + dx * self.look_speed, camera.pitch() - dy * self.look_speed);
        true
    }

    fn zoom(&self, camera: &mut Camera, steps: f32) -> bool {
        if steps == 0.0 {
            return false;
        }
        let fov = (camera.fov() - steps * self.zoom_speed).clamp(self.min_fov, self.max_fov);
        if fov == camera.fov() {
            return false;
        }
        camera.set_fov(fov);
        true
    }

    /// Horizontal displacement for the held move actions; opposite
    /// directions cancel out
    fn walk_step(&self, yaw: f32, actions: Actions, delta_time: f32) -> Option<Vec3> {
        let axis = |positive: Actions, negative: Actions| {
            f32::from(i8::from(actions.contains(positive)) - i8::from(actions.contains(negative)))
        };
        let along = axis(Actions::MOVE_FORWARD, Actions::MOVE_BACKWARD);
        let across = axis(Actions::MOVE_RIGHT, Actions::MOVE_LEFT);
        if along == 0.0 && across == 0.0 {
            return None;
        }

        let heading = yaw + across.atan2(along);
        let distance = self.move_speed * delta_time;
        Some(Vec3::new(heading.cos() * distance, 0.0, heading.sin() * distance))
    }

    /// Jump impulse then gravity, floored at standing height
    fn fall(&mut self, y: f32, jump_held: bool, delta_time: f32) -> f32 {
        let mut y = y;
        if !self.jumping && jump_held {
            log::debug!("Jump");
            self.jumping = true;
            self.jump_elapsed = 0.0;
        }

        if self.jumping && self.jump_elapsed < self.jump_time {
            y += self.jump_speed * delta_time;
            self.jump_elapsed += delta_time;
        } else if (y - self.height).abs() < FLOOR_EPSILON {
            self.jumping = false;
        }

        (y - self.gravity * delta_time).max(self.height)
    }
}
