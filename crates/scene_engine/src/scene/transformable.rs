//! Position / rotation / scale with a lazily rebuilt world matrix

use crate::config::SceneConfig;
use crate::foundation::math::{clamp_vec, trs_matrix, Mat4, Quat, Vec3};

/// Bounds applied to every transform edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformLimits {
    /// Positions are clamped into `[-border, border]`, scales into `[min_scale, border]`
    pub border: f32,
    /// Smallest allowed scale component
    pub min_scale: f32,
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self::from(&SceneConfig::default())
    }
}

impl From<&SceneConfig> for TransformLimits {
    fn from(config: &SceneConfig) -> Self {
        Self {
            border: config.border,
            min_scale: config.min_scale,
        }
    }
}

/// Local transform and derived world matrix of a scene node
///
/// Edits only set `dirty`; the world matrix is rebuilt by
/// [`Transformable::recompute_world_matrix`]. Rebuilding raises
/// `needs_redraw`, which stays up until the node is drawn.
#[derive(Debug, Clone)]
pub struct Transformable {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    world: Mat4,
    dirty: bool,
    needs_redraw: bool,
    limits: TransformLimits,
}

impl Default for Transformable {
    fn default() -> Self {
        Self::new(TransformLimits::default())
    }
}

impl Transformable {
    /// Identity transform, dirty so the first propagation builds its matrix
    pub fn new(limits: TransformLimits) -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::repeat(1.0),
            world: Mat4::identity(),
            dirty: true,
            needs_redraw: true,
            limits,
        }
    }

    /// Replace any subset of position, rotation and scale
    pub fn set_transform(&mut self, position: Option<Vec3>, rotation: Option<Quat>, scale: Option<Vec3>) {
        if let Some(position) = position {
            self.set_position(position);
        }
        if let Some(rotation) = rotation {
            self.set_rotation(rotation);
        }
        if let Some(scale) = scale {
            self.set_scale(scale);
        }
    }

    /// Set the position, clamped to the border
    pub fn set_position(&mut self, position: Vec3) {
        self.position = clamp_vec(position, -self.limits.border, self.limits.border);
        self.dirty = true;
    }

    /// Set the rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = Quat::new_normalize(rotation.into_inner());
        self.dirty = true;
    }

    /// Set the scale, clamped to `[min_scale, border]`
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = clamp_vec(scale, self.limits.min_scale, self.limits.border);
        self.dirty = true;
    }

    /// `position += delta`
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// `rotation = delta * rotation`, so `delta` acts in the parent frame
    pub fn rotate_by(&mut self, delta: Quat) {
        self.set_rotation(delta * self.rotation);
    }

    /// Component-wise `scale *= factor`
    pub fn scale_by(&mut self, factor: Vec3) {
        self.set_scale(self.scale.component_mul(&factor));
    }

    /// Rebuild the world matrix if dirty or forced
    ///
    /// Returns true when the matrix was rebuilt.
    pub fn recompute_world_matrix(&mut self, parent: Option<&Mat4>, force: bool) -> bool {
        if !(self.dirty || force) {
            return false;
        }

        let local = self.local_matrix();
        self.world = match parent {
            Some(parent) => parent * local,
            None => local,
        };
        self.dirty = false;
        self.needs_redraw = true;
        true
    }

    /// translate · rotate · scale of the local fields
    pub fn local_matrix(&self) -> Mat4 {
        trs_matrix(&self.position, &self.rotation, &self.scale)
    }

    /// Last computed world matrix
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// Translation part of the world matrix
    pub fn world_position(&self) -> Vec3 {
        self.world.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Limits this transform was created with
    pub fn limits(&self) -> TransformLimits {
        self.limits
    }

    /// Local fields changed since the last rebuild
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Something visual changed since the last draw
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Force a rebuild on the next propagation
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Request a draw without touching the matrix
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Called after the node was drawn
    pub fn mark_drawn(&mut self) {
        self.needs_redraw = false;
    }
}
