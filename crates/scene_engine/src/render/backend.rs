//! Renderer boundary
//!
//! The scene graph never talks to a GPU. It hands each drawable node to a
//! [`RenderBackend`] as a [`DrawCall`] carrying fully propagated matrices and
//! resource handles.

use thiserror::Error;

use crate::assets::{MeshId, ShaderId, TextureId};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::Camera;
use crate::scene::NodeId;

/// Render errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The backend could not create its context; nothing can be drawn
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),
}

/// Point light gathered from the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position
    pub position: Vec3,
    /// Light colour
    pub color: Vec3,
}

/// Per-frame data shared by every draw
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// World to view
    pub view: Mat4,
    /// View to clip
    pub projection: Mat4,
    /// Active lights
    pub lights: Vec<PointLight>,
}

impl RenderContext {
    /// Context with the camera's matrices and no lights
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            lights: Vec::new(),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            view: Mat4::identity(),
            projection: Mat4::identity(),
            lights: Vec::new(),
        }
    }
}

/// One node's draw
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Node being drawn
    pub node: NodeId,
    /// Model to world
    pub world: &'a Mat4,
    /// World to view
    pub view: &'a Mat4,
    /// View to clip
    pub projection: &'a Mat4,
    /// Geometry
    pub mesh: MeshId,
    /// Program
    pub shader: ShaderId,
    /// Optional texture
    pub texture: Option<TextureId>,
    /// Flat colour
    pub color: Vec3,
    /// Lights, empty for unlit nodes
    pub lights: &'a [PointLight],
}

/// Something that can draw nodes
pub trait RenderBackend {
    /// Create the rendering context; failure is fatal
    fn initialize(&mut self) -> Result<(), RenderError>;

    /// Draw one node
    fn draw(&mut self, call: &DrawCall<'_>);
}

/// Summary of a recorded draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// Node that was drawn
    pub node: NodeId,
    /// World matrix it was drawn with
    pub world: Mat4,
    /// Mesh handle
    pub mesh: MeshId,
    /// Shader handle
    pub shader: ShaderId,
    /// Texture handle
    pub texture: Option<TextureId>,
    /// Number of lights passed
    pub light_count: usize,
}

/// Backend that stores draws instead of executing them
#[derive(Debug, Default)]
pub struct RecordingBackend {
    records: Vec<DrawRecord>,
    total_draws: usize,
    initialized: bool,
    fail_initialization: bool,
}

impl RecordingBackend {
    /// New, uninitialised recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose `initialize` fails
    pub fn failing() -> Self {
        Self {
            fail_initialization: true,
            ..Self::default()
        }
    }

    /// Draws recorded since the last `clear`
    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    /// Draws of one node since the last `clear`
    pub fn draws_of(&self, node: NodeId) -> usize {
        self.records.iter().filter(|record| record.node == node).count()
    }

    /// Draws over the backend's whole lifetime
    pub fn total_draws(&self) -> usize {
        self.total_draws
    }

    /// Whether `initialize` succeeded
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Forget recorded draws
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn initialize(&mut self) -> Result<(), RenderError> {
        if self.fail_initialization {
            return Err(RenderError::InitializationFailed("recording backend set to fail".to_string()));
        }
        self.initialized = true;
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        log::trace!("draw {:?} mesh {:?}", call.node, call.mesh);
        self.total_draws += 1;
        self.records.push(DrawRecord {
            node: call.node,
            world: *call.world,
            mesh: call.mesh,
            shader: call.shader,
            texture: call.texture,
            light_count: call.lights.len(),
        });
    }
}
