//! Rendering boundary and camera

pub mod backend;
pub mod camera;

pub use backend::{DrawCall, DrawRecord, PointLight, RecordingBackend, RenderBackend, RenderContext, RenderError};
pub use camera::Camera;
