//! # Scene Engine
//!
//! A small hierarchical scene-graph engine: nodes with quaternion transforms
//! composed into world matrices, a name-keyed reference-counted resource
//! cache, and a frame loop that hands drawable nodes to a pluggable
//! render backend.
//!
//! ## Features
//!
//! - **Scene graph**: arena-backed tree with named children and lazy,
//!   dirty-flag driven world matrix propagation
//! - **Resources**: shaders, meshes (OBJ) and textures (PNG) shared by name
//! - **Renderer boundary**: `RenderBackend` trait, no GPU dependency
//! - **Config**: TOML or RON files via `serde`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let cube = engine.scene.create_node();
//!         engine.scene.set_mesh(cube, &mut engine.resources, "cube");
//!         engine.scene.set_shader(cube, &mut engine.resources, "basic");
//!         let root = engine.scene.root();
//!         engine.scene.add_child(root, Some("cube"), cube)?;
//!         Ok(())
//!     }
//!
//!     fn update(
//!         &mut self,
//!         engine: &mut Engine,
//!         input: &InputFrame,
//!         backend: &mut dyn RenderBackend,
//!         delta_time: f32,
//!     ) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(EngineConfig::default(), Box::new(MemoryAssetSource::with_builtins()));
//!     let mut input = ScriptedInput::default();
//!     input.push_idle(60, 1.0 / 60.0);
//!     engine.run(&mut MyApp, &mut input, &mut RecordingBackend::new())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError, RunStats};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetSource, FileAssetSource, MemoryAssetSource, ResourceManager},
        config::{Config, EngineConfig},
        foundation::math::{angle_axis, Axis, Mat4, Quat, Vec3},
        input::{InputFrame, InputSource, KeyCode, ScriptedInput},
        render::{Camera, RecordingBackend, RenderBackend, RenderContext},
        scene::{NodeId, SceneError, SceneGraph},
        AppError, Application, Engine, EngineError,
    };
}
