//! Application trait and lifecycle management

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use crate::input::InputFrame;
use crate::render::RenderBackend;
use crate::scene::SceneError;

/// Application lifecycle trait
///
/// Implement this trait to drive the engine's frame loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the backend is up. Build the scene here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every tick before transforms are propagated and the scene is
    /// drawn. The backend is passed for applications that need to draw part
    /// of the scene out of band.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `input` - Input sampled for this tick
    /// * `backend` - Renderer
    /// * `delta_time` - Time since last tick in seconds
    fn update(
        &mut self,
        engine: &mut Engine,
        input: &InputFrame,
        backend: &mut dyn RenderBackend,
        delta_time: f32,
    ) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once when the loop ends, before the engine releases the scene.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene graph error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
