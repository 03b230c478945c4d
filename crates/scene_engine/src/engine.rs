//! Core engine implementation

use thiserror::Error;

use crate::application::Application;
use crate::assets::{AssetSource, ResourceManager};
use crate::config::{ConfigError, EngineConfig};
use crate::input::InputSource;
use crate::render::{Camera, RenderBackend, RenderContext, RenderError};
use crate::scene::SceneGraph;

/// Main engine struct
///
/// Owns the scene, the resource cache and the camera, and runs the frame
/// loop. Each tick is strictly: sample input, update the application,
/// propagate transforms, render.
pub struct Engine {
    /// Scene graph
    pub scene: SceneGraph,

    /// Shared shader/mesh/texture cache
    pub resources: ResourceManager,

    /// Active camera
    pub camera: Camera,

    config: EngineConfig,
    running: bool,
    redraw_all: bool,
    ticks: u64,
    draws: u64,
}

/// Counters reported when [`Engine::run`] returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Ticks executed
    pub ticks: u64,
    /// Draw calls issued
    pub draws: u64,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig, source: Box<dyn AssetSource>) -> Self {
        log::info!("Initializing engine...");
        Self {
            scene: SceneGraph::new(config.scene.clone()),
            resources: ResourceManager::new(source),
            camera: Camera::new(&config.camera),
            config,
            running: true,
            redraw_all: false,
            ticks: 0,
            draws: 0,
        }
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Refresh camera matrices and propagate transforms from the scene root
    pub fn update_matrices(&mut self, force: bool) {
        self.camera.update_matrices(force);
        let root = self.scene.root();
        self.scene.propagate_transform(root, force);
    }

    /// Camera matrices plus the scene's enabled lights
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            lights: self.scene.collect_lights(),
            ..RenderContext::from_camera(&self.camera)
        }
    }

    /// Redraw every node on the next render, e.g. after the lights changed
    pub fn request_redraw(&mut self) {
        self.redraw_all = true;
    }

    /// Draw everything that changed; everything when the camera moved or a
    /// full redraw was requested
    ///
    /// Returns the number of draws.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> usize {
        let force = self.camera.take_moved() | std::mem::take(&mut self.redraw_all);
        let ctx = self.render_context();
        let root = self.scene.root();
        let draws = self.scene.render(root, &ctx, backend, force);
        self.draws += draws as u64;
        draws
    }

    /// Run the frame loop until input runs out or quit is requested
    ///
    /// Backend initialisation failure is fatal and returned before the
    /// application is initialised.
    pub fn run<A, I, B>(&mut self, app: &mut A, input: &mut I, backend: &mut B) -> Result<RunStats, EngineError>
    where
        A: Application,
        I: InputSource,
        B: RenderBackend,
    {
        backend.initialize()?;

        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        self.running = true;
        let start = RunStats {
            ticks: self.ticks,
            draws: self.draws,
        };

        while self.running {
            let Some(frame) = input.next_frame() else {
                log::info!("Input exhausted");
                break;
            };
            if frame.quit {
                log::info!("Quit requested");
                break;
            }

            app.update(self, &frame, backend, frame.delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;
            self.update_matrices(false);
            self.render(backend);
            self.ticks += 1;
        }

        app.cleanup(self);
        self.shutdown();

        log::info!("Engine shutdown complete");
        Ok(RunStats {
            ticks: self.ticks - start.ticks,
            draws: self.draws - start.draws,
        })
    }

    /// Stop the loop after the current tick
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Release every node under the scene root and its resources
    pub fn shutdown(&mut self) {
        let root = self.scene.root();
        self.scene.release_resources(root, &mut self.resources);
        log::debug!("Resources still loaded after shutdown: {}", self.resources.loaded_count());
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("nodes", &self.scene.len())
            .field("resources", &self.resources)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Renderer error
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::assets::MemoryAssetSource;
    use crate::foundation::math::Vec3;
    use crate::input::{InputFrame, KeyCode, ScriptedInput};
    use crate::render::RecordingBackend;
    use crate::scene::NodeId;

    /// Moves a cube one unit along X every tick while Right is held
    #[derive(Default)]
    struct Slider {
        cube: Option<NodeId>,
        updates: usize,
        cleaned_up: bool,
    }

    impl Application for Slider {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let cube = engine.scene.create_node();
            engine.scene.set_mesh(cube, &mut engine.resources, "cube");
            engine.scene.set_shader(cube, &mut engine.resources, "basic");
            let root = engine.scene.root();
            engine.scene.add_child(root, Some("cube"), cube)?;
            self.cube = Some(cube);
            Ok(())
        }

        fn update(
            &mut self,
            engine: &mut Engine,
            input: &InputFrame,
            _backend: &mut dyn RenderBackend,
            _delta_time: f32,
        ) -> Result<(), AppError> {
            self.updates += 1;
            if let (true, Some(cube)) = (input.is_pressed(KeyCode::Right), self.cube) {
                if let Some(t) = engine.scene.transform_mut(cube) {
                    t.translate(Vec3::x());
                }
            }
            if input.is_pressed(KeyCode::Escape) {
                engine.quit();
            }
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::default(), Box::new(MemoryAssetSource::with_builtins()))
    }

    #[test]
    fn test_run_redraws_only_on_change() {
        let mut engine = engine();
        let mut app = Slider::default();
        let mut input = ScriptedInput::default();
        input.push_idle(2, 0.1);
        input.push(InputFrame::with_keys(0.1, [KeyCode::Right]));
        input.push_idle(1, 0.1);
        let mut backend = RecordingBackend::new();

        let stats = engine.run(&mut app, &mut input, &mut backend).unwrap();
        assert_eq!(stats.ticks, 4);
        // first tick (camera moved), and the tick the cube slid
        assert_eq!(stats.draws, 2);
        assert_eq!(backend.records()[1].world[(0, 3)], 1.0);
        assert_eq!(app.updates, 4);
        assert!(app.cleaned_up);
        assert_eq!(engine.resources.loaded_count(), 0);
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut engine = engine();
        let mut app = Slider::default();
        let mut input = ScriptedInput::default();
        input.push(InputFrame::with_keys(0.1, [KeyCode::Escape]));
        input.push_idle(5, 0.1);

        let stats = engine.run(&mut app, &mut input, &mut RecordingBackend::new()).unwrap();
        assert_eq!(stats.ticks, 1);

        let mut input = ScriptedInput::new([InputFrame { quit: true, ..InputFrame::idle(0.1) }]);
        let stats = engine.run(&mut Slider::default(), &mut input, &mut RecordingBackend::new()).unwrap();
        assert_eq!(stats.ticks, 0);
    }

    #[test]
    fn test_requested_redraw_draws_clean_nodes() {
        let mut engine = engine();
        let mut app = Slider::default();
        app.initialize(&mut engine).unwrap();
        let mut backend = RecordingBackend::new();

        engine.update_matrices(false);
        assert_eq!(engine.render(&mut backend), 1);
        assert_eq!(engine.render(&mut backend), 0);

        engine.request_redraw();
        assert_eq!(engine.render(&mut backend), 1);
        assert_eq!(engine.render(&mut backend), 0);
    }

    #[test]
    fn test_backend_failure_is_fatal() {
        let mut engine = engine();
        let mut app = Slider::default();
        let result = engine.run(&mut app, &mut ScriptedInput::default(), &mut RecordingBackend::failing());
        assert!(matches!(result, Err(EngineError::Render(_))));
        assert!(app.cube.is_none());
    }
}
