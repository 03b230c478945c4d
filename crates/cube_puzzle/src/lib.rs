//! # Cube Puzzle
//!
//! A 3x3x3 twisty puzzle on a table, built on `scene_engine`. Whole-cube
//! rotations and layer turns animate over a fixed duration; the lamp on the
//! table can be switched on and off. The player walks around it with a
//! first-person camera.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod input;
pub mod moves;
pub mod player;
pub mod puzzle;
pub mod workshop;

#[cfg(test)]
mod tests;

use scene_engine::assets::{AssetSource, FileAssetSource};
use scene_engine::config::AssetConfig;
use scene_engine::input::{InputFrame, KeyCode, ScriptedInput, UnknownKey};
use scene_engine::render::RenderBackend;
use scene_engine::{AppError, Application, Engine};

use crate::config::{DemoConfig, GameConfig};
use crate::input::{Actions, BindingError, KeyBinds};
use crate::player::Player;
use crate::puzzle::PuzzleController;
use crate::workshop::Workshop;

/// Files under the asset root when it exists, the built-in store otherwise
pub fn asset_source(config: &AssetConfig) -> Box<dyn AssetSource> {
    if config.root.is_dir() {
        log::info!("Loading assets from {}", config.root.display());
        Box::new(FileAssetSource::new(config.clone()))
    } else {
        log::warn!("Asset root {} not found, using built-in assets", config.root.display());
        Box::new(workshop::builtin_assets())
    }
}

/// Scripted key presses for a headless run
///
/// Every key is held for one tick, then released for long enough that the
/// move it started can finish.
pub fn demo_input(demo: &DemoConfig, move_duration: f32) -> Result<ScriptedInput, UnknownKey> {
    let tick_rate = demo.tick_rate.max(1);
    let delta_time = 1.0 / tick_rate as f32;
    let settle_ticks = (move_duration * tick_rate as f32).ceil() as usize + 1;

    let mut input = ScriptedInput::default();
    for name in &demo.script {
        let key: KeyCode = name.parse()?;
        input.push(InputFrame::with_keys(delta_time, [key]));
        input.push_idle(settle_ticks, delta_time);
    }
    Ok(input)
}

/// The game, as run by [`Engine::run`]
#[derive(Debug)]
pub struct PuzzleApp {
    config: GameConfig,
    binds: KeyBinds,
    player: Player,
    puzzle: Option<PuzzleController>,
    workshop: Option<Workshop>,
    moves_completed: u64,
    solved_on_exit: bool,
}

impl PuzzleApp {
    /// Create the game; fails on an unknown key name in the controls
    pub fn new(config: GameConfig) -> Result<Self, BindingError> {
        let binds = KeyBinds::from_config(&config.controls)?;
        let player = Player::new(&config.engine.camera, config.engine.scene.border);
        Ok(Self {
            config,
            binds,
            player,
            puzzle: None,
            workshop: None,
            moves_completed: 0,
            solved_on_exit: false,
        })
    }

    /// First-person camera controller
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Puzzle controller, once initialised
    pub fn puzzle(&self) -> Option<&PuzzleController> {
        self.puzzle.as_ref()
    }

    /// Table and lamp, once initialised
    pub fn workshop(&self) -> Option<&Workshop> {
        self.workshop.as_ref()
    }

    /// Moves finished so far
    pub fn moves_completed(&self) -> u64 {
        self.moves_completed
    }

    /// Whether the puzzle was solved when the game shut down
    pub fn solved_on_exit(&self) -> bool {
        self.solved_on_exit
    }
}

impl Application for PuzzleApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Setting up puzzle scene...");
        let root = engine.scene.root();
        self.workshop = Some(Workshop::new(&mut engine.scene, &mut engine.resources, root)?);
        self.puzzle = Some(PuzzleController::new(
            &mut engine.scene,
            &mut engine.resources,
            &self.config.puzzle,
            root,
        )?);
        engine.update_matrices(true);
        log::info!(
            "Scene ready: {} nodes, {} resources loaded",
            engine.scene.len(),
            engine.resources.loaded_count()
        );
        Ok(())
    }

    fn update(
        &mut self,
        engine: &mut Engine,
        input: &InputFrame,
        backend: &mut dyn RenderBackend,
        delta_time: f32,
    ) -> Result<(), AppError> {
        let actions = self.binds.from_keys(input);
        if actions.contains(Actions::QUIT) {
            engine.quit();
            return Ok(());
        }

        if self.player.update(&mut engine.camera, actions, input, delta_time) {
            engine.camera.update_matrices(false);
        }

        if let Some(workshop) = self.workshop.as_mut() {
            if workshop.toggle_lamp(&mut engine.scene, actions.contains(Actions::TOGGLE_LAMP)) {
                engine.request_redraw();
            }
        }

        if let Some(puzzle) = self.puzzle.as_mut() {
            let ctx = engine.render_context();
            if puzzle
                .tick(&mut engine.scene, &mut engine.resources, &ctx, backend, actions, delta_time)?
                .is_some()
            {
                self.moves_completed += 1;
            }
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        if let Some(puzzle) = self.puzzle.take() {
            self.solved_on_exit = puzzle.is_solved(&engine.scene);
        }
        self.workshop = None;
        log::info!(
            "Puzzle closed after {} moves ({})",
            self.moves_completed,
            if self.solved_on_exit { "solved" } else { "scrambled" }
        );
    }
}
