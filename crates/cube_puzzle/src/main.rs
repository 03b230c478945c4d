//! Headless puzzle demo
//!
//! Usage: `cube_puzzle [config-path]`. Without a path, `cube_puzzle.toml` in
//! the working directory is used when present, defaults otherwise. The
//! configured key script is played against a recording backend.

use std::process::ExitCode;

use scene_engine::config::Config;
use scene_engine::foundation::logging;
use scene_engine::render::RecordingBackend;
use scene_engine::Engine;

use cube_puzzle::config::GameConfig;
use cube_puzzle::{asset_source, demo_input, PuzzleApp};

const DEFAULT_CONFIG_PATH: &str = "cube_puzzle.toml";

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::load_or_default(DEFAULT_CONFIG_PATH)?,
    };
    logging::init(&config.engine.log_filter);
    log::info!("Starting Cube Puzzle");

    let mut input = demo_input(&config.demo, config.puzzle.animation_duration)?;
    let mut app = PuzzleApp::new(config.clone())?;
    let mut engine = Engine::new(config.engine.clone(), asset_source(&config.engine.assets));
    let mut backend = RecordingBackend::new();

    let stats = engine.run(&mut app, &mut input, &mut backend)?;
    log::info!(
        "Demo finished: {} ticks, {} draws, {} moves, {}",
        stats.ticks,
        stats.draws,
        app.moves_completed(),
        if app.solved_on_exit() { "solved" } else { "scrambled" }
    );
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // logging may not be up yet if the config failed to load
            eprintln!("cube_puzzle: {e}");
            log::error!("Fatal error: {e}");
            ExitCode::FAILURE
        }
    }
}
