//! Game configuration

use serde::{Deserialize, Serialize};

use scene_engine::config::{Config, EngineConfig};

/// Game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine settings
    pub engine: EngineConfig,

    /// Puzzle settings
    pub puzzle: PuzzleConfig,

    /// Key bindings
    pub controls: ControlsConfig,

    /// Headless demo settings
    pub demo: DemoConfig,
}

impl Config for GameConfig {}

/// Puzzle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Seconds per move
    pub animation_duration: f32,

    /// Uniform scale of the assembly
    pub cubie_scale: f32,

    /// Height of the assembly's centre above the floor
    pub height: f32,

    /// Cubie mesh name
    pub cubie_mesh: String,

    /// Cubie shader name
    pub cubie_shader: String,

    /// Cubie texture name
    pub cubie_texture: String,

    /// Logo mesh name
    pub logo_mesh: String,

    /// Logo texture name; empty disables the logo
    pub logo_texture: String,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            animation_duration: 1.0,
            cubie_scale: 1.0 / 30.0,
            // 0.65 of a 1.8 player
            height: 1.17,
            cubie_mesh: "cubie".to_string(),
            cubie_shader: "basic_texlight".to_string(),
            cubie_texture: "colors".to_string(),
            logo_mesh: "square".to_string(),
            logo_texture: "logo_cia_2048".to_string(),
        }
    }
}

/// Key name for every action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Tip the cube up
    pub rotate_up: String,
    /// Spin the cube left
    pub rotate_left: String,
    /// Spin the cube right
    pub rotate_right: String,
    /// Tip the cube down
    pub rotate_down: String,
    /// Front layer left
    pub turn_front_left: String,
    /// Front layer right
    pub turn_front_right: String,
    /// Top layer left
    pub turn_up_left: String,
    /// Top layer right
    pub turn_up_right: String,
    /// Left layer up
    pub turn_left_up: String,
    /// Left layer down
    pub turn_left_down: String,
    /// Right layer up
    pub turn_right_up: String,
    /// Right layer down
    pub turn_right_down: String,
    /// Bottom layer left
    pub turn_down_left: String,
    /// Bottom layer right
    pub turn_down_right: String,
    /// Lamp on/off
    pub lamp: String,
    /// Leave the game
    pub quit: String,
    /// Walk forward
    pub move_forward: String,
    /// Walk backward
    pub move_backward: String,
    /// Strafe left
    pub move_left: String,
    /// Strafe right
    pub move_right: String,
    /// Jump
    pub jump: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            rotate_up: "UP".to_string(),
            rotate_left: "LEFT".to_string(),
            rotate_right: "RIGHT".to_string(),
            rotate_down: "DOWN".to_string(),
            turn_front_left: "Q".to_string(),
            turn_front_right: "E".to_string(),
            turn_up_left: "R".to_string(),
            turn_up_right: "T".to_string(),
            turn_left_up: "F".to_string(),
            turn_left_down: "V".to_string(),
            turn_right_up: "G".to_string(),
            turn_right_down: "B".to_string(),
            turn_down_left: "Z".to_string(),
            turn_down_right: "X".to_string(),
            lamp: "L".to_string(),
            quit: "ESCAPE".to_string(),
            move_forward: "W".to_string(),
            move_backward: "S".to_string(),
            move_left: "A".to_string(),
            move_right: "D".to_string(),
            jump: "SPACE".to_string(),
        }
    }
}

/// Headless demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Ticks per simulated second
    pub tick_rate: u32,

    /// Key names pressed one after another; each press is held for one
    /// tick and followed by enough idle ticks for the move to finish
    pub script: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            script: ["Q", "G", "UP", "L", "DOWN", "B", "E"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
