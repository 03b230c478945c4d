//! Key bindings and logical actions

use bitflags::bitflags;
use thiserror::Error;

use scene_engine::input::{InputFrame, KeyCode, UnknownKey};

use crate::config::ControlsConfig;
use crate::moves::AnimationKind;

bitflags! {
    /// Logical actions held during one tick
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u32 {
        /// Tip the cube up
        const ROTATE_UP = 1 << 0;
        /// Spin the cube left
        const ROTATE_LEFT = 1 << 1;
        /// Spin the cube right
        const ROTATE_RIGHT = 1 << 2;
        /// Tip the cube down
        const ROTATE_DOWN = 1 << 3;
        /// Front layer left
        const TURN_FRONT_LEFT = 1 << 4;
        /// Front layer right
        const TURN_FRONT_RIGHT = 1 << 5;
        /// Top layer left
        const TURN_UP_LEFT = 1 << 6;
        /// Top layer right
        const TURN_UP_RIGHT = 1 << 7;
        /// Left layer up
        const TURN_LEFT_UP = 1 << 8;
        /// Left layer down
        const TURN_LEFT_DOWN = 1 << 9;
        /// Right layer up
        const TURN_RIGHT_UP = 1 << 10;
        /// Right layer down
        const TURN_RIGHT_DOWN = 1 << 11;
        /// Bottom layer left
        const TURN_DOWN_LEFT = 1 << 12;
        /// Bottom layer right
        const TURN_DOWN_RIGHT = 1 << 13;
        /// Lamp on/off
        const TOGGLE_LAMP = 1 << 14;
        /// Leave the game
        const QUIT = 1 << 15;
        /// Walk along the view direction
        const MOVE_FORWARD = 1 << 16;
        /// Walk backward
        const MOVE_BACKWARD = 1 << 17;
        /// Strafe left
        const MOVE_LEFT = 1 << 18;
        /// Strafe right
        const MOVE_RIGHT = 1 << 19;
        /// Jump
        const JUMP = 1 << 20;
    }
}

/// Move actions in priority order, paired with their move
const MOVE_ACTIONS: [(Actions, AnimationKind); 14] = [
    (Actions::ROTATE_UP, AnimationKind::RotateUp),
    (Actions::ROTATE_LEFT, AnimationKind::RotateLeft),
    (Actions::ROTATE_RIGHT, AnimationKind::RotateRight),
    (Actions::ROTATE_DOWN, AnimationKind::RotateDown),
    (Actions::TURN_FRONT_LEFT, AnimationKind::TurnFrontLeft),
    (Actions::TURN_FRONT_RIGHT, AnimationKind::TurnFrontRight),
    (Actions::TURN_UP_LEFT, AnimationKind::TurnUpLeft),
    (Actions::TURN_UP_RIGHT, AnimationKind::TurnUpRight),
    (Actions::TURN_LEFT_UP, AnimationKind::TurnLeftUp),
    (Actions::TURN_LEFT_DOWN, AnimationKind::TurnLeftDown),
    (Actions::TURN_RIGHT_UP, AnimationKind::TurnRightUp),
    (Actions::TURN_RIGHT_DOWN, AnimationKind::TurnRightDown),
    (Actions::TURN_DOWN_LEFT, AnimationKind::TurnDownLeft),
    (Actions::TURN_DOWN_RIGHT, AnimationKind::TurnDownRight),
];

impl Actions {
    /// Highest-priority move among the held actions
    pub fn first_move(self) -> Option<AnimationKind> {
        MOVE_ACTIONS
            .iter()
            .find(|(action, _)| self.contains(*action))
            .map(|&(_, kind)| kind)
    }

    /// Action that requests `kind`
    pub fn for_move(kind: AnimationKind) -> Self {
        MOVE_ACTIONS
            .iter()
            .find(|&&(_, candidate)| candidate == kind)
            .map_or(Self::empty(), |&(action, _)| action)
    }
}

/// Invalid key binding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The key name is not known
    #[error("{action}: {source}")]
    UnknownKey {
        /// Action being bound
        action: &'static str,
        /// Parse failure
        source: UnknownKey,
    },
}

/// Key to action table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinds {
    bindings: Vec<(KeyCode, Actions)>,
}

impl KeyBinds {
    /// Parse every key name of `controls`
    pub fn from_config(controls: &ControlsConfig) -> Result<Self, BindingError> {
        let table: [(&'static str, &str, Actions); 21] = [
            ("rotate_up", &controls.rotate_up, Actions::ROTATE_UP),
            ("rotate_left", &controls.rotate_left, Actions::ROTATE_LEFT),
            ("rotate_right", &controls.rotate_right, Actions::ROTATE_RIGHT),
            ("rotate_down", &controls.rotate_down, Actions::ROTATE_DOWN),
            ("turn_front_left", &controls.turn_front_left, Actions::TURN_FRONT_LEFT),
            ("turn_front_right", &controls.turn_front_right, Actions::TURN_FRONT_RIGHT),
            ("turn_up_left", &controls.turn_up_left, Actions::TURN_UP_LEFT),
            ("turn_up_right", &controls.turn_up_right, Actions::TURN_UP_RIGHT),
            ("turn_left_up", &controls.turn_left_up, Actions::TURN_LEFT_UP),
            ("turn_left_down", &controls.turn_left_down, Actions::TURN_LEFT_DOWN),
            ("turn_right_up", &controls.turn_right_up, Actions::TURN_RIGHT_UP),
            ("turn_right_down", &controls.turn_right_down, Actions::TURN_RIGHT_DOWN),
            ("turn_down_left", &controls.turn_down_left, Actions::TURN_DOWN_LEFT),
            ("turn_down_right", &controls.turn_down_right, Actions::TURN_DOWN_RIGHT),
            ("lamp", &controls.lamp, Actions::TOGGLE_LAMP),
            ("quit", &controls.quit, Actions::QUIT),
            ("move_forward", &controls.move_forward, Actions::MOVE_FORWARD),
            ("move_backward", &controls.move_backward, Actions::MOVE_BACKWARD),
            ("move_left", &controls.move_left, Actions::MOVE_LEFT),
            ("move_right", &controls.move_right, Actions::MOVE_RIGHT),
            ("jump", &controls.jump, Actions::JUMP),
        ];

        let bindings = table
            .into_iter()
            .map(|(action, name, flag)| {
                name.parse::<KeyCode>()
                    .map(|key| (key, flag))
                    .map_err(|source| BindingError::UnknownKey { action, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { bindings })
    }

    /// Key bound to `action`, if any
    pub fn key_for(&self, action: Actions) -> Option<KeyCode> {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == action)
            .map(|&(key, _)| key)
    }

    /// Actions held in `frame`; a window close request maps to `QUIT`
    pub fn from_keys(&self, frame: &InputFrame) -> Actions {
        let mut actions = self
            .bindings
            .iter()
            .filter(|(key, _)| frame.is_pressed(*key))
            .fold(Actions::empty(), |acc, &(_, action)| acc | action);
        if frame.quit {
            actions |= Actions::QUIT;
        }
        actions
    }
}

impl Default for KeyBinds {
    fn default() -> Self {
        Self::from_config(&ControlsConfig::default()).unwrap_or(Self { bindings: Vec::new() })
    }
}
