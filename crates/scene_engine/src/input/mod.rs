//! Input sampling
//!
//! The frame loop pulls one [`InputFrame`] per tick from an [`InputSource`].
//! A windowed frontend would fill frames from its event queue;
//! [`ScriptedInput`] replays a prepared list and drives headless runs.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Left shift
    LeftShift,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

const KEY_NAMES: [(KeyCode, &str); 34] = [
    (KeyCode::A, "A"),
    (KeyCode::B, "B"),
    (KeyCode::C, "C"),
    (KeyCode::D, "D"),
    (KeyCode::E, "E"),
    (KeyCode::F, "F"),
    (KeyCode::G, "G"),
    (KeyCode::H, "H"),
    (KeyCode::I, "I"),
    (KeyCode::J, "J"),
    (KeyCode::K, "K"),
    (KeyCode::L, "L"),
    (KeyCode::M, "M"),
    (KeyCode::N, "N"),
    (KeyCode::O, "O"),
    (KeyCode::P, "P"),
    (KeyCode::Q, "Q"),
    (KeyCode::R, "R"),
    (KeyCode::S, "S"),
    (KeyCode::T, "T"),
    (KeyCode::U, "U"),
    (KeyCode::V, "V"),
    (KeyCode::W, "W"),
    (KeyCode::X, "X"),
    (KeyCode::Y, "Y"),
    (KeyCode::Z, "Z"),
    (KeyCode::Space, "SPACE"),
    (KeyCode::Enter, "ENTER"),
    (KeyCode::Escape, "ESCAPE"),
    (KeyCode::LeftShift, "LSHIFT"),
    (KeyCode::Up, "UP"),
    (KeyCode::Down, "DOWN"),
    (KeyCode::Left, "LEFT"),
    (KeyCode::Right, "RIGHT"),
];

impl KeyCode {
    /// Config-file name of the key
    pub fn name(self) -> &'static str {
        KEY_NAMES
            .iter()
            .find(|(key, _)| *key == self)
            .map_or("?", |(_, name)| name)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown key name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown key name: '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for KeyCode {
    type Err = UnknownKey;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        KEY_NAMES
            .iter()
            .find(|(_, name)| *name == upper)
            .map(|(key, _)| *key)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Everything sampled for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    /// Seconds since the previous tick
    pub delta_time: f32,
    /// Keys held down during this tick
    pub pressed: HashSet<KeyCode>,
    /// Pointer motion since the previous tick, screen space (y grows downward)
    pub pointer_delta: (f32, f32),
    /// Vertical scroll steps; positive scrolls up
    pub scroll: f32,
    /// The user asked to close
    pub quit: bool,
}

impl InputFrame {
    /// Frame with nothing pressed
    pub fn idle(delta_time: f32) -> Self {
        Self {
            delta_time,
            ..Self::default()
        }
    }

    /// Frame with the given keys held
    pub fn with_keys<I: IntoIterator<Item = KeyCode>>(delta_time: f32, keys: I) -> Self {
        Self {
            delta_time,
            pressed: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Same frame with pointer motion `(dx, dy)`
    pub fn with_pointer(mut self, dx: f32, dy: f32) -> Self {
        self.pointer_delta = (dx, dy);
        self
    }

    /// Same frame with `steps` of scrolling
    pub fn with_scroll(mut self, steps: f32) -> Self {
        self.scroll = steps;
        self
    }

    /// Whether `key` is held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }
}

/// Per-tick input provider
pub trait InputSource {
    /// Next frame, or `None` when input is exhausted
    fn next_frame(&mut self) -> Option<InputFrame>;
}

/// Replays a fixed sequence of frames
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
}

impl ScriptedInput {
    /// Replay `frames` in order
    pub fn new<I: IntoIterator<Item = InputFrame>>(frames: I) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Append one frame
    pub fn push(&mut self, frame: InputFrame) -> &mut Self {
        self.frames.push_back(frame);
        self
    }

    /// Append `count` idle frames
    pub fn push_idle(&mut self, count: usize, delta_time: f32) -> &mut Self {
        self.frames
            .extend(std::iter::repeat_with(|| InputFrame::idle(delta_time)).take(count));
        self
    }

    /// Frames left to replay
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_frame(&mut self) -> Option<InputFrame> {
        self.frames.pop_front()
    }
}
