//! The fourteen moves and the faces they act on

use scene_engine::foundation::math::{Axis, Vec3};

/// One outer layer of the puzzle, named by the side it faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// +Z layer
    Front,
    /// +Y layer
    Up,
    /// -X layer
    Left,
    /// +X layer
    Right,
    /// -Y layer
    Down,
}

impl Face {
    /// Whether a cubie at `position` (relative to the root cubie) is in this layer
    pub fn contains(self, position: &Vec3, eps: f32) -> bool {
        match self {
            Self::Front => position.z > eps,
            Self::Up => position.y > eps,
            Self::Left => position.x < -eps,
            Self::Right => position.x > eps,
            Self::Down => position.y < -eps,
        }
    }

    /// Axis through the layer's centre
    pub fn normal_axis(self) -> Axis {
        match self {
            Self::Front => Axis::Pitch,
            Self::Up | Self::Down => Axis::Yaw,
            Self::Left | Self::Right => Axis::Roll,
        }
    }
}

/// Current move, or `None` while idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationKind {
    /// No move
    #[default]
    None,
    /// Tip the whole cube up
    RotateUp,
    /// Spin the whole cube left
    RotateLeft,
    /// Spin the whole cube right
    RotateRight,
    /// Tip the whole cube down
    RotateDown,
    /// Front layer, counter-clockwise seen from the front
    TurnFrontLeft,
    /// Front layer, clockwise seen from the front
    TurnFrontRight,
    /// Top layer towards the left
    TurnUpLeft,
    /// Top layer towards the right
    TurnUpRight,
    /// Left layer upwards
    TurnLeftUp,
    /// Left layer downwards
    TurnLeftDown,
    /// Right layer upwards
    TurnRightUp,
    /// Right layer downwards
    TurnRightDown,
    /// Bottom layer towards the left
    TurnDownLeft,
    /// Bottom layer towards the right
    TurnDownRight,
}

impl AnimationKind {
    /// Every real move, in input priority order
    pub const MOVES: [Self; 14] = [
        Self::RotateUp,
        Self::RotateLeft,
        Self::RotateRight,
        Self::RotateDown,
        Self::TurnFrontLeft,
        Self::TurnFrontRight,
        Self::TurnUpLeft,
        Self::TurnUpRight,
        Self::TurnLeftUp,
        Self::TurnLeftDown,
        Self::TurnRightUp,
        Self::TurnRightDown,
        Self::TurnDownLeft,
        Self::TurnDownRight,
    ];

    /// Rotates the whole assembly
    pub fn is_whole_cube(self) -> bool {
        matches!(self, Self::RotateUp | Self::RotateLeft | Self::RotateRight | Self::RotateDown)
    }

    /// Turns one layer
    pub fn is_slice_turn(self) -> bool {
        self.face().is_some()
    }

    /// Layer a slice turn acts on
    pub fn face(self) -> Option<Face> {
        match self {
            Self::TurnFrontLeft | Self::TurnFrontRight => Some(Face::Front),
            Self::TurnUpLeft | Self::TurnUpRight => Some(Face::Up),
            Self::TurnLeftUp | Self::TurnLeftDown => Some(Face::Left),
            Self::TurnRightUp | Self::TurnRightDown => Some(Face::Right),
            Self::TurnDownLeft | Self::TurnDownRight => Some(Face::Down),
            _ => None,
        }
    }

    /// Rotation axis
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::RotateUp | Self::RotateDown => Some(Axis::Pitch),
            Self::RotateLeft | Self::RotateRight => Some(Axis::Yaw),
            other => other.face().map(Face::normal_axis),
        }
    }

    /// Direction of rotation about [`AnimationKind::axis`]
    pub fn sign(self) -> f32 {
        match self {
            Self::RotateUp
            | Self::RotateLeft
            | Self::TurnFrontLeft
            | Self::TurnUpLeft
            | Self::TurnLeftUp
            | Self::TurnRightUp
            | Self::TurnDownRight => -1.0,
            Self::None => 0.0,
            _ => 1.0,
        }
    }

    /// The move that undoes this one
    pub fn inverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::RotateUp => Self::RotateDown,
            Self::RotateDown => Self::RotateUp,
            Self::RotateLeft => Self::RotateRight,
            Self::RotateRight => Self::RotateLeft,
            Self::TurnFrontLeft => Self::TurnFrontRight,
            Self::TurnFrontRight => Self::TurnFrontLeft,
            Self::TurnUpLeft => Self::TurnUpRight,
            Self::TurnUpRight => Self::TurnUpLeft,
            Self::TurnLeftUp => Self::TurnLeftDown,
            Self::TurnLeftDown => Self::TurnLeftUp,
            Self::TurnRightUp => Self::TurnRightDown,
            Self::TurnRightDown => Self::TurnRightUp,
            Self::TurnDownLeft => Self::TurnDownRight,
            Self::TurnDownRight => Self::TurnDownLeft,
        }
    }
}
