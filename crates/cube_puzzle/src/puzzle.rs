//! Puzzle controller
//!
//! Owns the 27 cubie nodes and drives the move state machine. Cubie 13 sits
//! at the centre of the grid and acts as the root of the assembly: every
//! other cubie is its child, positioned on the integer grid `{-1, 0, 1}^3`.
//! A layer turn groups its nine cubies under a transient slice node,
//! rotates the slice for one move duration, then bakes the rotation back
//! into the cubies and snaps them onto the grid.

use scene_engine::assets::ResourceManager;
use scene_engine::foundation::math::{angle_axis, constants::HALF_PI, round_vec, snap_to_right_angles, Axis, Mat3, Quat, Vec3};
use scene_engine::render::{RenderBackend, RenderContext};
use scene_engine::scene::{NodeId, SceneError, SceneGraph, Transformable};

use crate::config::PuzzleConfig;
use crate::input::Actions;
use crate::moves::AnimationKind;

/// Number of cubies in the assembly
pub const CUBIE_COUNT: usize = 27;

/// Index of the fixed centre cubie
pub const ROOT_INDEX: usize = 13;

/// Index of the cubie carrying the logo (front centre)
pub const LOGO_INDEX: usize = 14;

/// Name of the assembly under its parent node
pub const PUZZLE_NODE_NAME: &str = "puzzle";

/// Name of the transient slice under the root cubie
pub const SLICE_NODE_NAME: &str = "active_slice";

/// Cubie index of grid cell `(x, y, z)`, each coordinate in `-1..=1`
pub fn grid_index(x: i32, y: i32, z: i32) -> usize {
    ((x + 1) * 9 + (y + 1) * 3 + (z + 1)) as usize
}

/// Home cell of cubie `index`
pub fn grid_position(index: usize) -> Vec3 {
    let cell = |value: usize| (value % 3) as f32 - 1.0;
    Vec3::new(cell(index / 9), cell(index / 3), cell(index))
}

fn cubie_name(index: usize) -> String {
    format!("cubie_{index}")
}

/// What the controller is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// Waiting for a move
    #[default]
    Idle,
    /// Rotating the whole assembly
    RotatingWholeCube,
    /// Turning one layer
    TurningSlice,
}

/// Rubik's-cube style controller over a scene graph
#[derive(Debug)]
pub struct PuzzleController {
    cubies: Vec<NodeId>,
    root: NodeId,
    logo: Option<NodeId>,
    active_slice: Option<NodeId>,
    state: AnimationState,
    kind: AnimationKind,
    elapsed: f32,
    duration: f32,
    moves_completed: u64,
}

impl PuzzleController {
    /// Build the assembly and attach it under `parent`
    pub fn new(
        graph: &mut SceneGraph,
        resources: &mut ResourceManager,
        config: &PuzzleConfig,
        parent: NodeId,
    ) -> Result<Self, SceneError> {
        let cubies: Vec<NodeId> = (0..CUBIE_COUNT)
            .map(|_| {
                let cubie = graph.create_node();
                graph.set_mesh(cubie, resources, &config.cubie_mesh);
                graph.set_shader(cubie, resources, &config.cubie_shader);
                graph.set_texture(cubie, resources, &config.cubie_texture);
                cubie
            })
            .collect();
        let root = cubies[ROOT_INDEX];

        graph.add_child(parent, Some(PUZZLE_NODE_NAME), root)?;
        for (index, &cubie) in cubies.iter().enumerate() {
            if cubie == root {
                continue;
            }
            graph.add_child(root, Some(&cubie_name(index)), cubie)?;
            if let Some(transform) = graph.transform_mut(cubie) {
                transform.set_position(grid_position(index));
            }
        }

        let logo = if config.logo_texture.is_empty() {
            None
        } else {
            let logo = graph.create_node();
            graph.set_mesh(logo, resources, &config.logo_mesh);
            graph.set_shader(logo, resources, &config.cubie_shader);
            graph.set_texture(logo, resources, &config.logo_texture);
            graph.add_child(cubies[LOGO_INDEX], Some("logo"), logo)?;
            if let Some(transform) = graph.transform_mut(logo) {
                transform.set_transform(
                    Some(Vec3::new(0.0, 0.0, 0.5001)),
                    Some(angle_axis(HALF_PI, Axis::Roll) * angle_axis(HALF_PI, Axis::Pitch)),
                    Some(Vec3::repeat(0.9)),
                );
            }
            Some(logo)
        };

        if let Some(transform) = graph.transform_mut(root) {
            transform.set_transform(
                Some(Vec3::new(0.0, config.height, 0.0)),
                None,
                Some(Vec3::repeat(config.cubie_scale)),
            );
        }
        graph.set_lit(root, true);

        log::info!("Puzzle built: {} cubies under {:?}", cubies.len(), parent);
        Ok(Self {
            cubies,
            root,
            logo,
            active_slice: None,
            state: AnimationState::Idle,
            kind: AnimationKind::None,
            elapsed: 0.0,
            duration: config.animation_duration.max(f32::EPSILON),
            moves_completed: 0,
        })
    }

    /// Advance the state machine by one tick
    ///
    /// While idle the highest-priority move in `actions` starts; any other
    /// time `actions` is ignored. The first tick of a move already rotates.
    /// A turning slice is propagated and drawn here, before the completion
    /// check. Returns the move that completed during this tick, if any.
    pub fn tick(
        &mut self,
        graph: &mut SceneGraph,
        resources: &mut ResourceManager,
        ctx: &RenderContext,
        backend: &mut dyn RenderBackend,
        actions: Actions,
        delta_time: f32,
    ) -> Result<Option<AnimationKind>, SceneError> {
        if self.state == AnimationState::Idle {
            match actions.first_move() {
                Some(kind) => self.start(kind),
                None => return Ok(None),
            }
        }

        let Some(axis) = self.kind.axis() else {
            log::warn!("No axis for {:?}, returning to idle", self.kind);
            self.reset();
            return Ok(None);
        };

        match self.state {
            AnimationState::Idle => return Ok(None),
            AnimationState::RotatingWholeCube => {
                let delta = self.step_rotation(axis, delta_time);
                if let Some(transform) = graph.transform_mut(self.root) {
                    transform.rotate_by(delta);
                }
            }
            AnimationState::TurningSlice => {
                let slice = match self.active_slice {
                    Some(slice) => slice,
                    None => self.build_slice(graph)?,
                };
                let delta = self.step_rotation(axis, delta_time);
                if let Some(transform) = graph.transform_mut(slice) {
                    transform.rotate_by(delta);
                }
                graph.propagate_transform(slice, true);
                graph.render(slice, ctx, backend, true);
            }
        }

        if self.elapsed < self.duration {
            return Ok(None);
        }
        self.finish(graph, resources).map(Some)
    }

    fn start(&mut self, kind: AnimationKind) {
        self.state = if kind.is_whole_cube() {
            AnimationState::RotatingWholeCube
        } else {
            AnimationState::TurningSlice
        };
        self.kind = kind;
        self.elapsed = 0.0;
        log::debug!("Starting {:?}", kind);
    }

    /// Rotation for this tick; the last tick is clamped so a move adds up to
    /// exactly a quarter turn
    fn step_rotation(&mut self, axis: Axis, delta_time: f32) -> Quat {
        let remaining = self.duration - self.elapsed;
        let step = if delta_time >= remaining {
            self.elapsed = self.duration;
            remaining
        } else {
            let step = delta_time.max(0.0);
            self.elapsed += step;
            step
        };
        angle_axis(self.kind.sign() * HALF_PI * step / self.duration, axis)
    }

    fn build_slice(&mut self, graph: &mut SceneGraph) -> Result<NodeId, SceneError> {
        let slice = graph.create_node();
        graph.add_child(self.root, Some(SLICE_NODE_NAME), slice)?;
        self.active_slice = Some(slice);

        let Some(face) = self.kind.face() else {
            return Ok(slice);
        };
        let eps = graph.transform(self.root).map_or(0.0, |t| t.scale().max());
        let members: Vec<(usize, NodeId)> = self
            .cubies
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, cubie)| cubie != self.root)
            .filter(|&(_, cubie)| graph.transform(cubie).is_some_and(|t| face.contains(&t.position(), eps)))
            .collect();

        for &(index, cubie) in &members {
            graph.add_child(slice, Some(&cubie_name(index)), cubie)?;
        }
        log::debug!("Slice {:?} built with {} cubies", face, members.len());
        Ok(slice)
    }

    fn finish(&mut self, graph: &mut SceneGraph, resources: &mut ResourceManager) -> Result<AnimationKind, SceneError> {
        if let Some(slice) = self.active_slice.take() {
            let turn = graph.transform(slice).map_or_else(Quat::identity, Transformable::rotation);
            for (index, &cubie) in self.cubies.iter().enumerate() {
                if graph.parent(cubie) != Some(slice) {
                    continue;
                }
                if let Some(transform) = graph.transform_mut(cubie) {
                    let (position, rotation) = (transform.position(), transform.rotation());
                    transform.set_transform(Some(turn * position), Some(turn * rotation), None);
                }
                graph.add_child(self.root, Some(&cubie_name(index)), cubie)?;
            }
            graph.release_resources(slice, resources);
        }

        for &cubie in &self.cubies {
            if let Some(transform) = graph.transform_mut(cubie) {
                if cubie != self.root {
                    transform.set_position(round_vec(transform.position()));
                }
                transform.set_rotation(snap_to_right_angles(&transform.rotation()));
            }
        }

        let kind = self.kind;
        self.reset();
        self.moves_completed += 1;
        log::info!("Move {:?} complete ({} so far)", kind, self.moves_completed);
        Ok(kind)
    }

    fn reset(&mut self) {
        self.state = AnimationState::Idle;
        self.kind = AnimationKind::None;
        self.elapsed = 0.0;
    }

    /// Current state
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Move in progress, `None` while idle
    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    /// Seconds into the current move
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds per move
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// The centre cubie every other cubie hangs under
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// All 27 cubies, by grid index
    pub fn cubies(&self) -> &[NodeId] {
        &self.cubies
    }

    /// Logo node, when one was configured
    pub fn logo(&self) -> Option<NodeId> {
        self.logo
    }

    /// Transient slice node of the turn in progress
    pub fn active_slice(&self) -> Option<NodeId> {
        self.active_slice
    }

    /// Cubies grouped in the active slice
    pub fn slice_members(&self, graph: &SceneGraph) -> Vec<NodeId> {
        self.active_slice.map_or_else(Vec::new, |slice| graph.children(slice))
    }

    /// Moves finished since construction
    pub fn moves_completed(&self) -> u64 {
        self.moves_completed
    }

    /// Every cubie back in its home cell and unrotated
    ///
    /// The orientation of the assembly as a whole is ignored.
    pub fn is_solved(&self, graph: &SceneGraph) -> bool {
        self.state == AnimationState::Idle
            && self.cubies.iter().enumerate().all(|(index, &cubie)| {
                cubie == self.root
                    || graph.transform(cubie).is_some_and(|t| {
                        (t.position() - grid_position(index)).norm() < 1e-3
                            && (t.rotation().to_rotation_matrix().into_inner() - Mat3::identity()).amax() < 1e-3
                    })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workshop::builtin_assets;
    use approx::assert_relative_eq;
    use scene_engine::render::RecordingBackend;

    struct Fixture {
        graph: SceneGraph,
        resources: ResourceManager,
        backend: RecordingBackend,
        puzzle: PuzzleController,
    }

    impl Fixture {
        fn new() -> Self {
            let mut graph = SceneGraph::default();
            let mut resources = ResourceManager::new(Box::new(builtin_assets()));
            let parent = graph.root();
            let puzzle =
                PuzzleController::new(&mut graph, &mut resources, &PuzzleConfig::default(), parent).unwrap();
            graph.propagate_transform(parent, true);
            Self {
                graph,
                resources,
                backend: RecordingBackend::new(),
                puzzle,
            }
        }

        fn tick(&mut self, actions: Actions, dt: f32) -> Option<AnimationKind> {
            let ctx = RenderContext::default();
            self.puzzle
                .tick(&mut self.graph, &mut self.resources, &ctx, &mut self.backend, actions, dt)
                .unwrap()
        }

        fn position(&self, index: usize) -> Vec3 {
            self.graph.transform(self.puzzle.cubies()[index]).unwrap().position()
        }
    }

    #[test]
    fn test_grid_index_layout() {
        assert_eq!(grid_index(-1, -1, -1), 0);
        assert_eq!(grid_index(0, 0, 0), ROOT_INDEX);
        assert_eq!(grid_index(0, 0, 1), LOGO_INDEX);
        assert_eq!(grid_index(1, 1, 1), 26);
        for index in 0..CUBIE_COUNT {
            let p = grid_position(index);
            assert_eq!(grid_index(p.x as i32, p.y as i32, p.z as i32), index);
        }
    }

    #[test]
    fn test_initial_layout() {
        let f = Fixture::new();
        let root = f.puzzle.root();
        assert_eq!(f.graph.child_by_name(f.graph.root(), PUZZLE_NODE_NAME), Some(root));
        assert_eq!(f.graph.children(root).len(), CUBIE_COUNT - 1);
        assert_eq!(f.graph.child_by_name(root, "cubie_26"), Some(f.puzzle.cubies()[26]));
        assert_eq!(f.position(0), Vec3::new(-1.0, -1.0, -1.0));

        let root_transform = f.graph.transform(root).unwrap();
        assert_relative_eq!(root_transform.position(), Vec3::new(0.0, 1.17, 0.0));
        assert_relative_eq!(root_transform.scale(), Vec3::repeat(1.0 / 30.0));

        let logo = f.puzzle.logo().unwrap();
        assert_eq!(f.graph.parent(logo), Some(f.puzzle.cubies()[LOGO_INDEX]));
        assert!(f.graph.node(logo).unwrap().is_lit());
        assert!(f.graph.node(f.puzzle.cubies()[0]).unwrap().is_lit());
        assert!(f.puzzle.is_solved(&f.graph));
    }

    #[test]
    fn test_idle_without_input() {
        let mut f = Fixture::new();
        assert_eq!(f.tick(Actions::TOGGLE_LAMP, 0.1), None);
        assert_eq!(f.puzzle.state(), AnimationState::Idle);
        assert_eq!(f.backend.total_draws(), 0);
    }

    #[test]
    fn test_whole_cube_rotation() {
        let mut f = Fixture::new();
        f.tick(Actions::ROTATE_RIGHT, 0.25);
        assert_eq!(f.puzzle.state(), AnimationState::RotatingWholeCube);
        let partial = f.graph.transform(f.puzzle.root()).unwrap().rotation();
        assert_relative_eq!(partial.angle(), HALF_PI * 0.25, epsilon = 1e-5);

        f.tick(Actions::empty(), 0.5);
        assert_eq!(f.tick(Actions::empty(), 0.5), Some(AnimationKind::RotateRight));

        let rotation = f.graph.transform(f.puzzle.root()).unwrap().rotation();
        assert_relative_eq!(
            rotation.to_rotation_matrix(),
            angle_axis(HALF_PI, Axis::Yaw).to_rotation_matrix(),
            epsilon = 1e-5
        );
        assert_eq!(f.puzzle.state(), AnimationState::Idle);
        assert!(f.puzzle.is_solved(&f.graph));
    }

    #[test]
    fn test_front_slice_membership() {
        let mut f = Fixture::new();
        f.tick(Actions::TURN_FRONT_LEFT, 0.1);

        let mut members = f.puzzle.slice_members(&f.graph);
        members.sort();
        let mut expected: Vec<NodeId> = (0..CUBIE_COUNT)
            .filter(|&i| grid_position(i).z > 0.5)
            .map(|i| f.puzzle.cubies()[i])
            .collect();
        expected.sort();
        assert_eq!(members.len(), 9);
        assert_eq!(members, expected);
        assert!(!members.contains(&f.puzzle.root()));
    }

    #[test]
    fn test_slice_drawn_each_tick() {
        let mut f = Fixture::new();
        f.tick(Actions::TURN_UP_RIGHT, 0.1);
        // nine cubies; the logo is on the front centre, not the top layer
        assert_eq!(f.backend.total_draws(), 9);
        f.tick(Actions::empty(), 0.1);
        assert_eq!(f.backend.total_draws(), 18);
    }

    #[test]
    fn test_slice_released_on_completion() {
        let mut f = Fixture::new();
        let nodes = f.graph.len();
        let loaded = f.resources.loaded_count();

        f.tick(Actions::TURN_LEFT_DOWN, 0.6);
        assert_eq!(f.graph.len(), nodes + 1);
        assert_eq!(f.tick(Actions::empty(), 0.6), Some(AnimationKind::TurnLeftDown));

        assert!(f.puzzle.active_slice().is_none());
        assert_eq!(f.graph.len(), nodes);
        assert_eq!(f.graph.children(f.puzzle.root()).len(), CUBIE_COUNT - 1);
        assert_eq!(f.resources.loaded_count(), loaded);
        assert_eq!(f.puzzle.moves_completed(), 1);
    }

    #[test]
    fn test_final_tick_is_exact_quarter_turn() {
        let mut f = Fixture::new();
        // three uneven ticks overshooting the duration
        f.tick(Actions::TURN_FRONT_RIGHT, 0.37);
        f.tick(Actions::empty(), 0.41);
        let slice = f.puzzle.active_slice().unwrap();
        let before = f.graph.transform(slice).unwrap().rotation().angle();
        assert_relative_eq!(before, HALF_PI * 0.78, epsilon = 1e-5);

        f.tick(Actions::empty(), 0.9);
        assert_eq!(f.puzzle.state(), AnimationState::Idle);

        // (1, 0, 1) turns a quarter about +Z onto (0, 1, 1)
        assert_relative_eq!(f.position(grid_index(1, 0, 1)), Vec3::new(0.0, 1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_input_ignored_while_turning() {
        let mut f = Fixture::new();
        f.tick(Actions::TURN_FRONT_LEFT, 0.2);
        let members = f.puzzle.slice_members(&f.graph);

        f.tick(Actions::TURN_UP_LEFT | Actions::ROTATE_UP, 0.2);
        assert_eq!(f.puzzle.kind(), AnimationKind::TurnFrontLeft);
        assert_eq!(f.puzzle.state(), AnimationState::TurningSlice);
        assert_eq!(f.puzzle.slice_members(&f.graph), members);
        assert_relative_eq!(f.puzzle.elapsed(), 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_turn_then_inverse_restores() {
        let mut f = Fixture::new();
        f.tick(Actions::TURN_FRONT_LEFT, 1.0);
        assert!(!f.puzzle.is_solved(&f.graph));
        f.tick(Actions::TURN_FRONT_RIGHT, 1.0);
        assert!(f.puzzle.is_solved(&f.graph));
    }

    #[test]
    fn test_four_turns_restore() {
        let mut f = Fixture::new();
        for _ in 0..4 {
            assert_eq!(f.tick(Actions::TURN_DOWN_LEFT, 0.5), None);
            assert_eq!(f.tick(Actions::empty(), 0.5), Some(AnimationKind::TurnDownLeft));
        }
        assert!(f.puzzle.is_solved(&f.graph));
    }
}
