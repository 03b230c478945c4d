//! Scene graph and puzzle properties under long move sequences
//!
//! Random sequences come from a seeded `StdRng` so failures reproduce.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scene_engine::assets::ResourceManager;
use scene_engine::foundation::math::{angle_axis, constants::HALF_PI, Axis, Mat4, Vec3};
use scene_engine::render::{RecordingBackend, RenderContext};
use scene_engine::scene::{NodeId, SceneGraph};

use crate::config::PuzzleConfig;
use crate::input::Actions;
use crate::moves::{AnimationKind, Face};
use crate::puzzle::{grid_index, grid_position, AnimationState, PuzzleController, CUBIE_COUNT};
use crate::workshop::{builtin_assets, Workshop};

struct Scene {
    graph: SceneGraph,
    resources: ResourceManager,
    backend: RecordingBackend,
    puzzle: PuzzleController,
    workshop: Workshop,
}

impl Scene {
    fn new() -> Self {
        let mut graph = SceneGraph::default();
        let mut resources = ResourceManager::new(Box::new(builtin_assets()));
        let root = graph.root();
        let workshop = Workshop::new(&mut graph, &mut resources, root).unwrap();
        let puzzle = PuzzleController::new(&mut graph, &mut resources, &PuzzleConfig::default(), root).unwrap();
        graph.propagate_transform(root, true);
        Self {
            graph,
            resources,
            backend: RecordingBackend::new(),
            puzzle,
            workshop,
        }
    }

    fn tick(&mut self, actions: Actions, dt: f32) -> Option<AnimationKind> {
        let ctx = RenderContext::default();
        let done = self
            .puzzle
            .tick(&mut self.graph, &mut self.resources, &ctx, &mut self.backend, actions, dt)
            .unwrap();
        let root = self.graph.root();
        self.graph.propagate_transform(root, false);
        done
    }

    /// Play `kind` to completion in random-sized ticks
    fn play(&mut self, kind: AnimationKind, rng: &mut StdRng) {
        let mut actions = Actions::for_move(kind);
        loop {
            let dt = rng.gen_range(0.05..0.6);
            if let Some(done) = self.tick(actions, dt) {
                assert_eq!(done, kind);
                return;
            }
            actions = Actions::empty();
        }
    }

    fn worlds(&self) -> Vec<Mat4> {
        self.all_nodes()
            .into_iter()
            .map(|id| *self.graph.transform(id).unwrap().world_matrix())
            .collect()
    }

    fn all_nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut stack = vec![self.graph.root()];
        while let Some(id) = stack.pop() {
            nodes.push(id);
            stack.extend(self.graph.children(id));
        }
        nodes
    }
}

fn random_move(rng: &mut StdRng) -> AnimationKind {
    AnimationKind::MOVES[rng.gen_range(0..AnimationKind::MOVES.len())]
}

#[test]
fn test_propagation_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut scene = Scene::new();
    for _ in 0..5 {
        let kind = random_move(&mut rng);
        scene.play(kind, &mut rng);
    }

    let root = scene.graph.root();
    scene.graph.propagate_transform(root, false);
    let first = scene.worlds();
    scene.graph.propagate_transform(root, false);
    assert_eq!(scene.worlds(), first);
    scene.graph.propagate_transform(root, true);
    assert_eq!(scene.worlds(), first);
}

#[test]
fn test_parent_change_reaches_every_descendant() {
    let mut scene = Scene::new();
    let root = scene.puzzle.root();
    let before: Vec<Mat4> = scene
        .puzzle
        .cubies()
        .iter()
        .map(|&id| *scene.graph.transform(id).unwrap().world_matrix())
        .collect();

    scene.graph.transform_mut(root).unwrap().translate(Vec3::new(0.5, 0.0, 0.0));
    let scene_root = scene.graph.root();
    scene.graph.propagate_transform(scene_root, false);

    let root_world = *scene.graph.transform(root).unwrap().world_matrix();
    for (index, &cubie) in scene.puzzle.cubies().iter().enumerate() {
        let transform = scene.graph.transform(cubie).unwrap();
        assert_ne!(*transform.world_matrix(), before[index]);
        if cubie != root {
            assert_relative_eq!(*transform.world_matrix(), root_world * transform.local_matrix(), epsilon = 1e-6);
        }
    }
}

#[test]
fn test_reparent_between_table_and_puzzle() {
    let mut scene = Scene::new();
    let arrow = scene.workshop.arrow();
    let plank = scene.workshop.plank();
    let target = scene.puzzle.cubies()[0];

    assert_eq!(scene.graph.add_child(target, Some("flag"), arrow).unwrap().as_deref(), Some("flag"));
    assert_eq!(scene.graph.parent(arrow), Some(target));
    assert_eq!(scene.graph.children(target).iter().filter(|&&id| id == arrow).count(), 1);
    assert!(!scene.graph.children(plank).contains(&arrow));
    assert!(scene.graph.child_by_name(plank, "arrow").is_none());
    // cubies are lit, so the arrow now is too
    assert!(scene.graph.node(arrow).unwrap().is_lit());
}

#[test]
fn test_random_moves_stay_on_grid() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut scene = Scene::new();

    for _ in 0..60 {
        let kind = random_move(&mut rng);
        scene.play(kind, &mut rng);
        assert_eq!(scene.puzzle.state(), AnimationState::Idle);

        let mut occupied = [false; CUBIE_COUNT];
        for &cubie in scene.puzzle.cubies() {
            if cubie == scene.puzzle.root() {
                continue;
            }
            let transform = scene.graph.transform(cubie).unwrap();
            let p = transform.position();
            assert_eq!(p, p.map(f32::round), "{kind:?} left {p:?} off the grid");
            let cell = grid_index(p.x as i32, p.y as i32, p.z as i32);
            assert!(!occupied[cell], "two cubies in cell {cell}");
            occupied[cell] = true;

            let rotation = transform.rotation().to_rotation_matrix();
            for value in rotation.matrix().iter() {
                assert!(
                    value.abs() < 1e-5 || (value.abs() - 1.0).abs() < 1e-5,
                    "{kind:?} left a rotation off the right angles: {rotation:?}"
                );
            }
        }
        assert_eq!(scene.graph.children(scene.puzzle.root()).len(), CUBIE_COUNT - 1);
    }
}

#[test]
fn test_random_sequence_undone_in_reverse() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut scene = Scene::new();
    let sequence: Vec<AnimationKind> = (0..20).map(|_| random_move(&mut rng)).collect();

    for &kind in &sequence {
        scene.play(kind, &mut rng);
    }
    for &kind in sequence.iter().rev() {
        scene.play(kind.inverse(), &mut rng);
    }

    assert!(scene.puzzle.is_solved(&scene.graph));
    assert_eq!(scene.puzzle.moves_completed(), 40);
}

#[test]
fn test_every_face_captures_nine_cubies() {
    let turns = [
        (AnimationKind::TurnFrontLeft, Face::Front),
        (AnimationKind::TurnUpLeft, Face::Up),
        (AnimationKind::TurnLeftUp, Face::Left),
        (AnimationKind::TurnRightDown, Face::Right),
        (AnimationKind::TurnDownRight, Face::Down),
    ];
    for (kind, face) in turns {
        let mut scene = Scene::new();
        scene.tick(Actions::for_move(kind), 0.1);

        let members = scene.puzzle.slice_members(&scene.graph);
        assert_eq!(members.len(), 9, "{kind:?}");
        for (index, cubie) in scene.puzzle.cubies().iter().enumerate() {
            let expected = face.contains(&grid_position(index), 0.5);
            assert_eq!(members.contains(cubie), expected, "{kind:?} cubie {index}");
        }
    }
}

#[test]
fn test_whole_cube_rotation_keeps_cubie_locals() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut scene = Scene::new();
    scene.play(AnimationKind::RotateUp, &mut rng);

    let rotation = scene.graph.transform(scene.puzzle.root()).unwrap().rotation();
    assert_relative_eq!(
        rotation.to_rotation_matrix(),
        angle_axis(-HALF_PI, Axis::Pitch).to_rotation_matrix(),
        epsilon = 1e-5
    );
    assert!(scene.puzzle.is_solved(&scene.graph));
}
