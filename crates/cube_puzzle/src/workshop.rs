//! The room around the puzzle: a table with a desk lamp

use scene_engine::assets::{MeshData, MemoryAssetSource, ResourceManager, ShaderSource, TextureData};
use scene_engine::foundation::math::{angle_axis, constants::HALF_PI, Axis, Quat, Vec3};
use scene_engine::scene::{LightSource, NodeId, SceneError, SceneGraph};

/// Colour of the lamp's light when switched on
pub const LAMP_LIGHT_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.0);

/// Leg positions relative to the plank, in attachment order
const LEG_POSITIONS: [(f32, f32); 4] = [(0.4, 0.4), (0.4, -0.4), (-0.4, -0.4), (-0.4, 0.4)];

/// Asset store with every name the game asks for
///
/// Used when no asset directory is available; stands in solid colours for
/// the textures and the built-in shader for every program.
pub fn builtin_assets() -> MemoryAssetSource {
    let mut source = MemoryAssetSource::with_builtins();
    source
        .insert_mesh("cubie", MeshData::cube())
        .insert_shader("basic_texlight", ShaderSource::basic())
        .insert_shader("basic_tex", ShaderSource::basic())
        .insert_shader("scene", ShaderSource::basic())
        .insert_texture("colors", TextureData::solid_color(6, 1, [200, 200, 200, 255]))
        .insert_texture("wood", TextureData::solid_color(1, 1, [133, 94, 66, 255]))
        .insert_texture("logo_cia_2048", TextureData::solid_color(1, 1, [255, 255, 255, 255]));
    source
}

/// Table, legs, arrow and lamp
#[derive(Debug)]
pub struct Workshop {
    table: NodeId,
    plank: NodeId,
    lamp: NodeId,
    legs: [NodeId; 4],
    arrow: NodeId,
    lamp_on: bool,
    lamp_key_held: bool,
}

impl Workshop {
    /// Build the table under `parent`; the lamp starts switched off
    pub fn new(graph: &mut SceneGraph, resources: &mut ResourceManager, parent: NodeId) -> Result<Self, SceneError> {
        let table = graph.create_node();
        graph.add_child(parent, Some("table"), table)?;
        place(graph, table, Vec3::new(0.0, 0.0, -0.25), None, Vec3::repeat(1.0));

        let plank = graph.create_node();
        graph.set_shader(plank, resources, "basic_tex");
        graph.set_mesh(plank, resources, "cube");
        graph.set_texture(plank, resources, "wood");
        graph.add_child(table, Some("plank"), plank)?;
        place(graph, plank, Vec3::new(0.0, 1.05, 0.0), None, Vec3::new(1.0, 0.1, 1.0));

        let lamp = graph.create_node();
        graph.set_shader(lamp, resources, "basic");
        graph.set_mesh(lamp, resources, "cylinder");
        graph.set_color(lamp, Vec3::zeros());
        graph.set_light(
            lamp,
            Some(LightSource {
                enabled: false,
                ..LightSource::new(LAMP_LIGHT_COLOR)
            }),
        );
        graph.add_child(plank, Some("lamp"), lamp)?;
        place(graph, lamp, Vec3::new(-0.4, 0.8, 0.4), None, Vec3::new(0.1, 3.0, 0.1));

        let mut legs = [lamp; 4];
        for (i, (leg, &(x, z))) in legs.iter_mut().zip(LEG_POSITIONS.iter()).enumerate() {
            *leg = graph.create_node();
            graph.set_shader(*leg, resources, "scene");
            graph.set_mesh(*leg, resources, "cylinder");
            graph.set_texture(*leg, resources, "wood");
            graph.add_child(plank, Some(&format!("leg{}", i + 1)), *leg)?;
            place(graph, *leg, Vec3::new(x, -5.05, z), None, Vec3::new(0.1, 10.0, 0.1));
        }

        let arrow = graph.create_node();
        graph.set_shader(arrow, resources, "scene");
        graph.set_mesh(arrow, resources, "triangle");
        graph.set_color(arrow, Vec3::new(1.0, 0.0, 0.0));
        graph.add_child(plank, Some("arrow"), arrow)?;
        place(
            graph,
            arrow,
            Vec3::new(0.0, 0.51, 0.4),
            Some(angle_axis(HALF_PI, Axis::Yaw)),
            Vec3::new(0.1, 1.0, 0.1),
        );

        log::debug!("Workshop built under {:?}", parent);
        Ok(Self {
            table,
            plank,
            lamp,
            legs,
            arrow,
            lamp_on: false,
            lamp_key_held: false,
        })
    }

    /// Flip the lamp on the press edge of its key
    ///
    /// Holding the key keeps the lamp as it is. Returns true when the lamp
    /// was switched during this call.
    pub fn toggle_lamp(&mut self, graph: &mut SceneGraph, pressed: bool) -> bool {
        let edge = pressed && !self.lamp_key_held;
        self.lamp_key_held = pressed;
        if edge {
            self.set_lamp(graph, !self.lamp_on);
        }
        edge
    }

    /// Switch the lamp's light and glow
    pub fn set_lamp(&mut self, graph: &mut SceneGraph, on: bool) {
        self.lamp_on = on;
        graph.set_light_enabled(self.lamp, on);
        graph.set_color(self.lamp, if on { LAMP_LIGHT_COLOR } else { Vec3::zeros() });
        log::info!("Lamp {}", if on { "on" } else { "off" });
    }

    /// Whether the lamp is lit
    pub fn lamp_on(&self) -> bool {
        self.lamp_on
    }

    /// Top node of the table
    pub fn table(&self) -> NodeId {
        self.table
    }

    /// Table top
    pub fn plank(&self) -> NodeId {
        self.plank
    }

    /// Lamp node, which also carries the light
    pub fn lamp(&self) -> NodeId {
        self.lamp
    }

    /// Table legs
    pub fn legs(&self) -> &[NodeId; 4] {
        &self.legs
    }

    /// Red arrow marking the front of the table
    pub fn arrow(&self) -> NodeId {
        self.arrow
    }
}

fn place(graph: &mut SceneGraph, id: NodeId, position: Vec3, rotation: Option<Quat>, scale: Vec3) {
    if let Some(transform) = graph.transform_mut(id) {
        transform.set_transform(Some(position), rotation, Some(scale));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup() -> (SceneGraph, ResourceManager, Workshop) {
        let mut graph = SceneGraph::default();
        let mut resources = ResourceManager::new(Box::new(builtin_assets()));
        let root = graph.root();
        let workshop = Workshop::new(&mut graph, &mut resources, root).unwrap();
        graph.propagate_transform(root, true);
        (graph, resources, workshop)
    }

    #[test]
    fn test_table_layout() {
        let (graph, resources, workshop) = setup();
        assert_eq!(graph.children(workshop.plank()).len(), 6);
        assert_eq!(graph.child_by_name(workshop.plank(), "leg3"), Some(workshop.legs()[2]));

        // plank world height: table at 0, plank at 1.05
        let plank = graph.transform(workshop.plank()).unwrap();
        assert_relative_eq!(plank.world_position(), Vec3::new(0.0, 1.05, -0.25), epsilon = 1e-6);

        // one shared cylinder for the lamp and the four legs
        let cylinder = resources.meshes().find("cylinder").unwrap();
        assert_eq!(resources.meshes().ref_count(cylinder), 5);
        assert_eq!(graph.node(workshop.arrow()).unwrap().renderable().color, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_lamp_starts_off() {
        let (graph, _, workshop) = setup();
        assert!(!workshop.lamp_on());
        assert!(graph.collect_lights().is_empty());
        assert_eq!(graph.node(workshop.lamp()).unwrap().renderable().color, Vec3::zeros());
    }

    #[test]
    fn test_lamp_toggles_on_press_edge() {
        let (mut graph, _, mut workshop) = setup();

        assert!(workshop.toggle_lamp(&mut graph, true));
        assert!(!workshop.toggle_lamp(&mut graph, true));
        assert!(workshop.lamp_on());
        let lights = graph.collect_lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].color, LAMP_LIGHT_COLOR);
        assert_eq!(graph.node(workshop.lamp()).unwrap().renderable().color, LAMP_LIGHT_COLOR);

        assert!(!workshop.toggle_lamp(&mut graph, false));
        assert!(workshop.toggle_lamp(&mut graph, true));
        assert!(!workshop.lamp_on());
        assert!(graph.collect_lights().is_empty());
    }
}
