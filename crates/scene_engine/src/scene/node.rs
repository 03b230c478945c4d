//! Scene node data

use crate::assets::{MeshId, ShaderId, TextureId};
use crate::foundation::math::Vec3;
use crate::scene::transformable::{TransformLimits, Transformable};

slotmap::new_key_type! {
    /// Handle to a node in a [`SceneGraph`](crate::scene::SceneGraph)
    pub struct NodeId;
}

/// Ordered, uniquely named child list
///
/// Insertion order is preserved; propagation and rendering visit children in
/// that order.
#[derive(Debug, Clone, Default)]
pub struct ChildMap {
    entries: Vec<(String, NodeId)>,
    unnamed: usize,
}

impl ChildMap {
    /// Next `no_name_N` key; the counter only moves forward
    pub fn next_unnamed(&mut self) -> String {
        let name = format!("no_name_{}", self.unnamed);
        self.unnamed += 1;
        name
    }

    /// Child registered under `name`
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.entries.iter().find(|(key, _)| key == name).map(|&(_, id)| id)
    }

    /// Name `id` is registered under
    pub fn key_of(&self, id: NodeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|&&(_, child)| child == id)
            .map(|(key, _)| key.as_str())
    }

    /// Whether `name` is taken
    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether `id` is a direct child
    pub fn contains(&self, id: NodeId) -> bool {
        self.key_of(id).is_some()
    }

    pub(crate) fn insert(&mut self, name: String, id: NodeId) {
        self.entries.push((name, id));
    }

    pub(crate) fn remove_name(&mut self, name: &str) -> Option<NodeId> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub(crate) fn remove_id(&mut self, id: NodeId) -> Option<String> {
        let index = self.entries.iter().position(|&(_, child)| child == id)?;
        Some(self.entries.remove(index).0)
    }

    /// `(name, id)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.entries.iter().map(|(key, id)| (key.as_str(), *id))
    }

    /// Child ids in insertion order
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.entries.iter().map(|&(_, id)| id)
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no children
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Draw data; a node is drawn only when both mesh and shader are set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    /// Geometry
    pub mesh: Option<MeshId>,
    /// Program
    pub shader: Option<ShaderId>,
    /// Optional texture
    pub texture: Option<TextureId>,
    /// Flat colour
    pub color: Vec3,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            mesh: None,
            shader: None,
            texture: None,
            color: Vec3::repeat(1.0),
        }
    }
}

impl Renderable {
    /// Mesh and shader, when both are present
    pub fn drawable(&self) -> Option<(MeshId, ShaderId)> {
        self.mesh.zip(self.shader)
    }
}

/// Point light carried by a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    /// Emitted colour
    pub color: Vec3,
    /// Whether the light is currently on
    pub enabled: bool,
}

impl LightSource {
    /// Enabled light of the given colour
    pub fn new(color: Vec3) -> Self {
        Self { color, enabled: true }
    }
}

/// A node of the scene graph
///
/// Parent links are non-owning; the graph's arena owns every node.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub(crate) transform: Transformable,
    pub(crate) children: ChildMap,
    pub(crate) renderable: Renderable,
    pub(crate) light: Option<LightSource>,
    pub(crate) lit: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) parent_key: Option<String>,
    pub(crate) is_scene_root: bool,
}

impl SceneNode {
    pub(crate) fn new(limits: TransformLimits) -> Self {
        Self {
            transform: Transformable::new(limits),
            children: ChildMap::default(),
            renderable: Renderable::default(),
            light: None,
            lit: false,
            parent: None,
            parent_key: None,
            is_scene_root: false,
        }
    }

    /// Local transform and world matrix
    pub fn transform(&self) -> &Transformable {
        &self.transform
    }

    /// Children in insertion order
    pub fn children(&self) -> &ChildMap {
        &self.children
    }

    /// Draw data
    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }

    /// Light carried by this node
    pub fn light(&self) -> Option<&LightSource> {
        self.light.as_ref()
    }

    /// Whether draws of this node receive the scene lights
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Parent node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Name under which the parent holds this node
    pub fn parent_key(&self) -> Option<&str> {
        self.parent_key.as_deref()
    }

    /// Whether this is the graph's top-level node
    pub fn is_scene_root(&self) -> bool {
        self.is_scene_root
    }
}
