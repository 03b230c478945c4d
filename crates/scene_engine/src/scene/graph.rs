//! Scene graph - arena of nodes with named, ordered children
//!
//! The graph owns every node in a `SlotMap`. A node's children are held by
//! id in its [`ChildMap`]; the child keeps a non-owning `parent` id plus the
//! key it is registered under, and the graph keeps the two sides consistent:
//! whenever `parent` is set, `parent.children[parent_key]` is that node.
//!
//! Structural calls with ids that no longer exist are logged and ignored.
//! Removing a child only detaches it; the node stays in the arena until
//! [`SceneGraph::release_resources`] frees it.

use slotmap::SlotMap;
use thiserror::Error;

use crate::assets::ResourceManager;
use crate::config::{DuplicateNamePolicy, SceneConfig};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{DrawCall, PointLight, RenderBackend, RenderContext};
use crate::scene::node::{LightSource, NodeId, SceneNode};
use crate::scene::transformable::{TransformLimits, Transformable};

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The name is already used by another child of `parent`
    #[error("'{name}' already exists under node {parent:?}")]
    DuplicateName {
        /// Parent that was being added to
        parent: NodeId,
        /// Conflicting name
        name: String,
    },

    /// `child` is `parent` or one of its ancestors
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Requested parent
        parent: NodeId,
        /// Requested child
        child: NodeId,
    },
}

/// How to pick a child for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRef<'a> {
    /// By identity
    Id(NodeId),
    /// By the name it is registered under
    Name(&'a str),
}

impl From<NodeId> for ChildRef<'_> {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a str> for ChildRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

/// Tree of transformable, renderable nodes
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,
    config: SceneConfig,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl SceneGraph {
    /// Create a graph holding only the scene root
    pub fn new(config: SceneConfig) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = SceneNode::new(TransformLimits::from(&config));
        root.is_scene_root = true;
        let root = nodes.insert(root);
        Self { nodes, root, config }
    }

    /// The scene root
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Settings the graph was created with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Number of nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the scene root exists for the graph's lifetime
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Create a detached node with an identity transform
    pub fn create_node(&mut self) -> NodeId {
        self.nodes.insert(SceneNode::new(TransformLimits::from(&self.config)))
    }

    /// Read a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Read a node's transform
    pub fn transform(&self, id: NodeId) -> Option<&Transformable> {
        self.nodes.get(id).map(|node| &node.transform)
    }

    /// Edit a node's transform; `None` for the scene root, which stays at identity
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transformable> {
        match self.nodes.get_mut(id) {
            Some(node) if node.is_scene_root => {
                log::debug!("Ignoring transform edit of the scene root");
                None
            }
            Some(node) => Some(&mut node.transform),
            None => None,
        }
    }

    /// Parent of `id`
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Direct children of `id` in insertion order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|node| node.children.ids().collect())
            .unwrap_or_default()
    }

    /// Child of `parent` registered under `name`
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(parent).and_then(|node| node.children.get(name))
    }

    /// Whether `ancestor` is on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Attach `child` under `parent`
    ///
    /// Without a name the child gets the parent's next `no_name_N` key. A
    /// child that already has a parent is detached from it first. Unless the
    /// parent is the scene root, the child takes over the parent's lit flag.
    ///
    /// Returns the name the child is now registered under, or `None` when
    /// the call was ignored (stale id, or duplicate name under the
    /// [`DuplicateNamePolicy::Warn`] policy).
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
        child: NodeId,
    ) -> Result<Option<String>, SceneError> {
        if !self.contains(parent) || !self.contains(child) {
            log::warn!("add_child ignored: stale node id ({:?} <- {:?})", parent, child);
            return Ok(None);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCreateCycle { parent, child });
        }

        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return Ok(None);
        };
        let name = match name {
            Some(name) => name.to_string(),
            None => parent_node.children.next_unnamed(),
        };

        if let Some(existing) = parent_node.children.get(&name) {
            if existing == child {
                return Ok(Some(name));
            }
            match self.config.duplicate_names {
                DuplicateNamePolicy::Reject => return Err(SceneError::DuplicateName { parent, name }),
                DuplicateNamePolicy::Warn => {
                    log::warn!("'{}' already exists in node {:?}, skipping", name, parent);
                    return Ok(None);
                }
            }
        }

        self.detach(child);

        let (parent_lit, under_scene_root) = match self.nodes.get_mut(parent) {
            Some(parent_node) => {
                parent_node.children.insert(name.clone(), child);
                (parent_node.lit, parent_node.is_scene_root)
            }
            None => return Ok(None),
        };
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.parent_key = Some(name.clone());
            child_node.transform.mark_dirty();
        }
        if !under_scene_root {
            self.set_lit(child, parent_lit);
        }

        log::debug!("Attached {:?} as '{}' under {:?}", child, name, parent);
        Ok(Some(name))
    }

    /// Attach several children in order, stopping at the first error
    ///
    /// Returns the names of the children actually attached.
    pub fn add_children<'a, I>(&mut self, parent: NodeId, children: I) -> Result<Vec<String>, SceneError>
    where
        I: IntoIterator<Item = (Option<&'a str>, NodeId)>,
    {
        let mut names = Vec::new();
        for (name, child) in children {
            if let Some(name) = self.add_child(parent, name, child)? {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Detach a child of `parent` by id or name
    ///
    /// Returns the detached node; `None` when nothing matched.
    pub fn remove_child<'a>(&mut self, parent: NodeId, child: impl Into<ChildRef<'a>>) -> Option<NodeId> {
        let parent_node = self.nodes.get_mut(parent)?;
        let removed = match child.into() {
            ChildRef::Id(id) => parent_node.children.remove_id(id).map(|_| id),
            ChildRef::Name(name) => parent_node.children.remove_name(name),
        }?;

        if let Some(node) = self.nodes.get_mut(removed) {
            node.parent = None;
            node.parent_key = None;
        }
        log::debug!("Detached {:?} from {:?}", removed, parent);
        Some(removed)
    }

    /// Detach `id` from its parent, if any
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, ChildRef::Id(id));
        }
    }

    /// Rebuild world matrices of the subtree at `id`
    ///
    /// A node is rebuilt when it is dirty, when `force` is set, or when any
    /// ancestor in this pass was rebuilt. The walk starts from the parent's
    /// current world matrix, so a subtree can be refreshed on its own.
    pub fn propagate_transform(&mut self, id: NodeId, force: bool) {
        let Some(node) = self.nodes.get(id) else {
            log::warn!("propagate_transform ignored: stale node id {:?}", id);
            return;
        };
        let parent_world = node
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .map(|parent| *parent.transform.world_matrix());

        let mut stack: Vec<(NodeId, Option<Mat4>, bool)> = vec![(id, parent_world, force)];
        while let Some((id, parent_world, force)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else { continue };
            let updated = node.transform.recompute_world_matrix(parent_world.as_ref(), force);
            let world = *node.transform.world_matrix();
            let force_children = force || updated;
            stack.extend(node.children.ids().rev().map(|child| (child, Some(world), force_children)));
        }
    }

    /// Draw the subtree at `id` depth-first
    ///
    /// Nodes without both a mesh and a shader are skipped, as are nodes that
    /// need no redraw unless `force` is set. Returns the number of draws.
    pub fn render(&mut self, id: NodeId, ctx: &RenderContext, backend: &mut dyn RenderBackend, force: bool) -> usize {
        let mut draws = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else { continue };

            if let Some((mesh, shader)) = node.renderable.drawable() {
                if force || node.transform.needs_redraw() {
                    backend.draw(&DrawCall {
                        node: id,
                        world: node.transform.world_matrix(),
                        view: &ctx.view,
                        projection: &ctx.projection,
                        mesh,
                        shader,
                        texture: node.renderable.texture,
                        color: node.renderable.color,
                        lights: if node.lit { ctx.lights.as_slice() } else { &[] },
                    });
                    node.transform.mark_drawn();
                    draws += 1;
                }
            }

            stack.extend(node.children.ids().rev());
        }
        draws
    }

    /// Release the subtree's resource handles and free its nodes
    ///
    /// Children are released before their parents. The subtree is detached
    /// from its parent first. On the scene root only the children go.
    pub fn release_resources(&mut self, id: NodeId, resources: &mut ResourceManager) {
        let Some(node) = self.nodes.get(id) else {
            log::warn!("release_resources ignored: stale node id {:?}", id);
            return;
        };
        if node.is_scene_root {
            for child in self.children(id) {
                self.release_resources(child, resources);
            }
            return;
        }

        self.detach(id);

        // preorder, then walked backwards: every child comes before its parent
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(id) {
                order.push(id);
                stack.extend(node.children.ids());
            }
        }

        for id in order.into_iter().rev() {
            if let Some(node) = self.nodes.remove(id) {
                let renderable = node.renderable;
                if let Some(mesh) = renderable.mesh {
                    resources.release_mesh(mesh);
                }
                if let Some(shader) = renderable.shader {
                    resources.release_shader(shader);
                }
                if let Some(texture) = renderable.texture {
                    resources.release_texture(texture);
                }
            }
        }
    }

    /// Swap the node's mesh; an empty name or a load failure leaves it without one
    ///
    /// Returns true when a mesh is now set.
    pub fn set_mesh(&mut self, id: NodeId, resources: &mut ResourceManager, name: &str) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            log::warn!("set_mesh ignored: stale node id {:?}", id);
            return false;
        };
        if let Some(old) = node.renderable.mesh.take() {
            resources.release_mesh(old);
        }
        if name.is_empty() {
            return false;
        }
        match resources.acquire_mesh(name) {
            Ok(mesh) => {
                node.renderable.mesh = Some(mesh);
                node.transform.mark_dirty();
                true
            }
            Err(e) => {
                log::error!("Error loading mesh '{}': {}. Node {:?} will not render", name, e, id);
                false
            }
        }
    }

    /// Swap the node's shader; an empty name or a load failure leaves it without one
    pub fn set_shader(&mut self, id: NodeId, resources: &mut ResourceManager, name: &str) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            log::warn!("set_shader ignored: stale node id {:?}", id);
            return false;
        };
        if let Some(old) = node.renderable.shader.take() {
            resources.release_shader(old);
        }
        if name.is_empty() {
            return false;
        }
        match resources.acquire_shader(name) {
            Ok(shader) => {
                node.renderable.shader = Some(shader);
                node.transform.request_redraw();
                true
            }
            Err(e) => {
                log::error!("Error loading shader '{}': {}. Node {:?} will not render", name, e, id);
                false
            }
        }
    }

    /// Swap the node's texture; an empty name or a load failure leaves it untextured
    pub fn set_texture(&mut self, id: NodeId, resources: &mut ResourceManager, name: &str) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            log::warn!("set_texture ignored: stale node id {:?}", id);
            return false;
        };
        if let Some(old) = node.renderable.texture.take() {
            resources.release_texture(old);
        }
        if name.is_empty() {
            return false;
        }
        match resources.acquire_texture(name) {
            Ok(texture) => {
                node.renderable.texture = Some(texture);
                node.transform.request_redraw();
                true
            }
            Err(e) => {
                log::error!("Error loading texture '{}': {}", name, e);
                false
            }
        }
    }

    /// Set the flat colour
    pub fn set_color(&mut self, id: NodeId, color: Vec3) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.renderable.color = color;
            node.transform.request_redraw();
        }
    }

    /// Set whether the subtree at `id` receives scene lights
    pub fn set_lit(&mut self, id: NodeId, lit: bool) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(id) {
                if node.lit != lit {
                    node.lit = lit;
                    node.transform.request_redraw();
                }
                stack.extend(node.children.ids());
            }
        }
    }

    /// Attach or remove a light source
    pub fn set_light(&mut self, id: NodeId, light: Option<LightSource>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.light = light;
        }
    }

    /// Switch an existing light on or off; returns the new state
    pub fn set_light_enabled(&mut self, id: NodeId, enabled: bool) -> Option<bool> {
        let light = self.nodes.get_mut(id)?.light.as_mut()?;
        light.enabled = enabled;
        Some(enabled)
    }

    /// Enabled lights of every node attached to the scene root
    pub fn collect_lights(&self) -> Vec<PointLight> {
        let mut lights = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else { continue };
            if let Some(light) = node.light.filter(|light| light.enabled) {
                lights.push(PointLight {
                    position: node.transform.world_position(),
                    color: light.color,
                });
            }
            stack.extend(node.children.ids().rev());
        }
        lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetSource;
    use crate::foundation::math::{angle_axis, constants::HALF_PI, Axis, Point3};
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;

    fn graph_with(policy: DuplicateNamePolicy) -> SceneGraph {
        SceneGraph::new(SceneConfig {
            duplicate_names: policy,
            ..SceneConfig::default()
        })
    }

    fn resources() -> ResourceManager {
        ResourceManager::new(Box::new(MemoryAssetSource::with_builtins()))
    }

    fn drawable(graph: &mut SceneGraph, resources: &mut ResourceManager) -> NodeId {
        let id = graph.create_node();
        assert!(graph.set_mesh(id, resources, "cube"));
        assert!(graph.set_shader(id, resources, "basic"));
        id
    }

    #[test]
    fn test_unnamed_children_get_counter_names() {
        let mut graph = SceneGraph::default();
        let parent = graph.create_node();
        let a = graph.create_node();
        let b = graph.create_node();

        let names = graph.add_children(parent, [(None, a), (None, b)]).unwrap();
        assert_eq!(names, vec!["no_name_0", "no_name_1"]);
        assert_eq!(graph.node(b).unwrap().parent_key(), Some("no_name_1"));
    }

    #[test]
    fn test_duplicate_name_policies() {
        let mut graph = graph_with(DuplicateNamePolicy::Reject);
        let parent = graph.create_node();
        let (a, b) = (graph.create_node(), graph.create_node());
        graph.add_child(parent, Some("x"), a).unwrap();
        assert_eq!(
            graph.add_child(parent, Some("x"), b),
            Err(SceneError::DuplicateName { parent, name: "x".into() })
        );
        assert_eq!(graph.parent(b), None);

        let mut graph = graph_with(DuplicateNamePolicy::Warn);
        let parent = graph.create_node();
        let (a, b) = (graph.create_node(), graph.create_node());
        graph.add_child(parent, Some("x"), a).unwrap();
        assert_eq!(graph.add_child(parent, Some("x"), b), Ok(None));
        assert_eq!(graph.child_by_name(parent, "x"), Some(a));
        assert_eq!(graph.parent(b), None);
    }

    #[test]
    fn test_reparenting_is_atomic() {
        let mut graph = SceneGraph::default();
        let (a, b, x) = (graph.create_node(), graph.create_node(), graph.create_node());
        graph.add_child(a, Some("x"), x).unwrap();
        graph.add_child(b, Some("x"), x).unwrap();

        assert!(graph.children(a).is_empty());
        assert_eq!(graph.children(b), vec![x]);
        assert_eq!(graph.parent(x), Some(b));
        assert_eq!(graph.node(x).unwrap().parent_key(), Some("x"));
    }

    #[test]
    fn test_cycles_rejected() {
        let mut graph = SceneGraph::default();
        let (a, b, c) = (graph.create_node(), graph.create_node(), graph.create_node());
        graph.add_child(a, None, b).unwrap();
        graph.add_child(b, None, c).unwrap();

        assert!(matches!(graph.add_child(c, None, a), Err(SceneError::WouldCreateCycle { .. })));
        assert!(matches!(graph.add_child(a, None, a), Err(SceneError::WouldCreateCycle { .. })));
        assert_eq!(graph.parent(a), None);
    }

    #[test]
    fn test_remove_child_by_name_and_id() {
        let mut graph = SceneGraph::default();
        let parent = graph.create_node();
        let (a, b) = (graph.create_node(), graph.create_node());
        graph.add_child(parent, Some("a"), a).unwrap();
        graph.add_child(parent, Some("b"), b).unwrap();

        assert_eq!(graph.remove_child(parent, "a"), Some(a));
        assert_eq!(graph.remove_child(parent, b), Some(b));
        assert_eq!(graph.remove_child(parent, "a"), None);
        assert_eq!(graph.remove_child(parent, b), None);
        assert_eq!(graph.parent(a), None);
        assert!(graph.contains(a));
    }

    #[test]
    fn test_stale_ids_ignored() {
        let mut graph = SceneGraph::default();
        let mut resources = resources();
        let parent = graph.create_node();
        let gone = graph.create_node();
        graph.release_resources(gone, &mut resources);

        assert_eq!(graph.add_child(parent, None, gone), Ok(None));
        graph.propagate_transform(gone, true);
        assert!(!graph.set_mesh(gone, &mut resources, "cube"));
    }

    #[test]
    fn test_scene_root_ignores_transform_edits() {
        let mut graph = SceneGraph::default();
        let root = graph.root();
        assert!(graph.transform_mut(root).is_none());
        graph.propagate_transform(root, true);
        assert_relative_eq!(*graph.transform(root).unwrap().world_matrix(), Mat4::identity());
    }

    #[test]
    fn test_propagation_composes_and_is_idempotent() {
        let mut graph = SceneGraph::default();
        let (parent, child) = (graph.create_node(), graph.create_node());
        graph.add_child(graph.root(), None, parent).unwrap();
        graph.add_child(parent, None, child).unwrap();

        if let Some(t) = graph.transform_mut(parent) {
            t.set_transform(Some(Vec3::new(0.0, 2.0, 0.0)), Some(angle_axis(HALF_PI, Axis::Yaw)), None);
        }
        if let Some(t) = graph.transform_mut(child) {
            t.set_position(Vec3::new(1.0, 0.0, 0.0));
        }

        graph.propagate_transform(graph.root(), false);
        let first = *graph.transform(child).unwrap().world_matrix();
        let origin = first.transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(0.0, 2.0, -1.0), epsilon = 1e-5);

        graph.propagate_transform(graph.root(), false);
        assert_eq!(*graph.transform(child).unwrap().world_matrix(), first);
    }

    #[test]
    fn test_parent_change_forces_descendants() {
        let mut graph = SceneGraph::default();
        let (parent, child, grandchild) = (graph.create_node(), graph.create_node(), graph.create_node());
        graph.add_child(graph.root(), None, parent).unwrap();
        graph.add_child(parent, None, child).unwrap();
        graph.add_child(child, None, grandchild).unwrap();
        graph.propagate_transform(graph.root(), false);

        if let Some(t) = graph.transform_mut(parent) {
            t.translate(Vec3::new(3.0, 0.0, 0.0));
        }
        assert!(!graph.transform(grandchild).unwrap().is_dirty());
        graph.propagate_transform(graph.root(), false);
        assert_relative_eq!(graph.transform(grandchild).unwrap().world_position(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_subtree_propagation_uses_parent_world() {
        let mut graph = SceneGraph::default();
        let (parent, child) = (graph.create_node(), graph.create_node());
        graph.add_child(parent, None, child).unwrap();
        if let Some(t) = graph.transform_mut(parent) {
            t.set_position(Vec3::new(0.0, 0.0, 7.0));
        }
        graph.propagate_transform(parent, false);

        if let Some(t) = graph.transform_mut(child) {
            t.set_position(Vec3::new(1.0, 0.0, 0.0));
        }
        graph.propagate_transform(child, false);
        assert_relative_eq!(graph.transform(child).unwrap().world_position(), Vec3::new(1.0, 0.0, 7.0));
    }

    #[test]
    fn test_render_skips_clean_nodes_unless_forced() {
        let mut graph = SceneGraph::default();
        let mut resources = resources();
        let mut backend = RecordingBackend::new();
        let ctx = RenderContext::default();

        let (a, b) = (drawable(&mut graph, &mut resources), drawable(&mut graph, &mut resources));
        let bare = graph.create_node();
        let root = graph.root();
        graph.add_children(root, [(Some("a"), a), (Some("b"), b), (Some("bare"), bare)]).unwrap();

        graph.propagate_transform(root, false);
        assert_eq!(graph.render(root, &ctx, &mut backend, false), 2);
        assert_eq!(graph.render(root, &ctx, &mut backend, false), 0);

        if let Some(t) = graph.transform_mut(b) {
            t.translate(Vec3::new(0.0, 1.0, 0.0));
        }
        graph.propagate_transform(root, false);
        backend.clear();
        assert_eq!(graph.render(root, &ctx, &mut backend, false), 1);
        assert_eq!(backend.draws_of(b), 1);

        assert_eq!(graph.render(root, &ctx, &mut backend, true), 2);
    }

    #[test]
    fn test_failed_load_degrades_node() {
        let mut graph = SceneGraph::default();
        let mut resources = resources();
        let mut backend = RecordingBackend::new();
        let id = graph.create_node();
        graph.add_child(graph.root(), None, id).unwrap();

        assert!(graph.set_shader(id, &mut resources, "basic"));
        assert!(!graph.set_mesh(id, &mut resources, "missing_mesh"));
        assert!(graph.node(id).unwrap().renderable().mesh.is_none());

        graph.propagate_transform(graph.root(), false);
        assert_eq!(graph.render(graph.root(), &RenderContext::default(), &mut backend, true), 0);
    }

    #[test]
    fn test_lit_flag_propagation() {
        let mut graph = SceneGraph::default();
        let (lamp_post, bulb, loose) = (graph.create_node(), graph.create_node(), graph.create_node());
        graph.set_lit(lamp_post, true);

        graph.add_child(lamp_post, None, bulb).unwrap();
        assert!(graph.node(bulb).unwrap().is_lit());

        graph.set_lit(loose, true);
        graph.add_child(graph.root(), None, loose).unwrap();
        assert!(graph.node(loose).unwrap().is_lit());

        graph.set_lit(lamp_post, false);
        assert!(!graph.node(bulb).unwrap().is_lit());
    }

    #[test]
    fn test_lights_only_reach_lit_nodes() {
        let mut graph = SceneGraph::default();
        let mut resources = resources();
        let mut backend = RecordingBackend::new();
        let root = graph.root();

        let lamp = graph.create_node();
        graph.set_light(lamp, Some(LightSource::new(Vec3::new(1.0, 1.0, 0.0))));
        if let Some(t) = graph.transform_mut(lamp) {
            t.set_position(Vec3::new(0.0, 3.0, 0.0));
        }
        let (lit, unlit) = (drawable(&mut graph, &mut resources), drawable(&mut graph, &mut resources));
        graph.set_lit(lit, true);
        graph.add_children(root, [(Some("lamp"), lamp), (Some("lit"), lit), (Some("unlit"), unlit)]).unwrap();
        graph.propagate_transform(root, false);

        let lights = graph.collect_lights();
        assert_eq!(lights.len(), 1);
        assert_relative_eq!(lights[0].position, Vec3::new(0.0, 3.0, 0.0));

        let ctx = RenderContext { lights, ..RenderContext::default() };
        graph.render(root, &ctx, &mut backend, true);
        let counts: Vec<_> = backend.records().iter().map(|r| (r.node, r.light_count)).collect();
        assert_eq!(counts, vec![(lit, 1), (unlit, 0)]);

        graph.set_light_enabled(lamp, false);
        assert!(graph.collect_lights().is_empty());
    }

    #[test]
    fn test_release_resources_frees_subtree_and_handles() {
        let mut graph = SceneGraph::default();
        let mut resources = resources();
        let root = graph.root();
        let parent = drawable(&mut graph, &mut resources);
        let child = drawable(&mut graph, &mut resources);
        let keeper = drawable(&mut graph, &mut resources);
        graph.add_child(root, Some("parent"), parent).unwrap();
        graph.add_child(root, Some("keeper"), keeper).unwrap();
        graph.add_child(parent, None, child).unwrap();

        let mesh = resources.meshes().find("cube").unwrap();
        assert_eq!(resources.meshes().ref_count(mesh), 3);

        graph.release_resources(parent, &mut resources);
        assert!(!graph.contains(parent));
        assert!(!graph.contains(child));
        assert_eq!(graph.children(root), vec![keeper]);
        assert_eq!(resources.meshes().ref_count(mesh), 1);

        graph.release_resources(root, &mut resources);
        assert!(graph.contains(root));
        assert_eq!(graph.len(), 1);
        assert_eq!(resources.loaded_count(), 0);
    }
}
