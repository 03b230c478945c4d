//! Scene graph: transforms, nodes and the arena that owns them

pub mod graph;
pub mod node;
pub mod transformable;

pub use graph::{ChildRef, SceneError, SceneGraph};
pub use node::{ChildMap, LightSource, NodeId, Renderable, SceneNode};
pub use transformable::{TransformLimits, Transformable};
