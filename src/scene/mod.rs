//! Scene integration.
//!
//! Hosts see a glow path as a [`SceneNode`]: a transformable group of child
//! quads that can be attached to a parent, ticked once per frame, and told
//! to release its resources before removal. [`Scene`] is a minimal host that
//! owns nodes and composes their transforms.

mod glow_path;

pub use glow_path::GlowPath;

use crate::material::MaterialHandle;
use crate::mesh::Quad;
use crate::util::Mat4;

/// Identifier of a node inside a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// The scene root; every top-level node is parented to it.
    pub const ROOT: NodeId = NodeId(0);
}

/// Capability set a renderable node offers its host.
pub trait SceneNode {
    fn name(&self) -> &str;

    /// Local transform relative to the parent.
    fn transform(&self) -> Mat4;

    /// Child drawables, each with its own local transform.
    fn quads(&self) -> &[Quad];

    /// Shared material, for nodes that have one.
    fn material(&self) -> Option<&MaterialHandle> {
        None
    }

    fn parent(&self) -> Option<NodeId>;

    fn attach_to_scene(&mut self, parent: NodeId);

    fn detach_from_scene(&mut self);

    /// Per-frame update with the host's timestamp in milliseconds.
    fn advance(&mut self, timestamp_millis: f64);

    /// Free owned resources. Must be called before the node is removed.
    fn release_resources(&mut self);
}

/// Minimal scene graph: a root transform with a flat list of child nodes.
pub struct Scene {
    transform: Mat4,
    nodes: Vec<(NodeId, Box<dyn SceneNode>)>,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_transform(Mat4::IDENTITY)
    }

    pub fn with_transform(transform: Mat4) -> Self {
        Self {
            transform,
            nodes: Vec::new(),
            next_id: 1,
        }
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Add a node under the root.
    pub fn add(&mut self, mut node: Box<dyn SceneNode>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.attach_to_scene(NodeId::ROOT);
        self.nodes.push((id, node));
        id
    }

    pub fn add_node<N: SceneNode + 'static>(&mut self, node: N) -> NodeId {
        self.add(Box::new(node))
    }

    /// Remove a node, releasing its resources first.
    pub fn remove(&mut self, id: NodeId) -> Option<Box<dyn SceneNode>> {
        let idx = self.nodes.iter().position(|(nid, _)| *nid == id)?;
        let (_, mut node) = self.nodes.remove(idx);
        node.release_resources();
        node.detach_from_scene();
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&dyn SceneNode> {
        self.nodes
            .iter()
            .find(|(nid, _)| *nid == id)
            .map(|(_, n)| n.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut (dyn SceneNode + 'static)> {
        self.nodes
            .iter_mut()
            .find(|(nid, _)| *nid == id)
            .map(|(_, n)| n.as_mut())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Forward a frame tick to every node.
    pub fn advance(&mut self, timestamp_millis: f64) {
        for (_, node) in &mut self.nodes {
            node.advance(timestamp_millis);
        }
    }

    /// Every quad with its world matrix (scene * node * quad).
    pub fn world_quads(&self) -> impl Iterator<Item = (Mat4, &Quad)> + '_ {
        self.nodes.iter().flat_map(move |(_, node)| {
            let parent = self.transform * node.transform();
            node.quads().iter().map(move |q| (parent * q.transform().matrix(), q))
        })
    }
}
