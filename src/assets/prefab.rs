use glam::Affine3A;

use crate::animation::clip::AnimationClip;
use crate::resources::mesh::Mesh;
use crate::scene::transform::Transform;

/// Prefab node: plain data, parent and children referenced by index
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: String,
    /// Source identifier (element or group uuid), if the node has one.
    pub identifier: Option<String>,
    pub transform: Transform,
    pub parent: Option<usize>,
    /// Child indices into `Prefab::nodes`
    pub children_indices: Vec<usize>,
    pub mesh: Option<Mesh>,
}

impl PrefabNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Imported scene graph: flat node list, parent/child edges as indices.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub nodes: Vec<PrefabNode>,
    /// Root indices into `nodes`
    pub root_indices: Vec<usize>,
    pub animations: Vec<AnimationClip>,
}

impl Prefab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `node` under `parent` (or as a root) and returns its index.
    pub fn add_node(&mut self, mut node: PrefabNode, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        node.parent = parent;
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p].children_indices.push(index),
            None => self.root_indices.push(index),
        }
        index
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn find_by_identifier(&self, identifier: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.identifier.as_deref() == Some(identifier))
    }

    /// Composes local matrices from the root down to `index`.
    pub fn world_matrix(&self, index: usize) -> Option<Affine3A> {
        let node = self.nodes.get(index)?;
        let local = node.transform.local_matrix();
        match node.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    /// Nodes carrying a mesh.
    pub fn mesh_nodes(&self) -> impl Iterator<Item = (usize, &PrefabNode)> {
        self.nodes.iter().enumerate().filter(|(_, n)| n.mesh.is_some())
    }
}

